use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform sample in the closed interval spanned by `a` and `b`.
pub(crate) fn uniform<R: Rng>(rng: &mut R, a: f32, b: f32) -> f32 {
    if a == b {
        return a;
    }
    rng.random_range(a.min(b)..=a.max(b))
}

/// Uniform integer in `0..n`; `n` must be non-zero.
pub(crate) fn randint_below<R: Rng>(rng: &mut R, n: usize) -> usize {
    rng.random_range(0..n)
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
