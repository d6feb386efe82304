use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-16;

/// Thresholds deciding whether a transformed box is kept.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateThresholds {
    /// minimum width and height in pixels, strictly exceeded.
    pub wh_thr: f32,
    /// maximum aspect ratio in either orientation, strictly below.
    pub ar_thr: f32,
    /// minimum ratio of the new area over the scaled original area, strictly exceeded.
    pub area_thr: f32,
}

impl Default for CandidateThresholds {
    fn default() -> Self {
        Self {
            wh_thr: 2.0,
            ar_thr: 20.0,
            area_thr: 0.2,
        }
    }
}

impl CandidateThresholds {
    /// Default thresholds with a different minimum side length.
    pub fn with_wh_thr(wh_thr: f32) -> Self {
        Self {
            wh_thr,
            ..Default::default()
        }
    }
}

/// Decide whether a box survives a geometric transform.
///
/// `before` is the original box already scaled by the transform's scale
/// factor and `after` is the transformed, clipped box, both `[x1, y1, x2, y2]`.
///
/// # Example
///
/// ```
/// use detaug_augment::{box_candidates, CandidateThresholds};
///
/// let thr = CandidateThresholds::default();
/// assert!(box_candidates(&[0.0, 0.0, 10.0, 10.0], &[0.0, 0.0, 10.0, 10.0], &thr));
/// assert!(!box_candidates(&[0.0, 0.0, 10.0, 10.0], &[0.0, 0.0, 1.0, 10.0], &thr));
/// ```
pub fn box_candidates(before: &[f32; 4], after: &[f32; 4], thr: &CandidateThresholds) -> bool {
    let w1 = before[2] - before[0];
    let h1 = before[3] - before[1];
    let w2 = after[2] - after[0];
    let h2 = after[3] - after[1];

    let ar = (w2 / (h2 + EPS)).max(h2 / (w2 + EPS));

    w2 > thr.wh_thr
        && h2 > thr.wh_thr
        && w2 * h2 / (w1 * h1 + EPS) > thr.area_thr
        && ar < thr.ar_thr
}

#[cfg(test)]
mod tests {
    use super::{box_candidates, CandidateThresholds};

    #[test]
    fn keeps_unchanged_box() {
        let b = [10.0, 10.0, 50.0, 40.0];
        assert!(box_candidates(&b, &b, &CandidateThresholds::default()));
    }

    #[test]
    fn rejects_thin_box() {
        let thr = CandidateThresholds::default();
        assert!(!box_candidates(
            &[0.0, 0.0, 10.0, 10.0],
            &[0.0, 0.0, 2.0, 10.0],
            &thr
        ));
        assert!(box_candidates(
            &[0.0, 0.0, 10.0, 10.0],
            &[0.0, 0.0, 2.5, 10.0],
            &thr
        ));
    }

    #[test]
    fn rejects_small_area_ratio() {
        let thr = CandidateThresholds::default();
        // 100 -> 20 is exactly 0.2 and fails the strict comparison
        assert!(!box_candidates(
            &[0.0, 0.0, 10.0, 10.0],
            &[0.0, 0.0, 4.0, 5.0],
            &thr
        ));
        assert!(box_candidates(
            &[0.0, 0.0, 10.0, 10.0],
            &[0.0, 0.0, 5.0, 5.0],
            &thr
        ));
    }

    #[test]
    fn rejects_extreme_aspect_ratio() {
        let thr = CandidateThresholds::default();
        assert!(!box_candidates(
            &[0.0, 0.0, 100.0, 4.0],
            &[0.0, 0.0, 100.0, 4.0],
            &thr
        ));
        assert!(box_candidates(
            &[0.0, 0.0, 57.0, 3.0],
            &[0.0, 0.0, 57.0, 3.0],
            &thr
        ));
    }

    #[test]
    fn custom_side_threshold() {
        let thr = CandidateThresholds::with_wh_thr(5.0);
        let b = [0.0, 0.0, 5.0, 5.0];
        assert!(!box_candidates(&b, &b, &thr));
        let b = [0.0, 0.0, 6.0, 6.0];
        assert!(box_candidates(&b, &b, &thr));
    }

    #[test]
    fn degenerate_original_box() {
        // a zero-area original makes the ratio huge rather than dividing by zero
        assert!(box_candidates(
            &[0.0, 0.0, 0.0, 0.0],
            &[0.0, 0.0, 10.0, 10.0],
            &CandidateThresholds::default()
        ));
    }
}
