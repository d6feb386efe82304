use std::fmt;

use crate::error::ImageError;

/// Width and height of an image, in pixels.
///
/// ```
/// use detaug_image::ImageSize;
///
/// let size: ImageSize = [640, 480].into();
/// assert_eq!((size.width, size.height), (640, 480));
/// assert_eq!(size.area(), 307_200);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// number of columns
    pub width: usize,
    /// number of rows
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from([width, height]: [usize; 2]) -> Self {
        Self { width, height }
    }
}

/// Pixel value types that can be sampled through `f32`.
///
/// The rayon row loops need the values to be `Send + Sync`.
pub trait ImageDtype: Copy + Default + Into<f32> + Send + Sync {
    /// Convert back from `f32`, saturating where the type is bounded.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

/// An owned image of `C` interleaved channels, stored row-major as (H, W, C).
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Wrap a pixel buffer.
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidChannelShape`] when `data` does not hold
    /// `width * height * C` values.
    ///
    /// ```
    /// use detaug_image::Image;
    ///
    /// let image = Image::<u8, 3>::new([2, 1].into(), vec![255, 0, 0, 0, 0, 255]).unwrap();
    /// assert_eq!(image.num_channels(), 3);
    /// assert_eq!(image.get_pixel(1, 0, 2).unwrap(), &255);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.area() * C;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }
        Ok(Self { size, data })
    }

    /// An image with every channel value set to `val`.
    ///
    /// ```
    /// use detaug_image::Image;
    ///
    /// let gray = Image::<u8, 3>::from_size_val([4, 4].into(), 114).unwrap();
    /// assert!(gray.as_slice().iter().all(|&v| v == 114));
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Self::new(size, vec![val; size.area() * C])
    }

    /// Size in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Same as [`Image::cols`].
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Same as [`Image::rows`].
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Number of interleaved channels.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// The pixel buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The pixel buffer, mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn offset(&self, x: usize, y: usize, ch: usize) -> Result<usize, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        if ch >= C {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, C));
        }
        Ok((y * self.width() + x) * C + ch)
    }

    /// Channel `ch` of the pixel at column `x`, row `y`.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        let i = self.offset(x, y, ch)?;
        Ok(&self.data[i])
    }

    /// Overwrite channel `ch` of the pixel at column `x`, row `y`.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        let i = self.offset(x, y, ch)?;
        self.data[i] = val;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_display_and_area() {
        let size = ImageSize::from([416, 320]);
        assert_eq!(size.to_string(), "416x320");
        assert_eq!(size.area(), 133_120);
        assert_eq!(ImageSize::default().area(), 0);
    }

    #[test]
    fn buffer_length_must_match() {
        assert_eq!(
            Image::<u8, 3>::new([2, 2].into(), vec![0; 5]),
            Err(ImageError::InvalidChannelShape(5, 12))
        );
        assert!(Image::<f32, 1>::new([0, 7].into(), vec![]).is_ok());
    }

    #[test]
    fn pixel_roundtrip() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::from_size_val([3, 2].into(), 114)?;

        image.set_pixel(2, 1, 1, 7)?;
        assert_eq!(image.get_pixel(2, 1, 1)?, &7);
        assert_eq!(image.as_slice()[(3 + 2) * 3 + 1], 7);
        assert_eq!(image.get_pixel(2, 1, 0)?, &114);
        Ok(())
    }

    #[test]
    fn pixel_out_of_bounds() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::from_size_val([3, 2].into(), 0)?;
        assert_eq!(
            image.get_pixel(0, 2, 0),
            Err(ImageError::PixelIndexOutOfBounds(0, 2, 3, 2))
        );
        assert_eq!(
            image.set_pixel(0, 0, 3, 1),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );
        Ok(())
    }

    #[test]
    fn u8_from_f32_saturates() {
        assert_eq!(u8::from_f32(113.5), 114);
        assert_eq!(u8::from_f32(-0.4), 0);
        assert_eq!(u8::from_f32(1e6), 255);
        assert_eq!(f32::from_f32(-2.25), -2.25);
    }
}
