/// Failures of the image container and the image operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// The buffer length differs from `width * height * channels`.
    #[error("buffer holds {0} values but the image needs {1}")]
    InvalidChannelShape(usize, usize),

    /// Two images that must share a size do not.
    #[error("image size {0}x{1} does not match {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// A pixel coordinate past the image.
    #[error("pixel ({0}, {1}) is outside a {2}x{3} image")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// A channel index past the channel count.
    #[error("channel {0} is outside an image with {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// A rectangle that does not fit inside the image.
    #[error("region {2}x{3} at ({0}, {1}) does not fit a {4}x{5} image")]
    RegionOutOfBounds(usize, usize, usize, usize, usize, usize),

    /// A pixel value the target type cannot represent.
    #[error("pixel value does not fit {0}")]
    CastError(String),

    /// A singular transform matrix.
    #[error("transform matrix is singular")]
    CannotComputeDeterminant,

    /// The resize backend failed.
    #[error("resize failed: {0}")]
    ResizeError(String),
}
