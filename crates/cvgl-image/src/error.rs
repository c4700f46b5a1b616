/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must share a size do not.
    #[error("Image size mismatch: source is {0}x{1}, destination is {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds for an image of {2}x{3}")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is not valid.
    #[error("Channel index {0} is out of bounds ({1} channels)")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when a filter kernel has an unusable length.
    #[error("Invalid kernel length: {0}x{1}")]
    InvalidKernelLength(usize, usize),

    /// Error when a row stride is shorter than the image width.
    #[error("Row stride ({0}) is smaller than the image width ({1})")]
    InvalidRowStride(usize, usize),

    /// Error when a raw frame buffer is too short for its declared layout.
    #[error("Frame buffer holds {0} bytes but the layout requires {1}")]
    FrameBufferTooSmall(usize, usize),
}
