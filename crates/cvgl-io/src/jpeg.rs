use std::path::Path;

use cvgl_image::{Image, ImageStorage};
use jpeg_encoder::{ColorType, Encoder};

use crate::error::IoError;

/// Writes the given JPEG _(grayscale)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The grayscale image.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_gray8<S>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1, S>,
    quality: u8,
) -> Result<(), IoError>
where
    S: ImageStorage<u8>,
{
    let (width, height) = jpeg_dimensions(image)?;
    let encoder = Encoder::new_file(file_path, quality)?;
    encoder.encode(image.as_slice(), width, height, ColorType::Luma)?;
    Ok(())
}

/// Encodes a grayscale image to JPEG bytes in memory.
///
/// # Arguments
///
/// - `image` - The grayscale image.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
///
/// # Returns
///
/// The bytes of a complete JPEG file.
pub fn encode_image_jpeg_gray8<S>(image: &Image<u8, 1, S>, quality: u8) -> Result<Vec<u8>, IoError>
where
    S: ImageStorage<u8>,
{
    let (width, height) = jpeg_dimensions(image)?;
    let mut buf = Vec::new();
    let encoder = Encoder::new(&mut buf, quality);
    encoder.encode(image.as_slice(), width, height, ColorType::Luma)?;
    Ok(buf)
}

fn jpeg_dimensions<S: ImageStorage<u8>>(image: &Image<u8, 1, S>) -> Result<(u16, u16), IoError> {
    let size = image.size();
    match (u16::try_from(size.width), u16::try_from(size.height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(IoError::JpegImageTooLarge(size.width, size.height)),
    }
}
