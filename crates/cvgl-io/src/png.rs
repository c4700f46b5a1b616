use std::{fs, path::Path};

use cvgl_image::{Image, ImageSize, ImageStorage};
use png::{BitDepth, ColorType, Decoder, Encoder};

use crate::error::IoError;

/// Read a PNG image with a single channel (mono8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
///
/// # Errors
///
/// Fails if the file is missing, is not a `.png`, or is not an 8 bit grayscale image.
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let is_png = file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    let mut reader = Decoder::new(file)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != ColorType::Grayscale || info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "expected an 8 bit grayscale image, got {:?} with {:?}",
            info.color_type, info.bit_depth
        )));
    }

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };
    buf.truncate(info.buffer_size());

    Ok(Image::new(size, buf)?)
}

/// Writes the given PNG _(grayscale)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The grayscale image.
pub fn write_image_png_gray8<S>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1, S>,
) -> Result<(), IoError>
where
    S: ImageStorage<u8>,
{
    let file = fs::File::create(file_path)?;

    let size = image.size();
    let mut encoder = Encoder::new(file, size.width as u32, size.height as u32);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(())
}
