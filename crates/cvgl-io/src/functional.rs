use std::path::Path;

use cvgl_image::{Image, ImageSize};

use crate::error::IoError;

fn decode_any(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {}x{} {:?}",
        file_path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

/// Reads an image of any supported format and converts it to grayscale.
///
/// The format is guessed from the file content. Color images are converted with
/// the luma weights of the `image` crate.
///
/// # Arguments
///
/// * `file_path` - The path to the image file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_any_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let img = decode_any(file_path.as_ref())?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_luma8().into_raw())?)
}

/// Reads an image of any supported format as RGB8.
///
/// # Arguments
///
/// * `file_path` - The path to the image file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = decode_any(file_path.as_ref())?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}
