use std::marker::PhantomData;

use crate::error::ImageError;
use crate::storage::{ImageStorage, ImageStorageMut};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use cvgl_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Returns true if the image has no pixels, i.e. zero width or zero height.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered by this size.
    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Trait for pixel sample types that the filters can accumulate in `f32`.
pub trait ImageDtype: Copy + Default + Send + Sync + 'static {
    /// Convert the sample to f32.
    fn to_f32(self) -> f32;
    /// Convert a f32 value to the sample type, rounding and saturating if needed.
    fn from_f32(x: f32) -> Self;
}

impl ImageDtype for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(x: f32) -> Self {
        x
    }
}

impl ImageDtype for u8 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, 255.0) as u8
    }
}

impl ImageDtype for u16 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(x: f32) -> Self {
        x.round().clamp(0.0, u16::MAX as f32) as u16
    }
}

impl ImageDtype for i16 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn from_f32(x: f32) -> Self {
        x.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored row-major and tightly packed with shape (H, W, C).
/// The storage `S` decides ownership: `Vec<T>` for owned images, `&[T]` for
/// read-only views and `&mut [T]` for writable views over caller buffers.
#[derive(Clone)]
pub struct Image<T, const CHANNELS: usize, S = Vec<T>> {
    size: ImageSize,
    storage: S,
    _dtype: PhantomData<T>,
}

/// A read-only image borrowed from a buffer owned elsewhere.
pub type ImageView<'a, T, const CHANNELS: usize> = Image<T, CHANNELS, &'a [T]>;

/// A writable image borrowed from a buffer owned elsewhere.
pub type ImageViewMut<'a, T, const CHANNELS: usize> = Image<T, CHANNELS, &'a mut [T]>;

impl<T, const CHANNELS: usize, S> std::fmt::Debug for Image<T, CHANNELS, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("size", &self.size)
            .field("channels", &CHANNELS)
            .field("dtype", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T, const CHANNELS: usize, S: ImageStorage<T>> Image<T, CHANNELS, S> {
    /// Wrap an existing storage as an image.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `storage` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the storage does not match the image size, an error is returned.
    pub fn from_storage(size: ImageSize, storage: S) -> Result<Self, ImageError> {
        let expected = size.width * size.height * CHANNELS;
        let len = storage.as_ref().len();
        if len != expected {
            return Err(ImageError::InvalidChannelShape(len, expected));
        }

        Ok(Self {
            size,
            storage,
            _dtype: PhantomData,
        })
    }

    /// Get the size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    #[inline]
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    #[inline]
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    #[inline]
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Returns true if the image has zero width or zero height.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Get the pixel data of the image as a flat slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_ref()
    }

    /// Borrow the image as a read-only view.
    pub fn view(&self) -> ImageView<'_, T, CHANNELS> {
        Image {
            size: self.size,
            storage: self.storage.as_ref(),
            _dtype: PhantomData,
        }
    }

    /// Get the samples of a single row.
    ///
    /// PRECONDITION: `y < self.rows()`.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let stride = self.size.width * CHANNELS;
        &self.as_slice()[y * stride..(y + 1) * stride]
    }

    /// Get a reference to the sample at the given pixel and channel.
    ///
    /// # Errors
    ///
    /// If the pixel or channel is out of bounds, an error is returned.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok(&self.as_slice()[(y * self.width() + x) * CHANNELS + ch])
    }

    /// Copy the pixel data into a new owned image.
    pub fn to_owned_image(&self) -> Image<T, CHANNELS>
    where
        T: Clone,
    {
        Image {
            size: self.size,
            storage: self.as_slice().to_vec(),
            _dtype: PhantomData,
        }
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Returns
    ///
    /// A new image with the pixel data cast to the given type.
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .as_slice()
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        let channel_data = self
            .as_slice()
            .chunks_exact(CHANNELS)
            .map(|pixel| pixel[channel])
            .collect();

        Image::new(self.size, channel_data)
    }

    /// Consume the image and return its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<T, const CHANNELS: usize, S: ImageStorageMut<T>> Image<T, CHANNELS, S> {
    /// Get the pixel data of the image as a mutable flat slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.storage.as_mut()
    }

    /// Borrow the image as a writable view.
    pub fn view_mut(&mut self) -> ImageViewMut<'_, T, CHANNELS> {
        Image {
            size: self.size,
            storage: self.storage.as_mut(),
            _dtype: PhantomData,
        }
    }

    /// Get the samples of a single row for writing.
    ///
    /// PRECONDITION: `y < self.rows()`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let stride = self.size.width * CHANNELS;
        &mut self.as_slice_mut()[y * stride..(y + 1) * stride]
    }

    /// Overwrite every sample with `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.as_slice_mut().fill(val);
    }
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use cvgl_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        Self::from_storage(size, data)
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use cvgl_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 1>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0u8).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.num_channels(), 1);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Self::new(size, data)
    }

    /// Consume the image and return the pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.storage
    }
}

impl<'a, T, const CHANNELS: usize> Image<T, CHANNELS, &'a [T]> {
    /// Borrow a caller-owned buffer as a read-only image.
    ///
    /// # Examples
    ///
    /// ```
    /// use cvgl_image::{ImageSize, ImageView};
    ///
    /// let buffer = vec![7u8; 4 * 3];
    /// let view = ImageView::<u8, 1>::from_slice([4, 3].into(), &buffer).unwrap();
    /// assert_eq!(view.get_pixel(3, 2, 0).unwrap(), &7);
    /// ```
    pub fn from_slice(size: ImageSize, data: &'a [T]) -> Result<Self, ImageError> {
        Self::from_storage(size, data)
    }
}

impl<'a, T, const CHANNELS: usize> Image<T, CHANNELS, &'a mut [T]> {
    /// Borrow a caller-owned buffer as a writable image.
    pub fn from_slice_mut(size: ImageSize, data: &'a mut [T]) -> Result<Self, ImageError> {
        Self::from_storage(size, data)
    }
}
