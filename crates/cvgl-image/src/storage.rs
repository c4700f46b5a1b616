/// A marker trait for the backing storage of an image.
///
/// Implemented for any contiguous container of samples: an owned `Vec<T>`, a
/// borrowed `&[T]` or a borrowed `&mut [T]`.
pub trait ImageStorage<T>: AsRef<[T]> {}

impl<T, S: AsRef<[T]>> ImageStorage<T> for S {}

/// A marker trait for image storage that can be written.
pub trait ImageStorageMut<T>: ImageStorage<T> + AsMut<[T]> {}

impl<T, S: AsRef<[T]> + AsMut<[T]>> ImageStorageMut<T> for S {}
