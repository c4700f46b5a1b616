use serde::{Deserialize, Serialize};

/// A border type for extrapolating pixels outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Samples outside the image do not contribute (zero padding).
    ///
    /// Example: ...0 0 0 | a b c d...
    Constant,

    /// Repeats the outermost row or column.
    ///
    /// Example: ...a a a | a b c d...
    Replicate,

    /// Mirrors the image including the edge pixel.
    ///
    /// Example: ...c b a | a b c d...
    Reflect,

    /// Mirrors the image excluding the edge pixel.
    ///
    /// Example: ...d c b | a b c d...
    #[default]
    Reflect101,

    /// Wraps around to the opposite side.
    ///
    /// Example: ...x y z | a b c d...
    Wrap,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        let len = len as isize;
        (((i % len) + len) % len) as usize
    }

    /// Maps a possibly out-of-range coordinate to a valid index in `[0, len)`.
    ///
    /// Returns `None` for [`BorderMode::Constant`] when `i` is outside the image, in
    /// which case the sample is treated as zero.
    ///
    /// PRECONDITION: `len > 0`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }

        match self {
            BorderMode::Constant => None,
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => Some(Self::reflect(i, len)),
            BorderMode::Reflect101 => Some(Self::reflect101(i, len)),
            BorderMode::Wrap => Some(Self::wrap(i, len)),
        }
    }
}
