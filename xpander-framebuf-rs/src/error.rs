//! Error types for framebuffer construction and font loading.

use core::fmt;

/// Errors raised while building or configuring a [`Framebuffer`](crate::Framebuffer).
///
/// All variants are structural: they are reported before any pixel data
/// is touched, never recovered silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramebufError {
    /// Pixel format id is not one of the supported encodings.
    InvalidFormat,
    /// Rotation must be 0, 1, 2 or 3 quarter turns.
    InvalidRotation,
    /// Width or height is zero, or the stride is narrower than the width.
    InvalidDimensions,
    /// Backing buffer cannot hold every addressable pixel.
    BufferTooSmall {
        /// Bytes needed for the requested geometry and format.
        required: usize,
        /// Bytes actually supplied.
        actual: usize,
    },
    /// An image does not match the (rotation-adjusted) framebuffer size.
    DimensionMismatch {
        /// Framebuffer size as `(width, height)`.
        expected: (u32, u32),
        /// Image size as `(width, height)`.
        actual: (u32, u32),
    },
}

impl fmt::Display for FramebufError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FramebufError::InvalidFormat => write!(f, "invalid pixel format"),
            FramebufError::InvalidRotation => write!(f, "bad rotation setting (must be 0-3)"),
            FramebufError::InvalidDimensions => write!(f, "invalid framebuffer dimensions"),
            FramebufError::BufferTooSmall { required, actual } => {
                write!(f, "buffer too small: need {} bytes, got {}", required, actual)
            }
            FramebufError::DimensionMismatch { expected, actual } => write!(
                f,
                "image must be same dimensions as display ({}x{}), got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
        }
    }
}

/// Errors raised while loading a bitmap font.
///
/// Per-glyph read failures during rendering are *not* reported through
/// this type; those glyph columns are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// No font resource is registered under the requested name.
    NotFound,
    /// Resource size does not match `2 + 256 * glyph_width`.
    InvalidFont,
    /// The font header could not be read.
    Read,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FontError::NotFound => write!(f, "could not find font file"),
            FontError::InvalidFont => write!(f, "invalid font file"),
            FontError::Read => write!(f, "font header read failed"),
        }
    }
}
