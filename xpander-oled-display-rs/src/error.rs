//! Error types for the SH1106 display driver.

use core::fmt;

use xpander_framebuf::{FontError, FramebufError};

/// Errors that can occur during OLED display operations.
///
/// Generic over the transport error `E` so bus failures keep their
/// concrete type.
#[derive(Debug)]
pub enum DisplayError<E> {
    /// Transport error (I2C bus, or SPI bus and its control pins).
    Interface(E),
    /// The reset pin could not be driven.
    Pin,
    /// Framebuffer construction or blit failed.
    Framebuffer(FramebufError),
    /// A font could not be found or loaded.
    Font(FontError),
    /// The controller did not accept the power-on and init sequence.
    DeviceUnavailable,
    /// An operation was attempted before [`Sh1106::init()`](crate::Sh1106::init)
    /// completed.
    NotReady,
    /// Width or height cannot be driven by an SH1106.
    InvalidConfig,
}

impl<E> From<FramebufError> for DisplayError<E> {
    fn from(error: FramebufError) -> Self {
        DisplayError::Framebuffer(error)
    }
}

impl<E> From<FontError> for DisplayError<E> {
    fn from(error: FontError) -> Self {
        DisplayError::Font(error)
    }
}

impl<E: fmt::Debug> fmt::Display for DisplayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayError::Interface(e) => write!(f, "Display interface error: {:?}", e),
            DisplayError::Pin => write!(f, "Reset pin error"),
            DisplayError::Framebuffer(e) => write!(f, "Framebuffer error: {}", e),
            DisplayError::Font(e) => write!(f, "Font error: {}", e),
            DisplayError::DeviceUnavailable => write!(f, "Display did not respond"),
            DisplayError::NotReady => write!(f, "Display not initialised"),
            DisplayError::InvalidConfig => write!(f, "Unsupported display geometry"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for DisplayError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DisplayError::Interface(e) => defmt::write!(f, "Display interface error: {}", e),
            DisplayError::Pin => defmt::write!(f, "Reset pin error"),
            DisplayError::Framebuffer(e) => defmt::write!(f, "Framebuffer error: {}", e),
            DisplayError::Font(e) => defmt::write!(f, "Font error: {}", e),
            DisplayError::DeviceUnavailable => defmt::write!(f, "Display did not respond"),
            DisplayError::NotReady => defmt::write!(f, "Display not initialised"),
            DisplayError::InvalidConfig => defmt::write!(f, "Unsupported display geometry"),
        }
    }
}
