//! Board-level display facade.
//!
//! [`XpanderDisplay`] bundles the SH1106 driver with a lazily loaded bitmap
//! font so application code can draw text by font name, and provides the
//! board self-test screen. An absent display is not an error for the
//! board: [`XpanderDisplay::attach()`] logs and returns `None`.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_graphics::{image::ImageDrawable, pixelcolor::BinaryColor};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use heapless::String;
use xpander_framebuf::{FontCache, FontLibrary, Framebuffer, DEFAULT_FONT};

use crate::command::DEFAULT_ADDRESS;
use crate::driver::{NoResetPin, Sh1106, Sh1106Config};
use crate::error::DisplayError;
use crate::interface::{DisplayInterface, I2cInterface};

// ── Banner ───────────────────────────────────────────────────────────────

/// Content of the self-test screen.
///
/// [`Banner::default()`] reproduces the board's power-on greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banner<'a> {
    pub greeting: &'a str,
    pub board: &'a str,
    /// Firmware version as `(major, minor)`.
    pub version: (u8, u8),
    /// Font resource name.
    pub font: &'a str,
    /// Vertical distance between lines in pixels.
    pub line_spacing: i32,
}

impl Default for Banner<'_> {
    fn default() -> Self {
        Self {
            greeting: "Hello world!",
            board: "picoXpander",
            version: (1, 0),
            font: DEFAULT_FONT,
            line_spacing: 10,
        }
    }
}

// ── XpanderDisplay ───────────────────────────────────────────────────────

/// SH1106 display with named-font text rendering.
pub struct XpanderDisplay<DI, B, L, RST = NoResetPin>
where
    L: FontLibrary,
{
    driver: Sh1106<DI, B, RST>,
    fonts: FontCache<L>,
}

impl<'a, M, I2C, B, L> XpanderDisplay<I2cInterface<'a, M, I2C>, B, L>
where
    M: RawMutex,
    I2C: I2c,
    B: AsRef<[u8]> + AsMut<[u8]>,
    L: FontLibrary,
{
    /// Look for an SH1106 at [`DEFAULT_ADDRESS`] on a shared I2C bus and
    /// initialise it.
    ///
    /// Returns `None` when no display answers or the setup is unusable, so
    /// the rest of the board keeps running without one.
    pub async fn attach<D: DelayNs>(
        bus: &'a Mutex<M, I2C>,
        config: Sh1106Config,
        buffer: B,
        fonts: L,
        delay: &mut D,
    ) -> Option<Self> {
        let interface = I2cInterface::new(bus, DEFAULT_ADDRESS);
        let result = match Sh1106::new(interface, config, buffer) {
            Ok(mut driver) => driver.init(delay).await.map(|()| driver),
            Err(e) => Err(e),
        };
        match result {
            Ok(driver) => Some(Self::new(driver, fonts)),
            Err(DisplayError::DeviceUnavailable) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("No OLED attached");
                None
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::error!("OLED setup failed");
                None
            }
        }
    }
}

impl<DI, B, L, RST> XpanderDisplay<DI, B, L, RST>
where
    DI: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
    L: FontLibrary,
    RST: OutputPin,
{
    /// Wrap a driver. Fonts are opened from `fonts` on first use.
    pub fn new(driver: Sh1106<DI, B, RST>, fonts: L) -> Self {
        Self {
            driver,
            fonts: FontCache::new(fonts),
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer<B> {
        self.driver.framebuffer()
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<B> {
        self.driver.framebuffer_mut()
    }

    pub fn driver(&self) -> &Sh1106<DI, B, RST> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut Sh1106<DI, B, RST> {
        &mut self.driver
    }

    /// Draw `text` at `(x, y)` with the font registered as `font`.
    ///
    /// The font stays cached until a different name is requested.
    pub fn text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: u32,
        font: &str,
        size: u32,
    ) -> Result<(), DisplayError<DI::Error>> {
        let font = self.fonts.get(font)?;
        self.driver.framebuffer_mut().text(text, x, y, color, font, size);
        Ok(())
    }

    /// Replace the frame with a full-screen monochrome image.
    pub fn image<I>(&mut self, image: &I) -> Result<(), DisplayError<DI::Error>>
    where
        I: ImageDrawable<Color = BinaryColor>,
    {
        self.driver.framebuffer_mut().image(image)?;
        Ok(())
    }

    pub async fn show(&mut self) -> Result<(), DisplayError<DI::Error>> {
        self.driver.show().await
    }

    pub async fn contrast(&mut self, contrast: u8) -> Result<(), DisplayError<DI::Error>> {
        self.driver.contrast(contrast).await
    }

    pub async fn invert(&mut self, invert: bool) -> Result<(), DisplayError<DI::Error>> {
        self.driver.invert(invert).await
    }

    /// Show the default self-test screen.
    pub async fn banner(&mut self) -> Result<(), DisplayError<DI::Error>> {
        self.banner_with(&Banner::default()).await
    }

    /// Clear the frame, draw the three banner lines and show them.
    pub async fn banner_with(
        &mut self,
        banner: &Banner<'_>,
    ) -> Result<(), DisplayError<DI::Error>> {
        let mut version: String<16> = String::new();
        // Fits "Version 255.255".
        let _ = write!(version, "Version {}.{}", banner.version.0, banner.version.1);

        self.framebuffer_mut().fill(0);
        let lines = [banner.greeting, banner.board, version.as_str()];
        for (row, line) in (0i32..).zip(lines) {
            self.text(line, 0, row * banner.line_spacing, 1, banner.font, 1)?;
        }
        self.show().await
    }

    /// Give back the driver, dropping any cached font.
    pub fn into_driver(self) -> Sh1106<DI, B, RST> {
        self.driver
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
