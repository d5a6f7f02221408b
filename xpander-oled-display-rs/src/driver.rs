//! SH1106 driver: power-on, configuration and frame transfer.
//!
//! [`Sh1106`] owns the framebuffer that is streamed to the panel, a
//! [`DisplayInterface`] transport and an optional reset line. It follows
//! the same lifecycle as other drivers on the board: construction without
//! bus traffic, explicit async initialisation, then repeated `show()`.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use xpander_framebuf::{Framebuffer, PixelFormat};

use crate::command;
use crate::error::DisplayError;
use crate::interface::{DisplayInterface, Page};

// ── Configuration ────────────────────────────────────────────────────────

/// Panel geometry and supply.
///
/// [`Sh1106Config::default()`] is the 128×64 module with the internal
/// charge pump fitted to the Xpander board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sh1106Config {
    /// Width in pixels. Default: 128. Max: 132.
    pub width: u32,
    /// Height in pixels, a multiple of 8. Default: 64. Max: 64.
    pub height: u32,
    /// `true` when the panel has an external high-voltage supply.
    pub external_vcc: bool,
}

impl Default for Sh1106Config {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            external_vcc: false,
        }
    }
}

impl Sh1106Config {
    /// Columns of display RAM in the controller.
    pub const MAX_WIDTH: u32 = 132;
    /// Rows addressable by the multiplexer.
    pub const MAX_HEIGHT: u32 = 64;

    /// Number of 8-row pages.
    pub fn pages(&self) -> u32 {
        self.height / 8
    }

    /// Bytes needed for a full frame.
    pub fn buffer_len(&self) -> usize {
        (self.width * self.pages()) as usize
    }

    fn is_valid(&self) -> bool {
        (1..=Self::MAX_WIDTH).contains(&self.width)
            && (8..=Self::MAX_HEIGHT).contains(&self.height)
            && self.height % 8 == 0
    }
}

// ── State ────────────────────────────────────────────────────────────────

/// Lifecycle state of an [`Sh1106`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Constructed, no bus traffic yet (or init failed before power-on).
    #[default]
    Uninitialized,
    /// Display-on sent, configuration not yet complete.
    Powered,
    /// Configured and accepting frames.
    Ready,
}

/// Placeholder for drivers without a reset line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResetPin;

impl ErrorType for NoResetPin {
    type Error = Infallible;
}

impl OutputPin for NoResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ── Driver ───────────────────────────────────────────────────────────────

/// Async driver for an SH1106 OLED controller.
///
/// # Lifecycle
///
/// 1. [`Sh1106::new()`]: validates geometry and buffer; no bus traffic.
/// 2. [`Sh1106::init()`]: optional reset pulse, display-on, configuration,
///    then a blank frame.
/// 3. Draw into [`Sh1106::framebuffer_mut()`].
/// 4. [`Sh1106::show()`]: transfers the framebuffer to the panel.
///
/// # Example
///
/// ```no_run
/// use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};
/// use xpander_oled_display_rs::{I2cInterface, Sh1106, Sh1106Config, DEFAULT_ADDRESS};
///
/// # async fn example(
/// #     i2c: impl embedded_hal_async::i2c::I2c,
/// #     mut delay: impl embedded_hal_async::delay::DelayNs,
/// # ) {
/// let bus: Mutex<NoopRawMutex, _> = Mutex::new(i2c);
/// let interface = I2cInterface::new(&bus, DEFAULT_ADDRESS);
/// let mut oled = Sh1106::new(interface, Sh1106Config::default(), [0u8; 1024]).unwrap();
/// oled.init(&mut delay).await.unwrap();
/// oled.framebuffer_mut().circle(64, 32, 20, 1);
/// oled.show().await.unwrap();
/// # }
/// ```
pub struct Sh1106<DI, B, RST = NoResetPin> {
    interface: DI,
    framebuffer: Framebuffer<B>,
    reset: Option<RST>,
    config: Sh1106Config,
    state: DriverState,
}

impl<DI, B> Sh1106<DI, B, NoResetPin>
where
    DI: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Construct an uninitialised driver.
    ///
    /// No bus traffic is generated. You **must** call [`init()`](Self::init)
    /// before [`show()`](Self::show) and the other controller commands.
    ///
    /// # Errors
    ///
    /// [`DisplayError::InvalidConfig`] for a geometry the controller cannot
    /// drive, [`DisplayError::Framebuffer`] if `buffer` is shorter than
    /// [`Sh1106Config::buffer_len()`].
    pub fn new(
        interface: DI,
        config: Sh1106Config,
        buffer: B,
    ) -> Result<Self, DisplayError<DI::Error>> {
        if !config.is_valid() {
            return Err(DisplayError::InvalidConfig);
        }
        let framebuffer =
            Framebuffer::new(buffer, config.width, config.height, PixelFormat::Mvlsb)?;
        Ok(Self {
            interface,
            framebuffer,
            reset: None,
            config,
            state: DriverState::Uninitialized,
        })
    }

    /// Attach a reset line, pulsed by [`init()`](Sh1106::init).
    pub fn with_reset<RST: OutputPin>(self, reset: RST) -> Sh1106<DI, B, RST> {
        Sh1106 {
            interface: self.interface,
            framebuffer: self.framebuffer,
            reset: Some(reset),
            config: self.config,
            state: self.state,
        }
    }
}

impl<DI, B, RST> Sh1106<DI, B, RST>
where
    DI: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
    RST: OutputPin,
{
    /// Initialise the SH1106 hardware.
    ///
    /// Pulses the reset line if one is attached (high 1 ms, low 10 ms,
    /// high 10 ms), sends display-on, the configuration sequence, then
    /// clears the framebuffer and shows it.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::DeviceUnavailable`] on any bus failure; the
    /// driver then stays out of the `Ready` state. [`DisplayError::Pin`]
    /// if the reset line cannot be driven.
    pub async fn init<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), DisplayError<DI::Error>> {
        self.state = DriverState::Uninitialized;
        self.hardware_reset(delay).await?;

        self.interface
            .send_commands(&[command::SET_DISP_ON])
            .await
            .map_err(|_| unavailable())?;
        self.state = DriverState::Powered;

        let sequence = command::init_sequence(self.config.height as u8, self.config.external_vcc);
        self.interface
            .send_commands(&sequence)
            .await
            .map_err(|_| unavailable())?;

        self.framebuffer.fill(0);
        self.flush().await.map_err(|_| unavailable())?;
        self.state = DriverState::Ready;

        #[cfg(feature = "defmt")]
        defmt::info!("SH1106 ready ({}x{})", self.config.width, self.config.height);
        Ok(())
    }

    async fn hardware_reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), DisplayError<DI::Error>> {
        let Some(reset) = self.reset.as_mut() else {
            return Ok(());
        };
        reset.set_high().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(1).await;
        reset.set_low().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(10).await;
        reset.set_high().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(10).await;
        Ok(())
    }

    /// Transfer the framebuffer to the display.
    ///
    /// All pages go out under one bus lock. At 400 kHz I2C a 128×64 frame
    /// takes roughly 25 ms.
    ///
    /// # Errors
    ///
    /// [`DisplayError::NotReady`] before a successful `init()`,
    /// [`DisplayError::Interface`] on a bus failure.
    pub async fn show(&mut self) -> Result<(), DisplayError<DI::Error>> {
        self.ensure_ready()?;
        self.flush().await.map_err(DisplayError::Interface)
    }

    async fn flush(&mut self) -> Result<(), DI::Error> {
        let width = self.config.width as usize;
        let offset = self.interface.column_offset();
        let pages = self
            .framebuffer
            .buffer()
            .chunks_exact(width)
            .take(self.config.pages() as usize)
            .enumerate()
            .map(|(page, data)| Page {
                commands: command::page_address(page as u8, offset),
                data,
            });
        self.interface.send_pages(pages).await
    }

    /// Set panel contrast (0–255).
    pub async fn contrast(&mut self, contrast: u8) -> Result<(), DisplayError<DI::Error>> {
        self.command(&[command::SET_CONTRAST, contrast]).await
    }

    /// Invert every pixel on the panel without touching the framebuffer.
    pub async fn invert(&mut self, invert: bool) -> Result<(), DisplayError<DI::Error>> {
        let cmd = if invert {
            command::SET_NORM_INV
        } else {
            command::SET_NORM
        };
        self.command(&[cmd]).await
    }

    /// Blank the panel. Display RAM and configuration are kept.
    pub async fn power_off(&mut self) -> Result<(), DisplayError<DI::Error>> {
        self.command(&[command::SET_DISP_OFF]).await
    }

    /// Turn the panel back on after [`power_off()`](Self::power_off).
    pub async fn power_on(&mut self) -> Result<(), DisplayError<DI::Error>> {
        self.command(&[command::SET_DISP_ON]).await
    }

    async fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError<DI::Error>> {
        self.ensure_ready()?;
        self.interface
            .send_commands(bytes)
            .await
            .map_err(DisplayError::Interface)
    }

    fn ensure_ready(&self) -> Result<(), DisplayError<DI::Error>> {
        if self.state == DriverState::Ready {
            Ok(())
        } else {
            Err(DisplayError::NotReady)
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Check whether [`init()`](Self::init) completed. No bus traffic.
    pub fn is_ready(&self) -> bool {
        self.state == DriverState::Ready
    }

    pub fn config(&self) -> &Sh1106Config {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer<B> {
        &self.framebuffer
    }

    /// The drawing surface. Changes reach the panel on the next
    /// [`show()`](Self::show).
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<B> {
        &mut self.framebuffer
    }

    pub fn interface(&self) -> &DI {
        &self.interface
    }

    /// Tear down the driver, returning its transport and buffer.
    pub fn release(self) -> (DI, B) {
        (self.interface, self.framebuffer.into_inner())
    }
}

fn unavailable<E>() -> DisplayError<E> {
    #[cfg(feature = "defmt")]
    defmt::warn!("SH1106 did not respond");
    DisplayError::DeviceUnavailable
}

// ── Tests ────────────────────────────────────────────────────────────────
