//! Async SH1106 OLED driver for the Xpander I/O board.
//!
//! This crate pushes an [`xpander_framebuf::Framebuffer`] to an SH1106
//! controller over I2C or SPI, sharing the bus through an `embassy-sync`
//! [`Mutex`](embassy_sync::mutex::Mutex).
//!
//! # Architecture
//!
//! - **[`command`]**: SH1106 command bytes and the init / page-address
//!   sequences.
//! - **[`interface`]**: the [`DisplayInterface`] transport trait with
//!   [`I2cInterface`] and [`SpiInterface`].
//! - **[`Sh1106`]**: driver state machine (`Uninitialized`, `Powered`,
//!   `Ready`), frame transfer and controller commands.
//! - **[`XpanderDisplay`]**: board facade with text by font name and the
//!   self-test banner.
//!
//! # Quick start
//!
//! ```ignore
//! use xpander_framebuf::StaticFonts;
//! use xpander_oled_display_rs::{Sh1106Config, XpanderDisplay};
//!
//! static FONTS: [(&str, &[u8]); 1] = [("font5x8.bin", include_bytes!("font5x8.bin"))];
//!
//! // In your Embassy main, with `i2c_bus: &'static Mutex<_, I2c<..>>`:
//! if let Some(mut oled) = XpanderDisplay::attach(
//!     i2c_bus,
//!     Sh1106Config::default(),
//!     [0u8; 1024],
//!     StaticFonts::new(&FONTS),
//!     &mut Delay,
//! )
//! .await
//! {
//!     oled.banner().await.ok();
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging and [`defmt::Format`] on public types.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod driver;
pub mod error;
pub mod interface;
mod xpander;

#[cfg(test)]
mod testing;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use command::DEFAULT_ADDRESS;
pub use driver::{DriverState, NoResetPin, Sh1106, Sh1106Config};
pub use error::DisplayError;
pub use interface::{DisplayInterface, I2cInterface, Page, SpiInterface, SpiInterfaceError};
pub use xpander::{Banner, XpanderDisplay};
