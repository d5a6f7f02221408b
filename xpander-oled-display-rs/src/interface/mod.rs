//! Transports that carry SH1106 commands and display data.
//!
//! A [`DisplayInterface`] knows how to frame bytes for one bus (I2C
//! control bytes, or the SPI D/C line) and holds the shared-bus lock for
//! the duration of each multi-byte exchange. The command protocol itself
//! lives in [`Sh1106`](crate::Sh1106).

mod i2c;
mod spi;

pub use i2c::I2cInterface;
pub use spi::{SpiInterface, SpiInterfaceError};

/// One page of display RAM ready for transfer: the three addressing
/// commands from [`page_address`](crate::command::page_address) and the
/// page's data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a> {
    pub commands: [u8; 3],
    pub data: &'a [u8],
}

/// Byte transport to an SH1106 controller.
#[allow(async_fn_in_trait)]
pub trait DisplayInterface {
    /// Transport error type.
    type Error;

    /// First RAM column the panel's pixel 0 maps to.
    fn column_offset(&self) -> u8;

    /// Send a run of command bytes while holding the bus once.
    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), Self::Error>;

    /// Send every page (commands, then data) while holding the bus once.
    async fn send_pages<'p, I>(&mut self, pages: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Page<'p>>;
}
