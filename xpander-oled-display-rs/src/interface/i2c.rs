//! Two-wire transport.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::i2c::{I2c, Operation};

use super::{DisplayInterface, Page};
use crate::command::{CONTROL_COMMAND, CONTROL_DATA};

/// SH1106 over a shared I2C bus.
///
/// The bus lives in an `embassy-sync` [`Mutex`] so the display can share
/// it with other peripherals. Every command is its own two-byte write
/// `[0x00, cmd]`; every page of data is one write transaction of `0x40`
/// followed by the page bytes.
pub struct I2cInterface<'a, M: RawMutex, I2C> {
    bus: &'a Mutex<M, I2C>,
    address: u8,
    column_offset: u8,
}

impl<'a, M: RawMutex, I2C> I2cInterface<'a, M, I2C> {
    /// Create a transport for the device at the 7-bit `address` (usually
    /// [`DEFAULT_ADDRESS`](crate::command::DEFAULT_ADDRESS)). Column
    /// offset defaults to 0.
    pub fn new(bus: &'a Mutex<M, I2C>, address: u8) -> Self {
        Self {
            bus,
            address,
            column_offset: 0,
        }
    }

    /// Override the first RAM column used for pixel 0.
    pub fn with_column_offset(mut self, column_offset: u8) -> Self {
        self.column_offset = column_offset;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}

async fn write_command<I2C: I2c>(
    bus: &mut I2C,
    address: u8,
    command: u8,
) -> Result<(), I2C::Error> {
    bus.write(address, &[CONTROL_COMMAND, command]).await
}

impl<M: RawMutex, I2C: I2c> DisplayInterface for I2cInterface<'_, M, I2C> {
    type Error = I2C::Error;

    fn column_offset(&self) -> u8 {
        self.column_offset
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        for &command in commands {
            write_command(&mut *bus, self.address, command).await?;
        }
        Ok(())
    }

    async fn send_pages<'p, I>(&mut self, pages: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Page<'p>>,
    {
        let mut bus = self.bus.lock().await;
        for page in pages {
            for &command in &page.commands {
                write_command(&mut *bus, self.address, command).await?;
            }
            // Adjacent writes in one transaction go out as a single
            // START ... STOP, so the control byte needs no copy buffer.
            bus.transaction(
                self.address,
                &mut [Operation::Write(&[CONTROL_DATA]), Operation::Write(page.data)],
            )
            .await?;
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
