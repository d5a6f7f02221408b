//! Four-wire serial transport.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use super::{DisplayInterface, Page};
use crate::command::SPI_COLUMN_OFFSET;

/// Errors from the SPI transport.
#[derive(Debug)]
pub enum SpiInterfaceError<E> {
    /// Underlying SPI bus error.
    Spi(E),
    /// The D/C or chip-select pin could not be driven.
    Pin,
}

impl<E: fmt::Debug> fmt::Display for SpiInterfaceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpiInterfaceError::Spi(e) => write!(f, "SPI error: {:?}", e),
            SpiInterfaceError::Pin => write!(f, "D/C or CS pin error"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for SpiInterfaceError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SpiInterfaceError::Spi(e) => defmt::write!(f, "SPI error: {}", e),
            SpiInterfaceError::Pin => defmt::write!(f, "D/C or CS pin error"),
        }
    }
}

/// SH1106 over a shared SPI bus with data/command and chip-select lines.
///
/// D/C is driven low before command bytes and high before display data.
/// CS is pulled low for each transfer and released after it. Column
/// offset defaults to [`SPI_COLUMN_OFFSET`].
pub struct SpiInterface<'a, M: RawMutex, SPI, DC, CS> {
    bus: &'a Mutex<M, SPI>,
    dc: DC,
    cs: CS,
    column_offset: u8,
}

impl<'a, M, SPI, DC, CS> SpiInterface<'a, M, SPI, DC, CS>
where
    M: RawMutex,
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    pub fn new(bus: &'a Mutex<M, SPI>, dc: DC, cs: CS) -> Self {
        Self {
            bus,
            dc,
            cs,
            column_offset: SPI_COLUMN_OFFSET,
        }
    }

    /// Override the first RAM column used for pixel 0.
    pub fn with_column_offset(mut self, column_offset: u8) -> Self {
        self.column_offset = column_offset;
        self
    }

    /// Give back the control pins.
    pub fn release(self) -> (DC, CS) {
        (self.dc, self.cs)
    }

    /// Select the chip, write `bytes` with D/C at `data`, deselect.
    async fn transfer(
        bus: &mut SPI,
        dc: &mut DC,
        cs: &mut CS,
        data: bool,
        bytes: &[u8],
    ) -> Result<(), SpiInterfaceError<SPI::Error>> {
        dc.set_state(data.into()).map_err(|_| SpiInterfaceError::Pin)?;
        cs.set_low().map_err(|_| SpiInterfaceError::Pin)?;
        let written = bus.write(bytes).await;
        let flushed = bus.flush().await;
        cs.set_high().map_err(|_| SpiInterfaceError::Pin)?;
        written.and(flushed).map_err(SpiInterfaceError::Spi)
    }
}

impl<M, SPI, DC, CS> DisplayInterface for SpiInterface<'_, M, SPI, DC, CS>
where
    M: RawMutex,
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    type Error = SpiInterfaceError<SPI::Error>;

    fn column_offset(&self) -> u8 {
        self.column_offset
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), Self::Error> {
        let mut bus = self.bus.lock().await;
        for command in commands {
            Self::transfer(
                &mut bus,
                &mut self.dc,
                &mut self.cs,
                false,
                core::slice::from_ref(command),
            )
            .await?;
        }
        Ok(())
    }

    async fn send_pages<'p, I>(&mut self, pages: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Page<'p>>,
    {
        let mut bus = self.bus.lock().await;
        for page in pages {
            for command in &page.commands {
                Self::transfer(
                    &mut bus,
                    &mut self.dc,
                    &mut self.cs,
                    false,
                    core::slice::from_ref(command),
                )
                .await?;
            }
            Self::transfer(&mut bus, &mut self.dc, &mut self.cs, true, page.data).await?;
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
