//! Recording mocks of the embedded-hal traits, shared by the unit tests.
//!
//! Every mock appends to one shared [`Log`] so tests can assert on the
//! exact interleaving of bus writes, pin edges and delays.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{self, I2c, Operation};
use embedded_hal_async::spi::{self, SpiBus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One I2C transaction; adjacent write operations are merged.
    I2cWrite(u8, Vec<u8>),
    SpiWrite(Vec<u8>),
    Pin(&'static str, bool),
    DelayNs(u32),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// All I2C payloads in the log, in order.
pub fn i2c_writes(log: &Log) -> Vec<Vec<u8>> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::I2cWrite(_, bytes) => Some(bytes.clone()),
            _ => None,
        })
        .collect()
}

// ── I2C ──────────────────────────────────────────────────────────────────

pub struct MockI2c {
    log: Log,
    /// Number of transactions to accept before failing; `None` never fails.
    pub fail_after: Option<usize>,
    completed: usize,
}

impl MockI2c {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            fail_after: None,
            completed: 0,
        }
    }

    pub fn failing(log: Log) -> Self {
        Self {
            log,
            fail_after: Some(0),
            completed: 0,
        }
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail_after.is_some_and(|limit| self.completed >= limit) {
            return Err(i2c::ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address));
        }
        let mut bytes = Vec::new();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => bytes.extend_from_slice(data),
                Operation::Read(buf) => buf.fill(0),
            }
        }
        self.log.borrow_mut().push(Event::I2cWrite(address, bytes));
        self.completed += 1;
        Ok(())
    }
}

// ── SPI ──────────────────────────────────────────────────────────────────

pub struct MockSpi {
    log: Log,
}

impl MockSpi {
    pub fn new(log: Log) -> Self {
        Self { log }
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus<u8> for MockSpi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::SpiWrite(words.to_vec()));
        Ok(())
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write).await
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::SpiWrite(words.to_vec()));
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ── Pins and delay ───────────────────────────────────────────────────────

pub struct MockPin {
    name: &'static str,
    log: Log,
}

impl MockPin {
    pub fn new(name: &'static str, log: Log) -> Self {
        Self { name, log }
    }
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, true));
        Ok(())
    }
}

pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: Log) -> Self {
        Self { log }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms * 1_000_000).await;
    }
}

/// Delay that records nothing, for tests that only inspect bus traffic.
pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}
