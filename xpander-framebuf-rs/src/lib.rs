//! Pixel framebuffer and drawing primitives for the Xpander I/O board.
//!
//! This crate is the hardware-independent half of the display stack. It
//! holds the in-memory image that a display driver later streams to the
//! panel, and knows nothing about buses.
//!
//! # Architecture
//!
//! - **[`PixelFormat`]**: stateless bit-packing strategies (`MVLSB`,
//!   `MHMSB`, `RGB565`, `RGB888`, `GS2_HMSB`). Chosen once when the
//!   framebuffer is built.
//! - **[`Framebuffer`]**: owns the byte buffer, applies [`Rotation`] and
//!   clipping, and provides pixel, line, rectangle, circle, scroll, text
//!   and image operations. Also an `embedded-graphics`
//!   [`DrawTarget`](embedded_graphics::draw_target::DrawTarget).
//! - **[`BitmapFont`]**: reads glyph columns from a binary font resource
//!   and rasterises them. [`FontCache`] loads fonts lazily by name.
//!
//! # Quick start
//!
//! ```
//! use xpander_framebuf::{BitmapFont, Framebuffer, PixelFormat};
//!
//! let mut font_data = [0u8; 2 + 256 * 5];
//! font_data[0] = 5; // glyph width
//! font_data[1] = 8; // glyph height
//! let mut font = BitmapFont::load(&font_data[..]).unwrap();
//!
//! let mut fb = Framebuffer::new([0u8; 1024], 128, 64, PixelFormat::Mvlsb).unwrap();
//! fb.fill(0);
//! fb.circle(64, 32, 20, 1);
//! fb.text("Hello world!", 0, 0, 1, &mut font, 1);
//! ```
//!
//! # Features
//!
//! - **`defmt`**: [`defmt::Format`] implementations on public types and
//!   debug logging of font loads.

#![no_std]

pub mod error;
pub mod font;
pub mod format;
pub mod framebuffer;
mod graphics;

pub use error::{FontError, FramebufError};
pub use font::{
    BitmapFont, FontCache, FontLibrary, FontSource, StaticFonts, DEFAULT_FONT, MAX_FONT_NAME,
};
pub use format::{rgb, PixelFormat};
pub use framebuffer::{Framebuffer, Rotation};
