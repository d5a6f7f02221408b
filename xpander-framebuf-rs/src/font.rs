//! Binary bitmap fonts.
//!
//! A font resource is a flat byte table:
//!
//! ```text
//! byte 0          glyph width  (columns)
//! byte 1          glyph height (rows, at most 8 are used)
//! bytes 2..       256 glyphs × width column bytes, in code-point order
//! ```
//!
//! Each column byte holds one glyph column, bit 0 at the top. Glyphs are
//! read column by column straight from the [`FontSource`], so a font
//! living in flash never has to be copied into RAM.

use heapless::String;

use crate::error::FontError;
use crate::framebuffer::Framebuffer;

/// Name of the font the board firmware renders with by default.
pub const DEFAULT_FONT: &str = "font5x8.bin";

/// Longest font name [`FontCache`] remembers.
pub const MAX_FONT_NAME: usize = 32;

// ── FontSource ───────────────────────────────────────────────────────────

/// Byte-addressable font resource.
pub trait FontSource {
    /// Total size of the resource in bytes.
    fn size(&self) -> usize;

    /// Fill `buf` with the bytes starting at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), FontError>;
}

impl FontSource for &[u8] {
    fn size(&self) -> usize {
        self.len()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), FontError> {
        let end = offset.checked_add(buf.len()).ok_or(FontError::Read)?;
        let bytes = self.get(offset..end).ok_or(FontError::Read)?;
        buf.copy_from_slice(bytes);
        Ok(())
    }
}

// ── BitmapFont ───────────────────────────────────────────────────────────

/// A validated bitmap font backed by a [`FontSource`].
pub struct BitmapFont<S> {
    source: S,
    font_width: u8,
    font_height: u8,
}

impl<S: FontSource> BitmapFont<S> {
    /// Read and validate the font header.
    ///
    /// # Errors
    /// * [`FontError::Read`] if the two header bytes cannot be read.
    /// * [`FontError::InvalidFont`] if the resource is not exactly
    ///   `2 + 256 * width` bytes long.
    pub fn load(mut source: S) -> Result<Self, FontError> {
        let mut header = [0u8; 2];
        source.read(0, &mut header)?;
        let [font_width, font_height] = header;

        if source.size() != 2 + 256 * font_width as usize {
            return Err(FontError::InvalidFont);
        }

        Ok(Self {
            source,
            font_width,
            font_height,
        })
    }

    /// Glyph width in pixels.
    pub fn font_width(&self) -> u8 {
        self.font_width
    }

    /// Glyph height in pixels.
    pub fn font_height(&self) -> u8 {
        self.font_height
    }

    /// Pixel width of `text` on one line, including the one-pixel gap after
    /// every glyph.
    pub fn width(&self, text: &str) -> usize {
        text.chars().count() * (self.font_width as usize + 1)
    }

    /// Rasterise one glyph with its top-left corner at `(x, y)`.
    ///
    /// Every set font bit becomes a `size × size` block. Characters beyond
    /// the 256-entry table draw nothing, and a column whose bytes cannot be
    /// read is skipped so the rest of the text still renders.
    pub fn draw_char<B>(
        &mut self,
        ch: char,
        x: i32,
        y: i32,
        target: &mut Framebuffer<B>,
        color: u32,
        size: u32,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.draw_glyph(ch, x.into(), y.into(), target, color, size.max(1).into());
    }

    pub(crate) fn draw_glyph<B>(
        &mut self,
        ch: char,
        x: i64,
        y: i64,
        target: &mut Framebuffer<B>,
        color: u32,
        size: i64,
    ) where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let code = ch as u32;
        if code > 0xFF {
            return;
        }

        let width = self.font_width as usize;
        let rows = self.font_height.min(8);

        for column in 0..width {
            let mut line = [0u8; 1];
            if self.source.read(2 + code as usize * width + column, &mut line).is_err() {
                continue;
            }
            for row in 0..rows {
                if (line[0] >> row) & 0x01 != 0 {
                    let (px, py) = (x + column as i64 * size, y + i64::from(row) * size);
                    target.draw_rect(px, py, size, size, color, true);
                }
            }
        }
    }

    /// Release the underlying resource.
    pub fn into_source(self) -> S {
        self.source
    }
}

// ── Font lookup ──────────────────────────────────────────────────────────

/// Resolves font names to resources.
pub trait FontLibrary {
    type Source: FontSource;

    /// Open the resource registered as `name`, if any.
    fn open(&mut self, name: &str) -> Option<Self::Source>;
}

/// A [`FontLibrary`] over a fixed table of in-memory fonts, typically
/// `include_bytes!` data.
///
/// ```
/// use xpander_framebuf::{FontLibrary, StaticFonts};
///
/// static FONT: [u8; 2 + 256 * 5] = {
///     let mut data = [0u8; 2 + 256 * 5];
///     data[0] = 5;
///     data[1] = 8;
///     data
/// };
/// let table = [("font5x8.bin", &FONT[..])];
/// let mut fonts = StaticFonts::new(&table);
/// assert!(fonts.open("font5x8.bin").is_some());
/// assert!(fonts.open("missing.bin").is_none());
/// ```
#[derive(Clone, Copy)]
pub struct StaticFonts<'a> {
    fonts: &'a [(&'a str, &'a [u8])],
}

impl<'a> StaticFonts<'a> {
    pub const fn new(fonts: &'a [(&'a str, &'a [u8])]) -> Self {
        Self { fonts }
    }
}

impl<'a> FontLibrary for StaticFonts<'a> {
    type Source = &'a [u8];

    fn open(&mut self, name: &str) -> Option<Self::Source> {
        self.fonts
            .iter()
            .find(|(font_name, _)| *font_name == name)
            .map(|(_, data)| *data)
    }
}

/// Lazily loads one font at a time and keeps it while the same name is
/// requested.
///
/// Asking for a different name drops the cached font and loads the new
/// one. Names longer than [`MAX_FONT_NAME`] still load but are not
/// remembered, so they are reloaded on every request.
pub struct FontCache<L: FontLibrary> {
    library: L,
    name: String<MAX_FONT_NAME>,
    font: Option<BitmapFont<L::Source>>,
}

impl<L: FontLibrary> FontCache<L> {
    pub fn new(library: L) -> Self {
        Self {
            library,
            name: String::new(),
            font: None,
        }
    }

    /// Return the font registered as `name`, loading it on first use.
    ///
    /// # Errors
    /// * [`FontError::NotFound`] if the library has no such font.
    /// * [`FontError::InvalidFont`] / [`FontError::Read`] if it is malformed.
    pub fn get(&mut self, name: &str) -> Result<&mut BitmapFont<L::Source>, FontError> {
        if self.font.is_none() || self.name.is_empty() || self.name.as_str() != name {
            self.font = None;
            self.name.clear();

            let source = self.library.open(name).ok_or(FontError::NotFound)?;
            let font = BitmapFont::load(source)?;

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "loaded font {=str} ({}x{})",
                name,
                font.font_width(),
                font.font_height()
            );

            if self.name.push_str(name).is_err() {
                // Too long to remember: an empty name never matches, so the
                // next request reloads.
                self.name.clear();
            }
            self.font = Some(font);
        }

        self.font.as_mut().ok_or(FontError::NotFound)
    }

    /// Name of the currently cached font, if any.
    pub fn loaded(&self) -> Option<&str> {
        self.font.as_ref().map(|_| self.name.as_str())
    }

    /// Drop the cached font.
    pub fn release(&mut self) {
        self.font = None;
        self.name.clear();
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
