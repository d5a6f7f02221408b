//! Pixel encodings.
//!
//! [`PixelFormat`] is a stateless strategy: it knows how one `(x, y)`
//! coordinate maps onto bytes and bits of a flat buffer laid out with a
//! given stride. The framebuffer picks a format once at construction and
//! delegates every pixel-level read and write to it.
//!
//! Coordinates handed to these methods are trusted to be in bounds;
//! clipping and rotation belong to [`Framebuffer`](crate::Framebuffer).

use crate::error::FramebufError;

/// Pack an 8-bit-per-channel triple into the `0xRRGGBB` colour value used
/// by the RGB formats.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Supported bit-packing schemes.
///
/// The discriminants are the numeric format ids used by the board
/// firmware (`2`, the 4-bit greyscale layout, has never been implemented
/// and is rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 1 bit per pixel, vertical bytes: each byte is a column of 8 rows,
    /// least-significant bit on top. SH1106/SSD1306 native layout.
    Mvlsb = 0,
    /// 16 bits per pixel, 5-6-5, little-endian.
    Rgb565 = 1,
    /// 1 bit per pixel, horizontal bytes, most-significant bit leftmost.
    Mhmsb = 3,
    /// 24 bits per pixel, bytes in R, G, B order.
    Rgb888 = 4,
    /// 2 bits per pixel greyscale, four horizontal pixels per byte,
    /// leftmost pixel in the low bits.
    Gs2Hmsb = 5,
}

impl TryFrom<u8> for PixelFormat {
    type Error = FramebufError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(PixelFormat::Mvlsb),
            1 => Ok(PixelFormat::Rgb565),
            3 => Ok(PixelFormat::Mhmsb),
            4 => Ok(PixelFormat::Rgb888),
            5 => Ok(PixelFormat::Gs2Hmsb),
            _ => Err(FramebufError::InvalidFormat),
        }
    }
}

#[inline]
fn write_bit(byte: &mut u8, bit: u32, on: bool) {
    *byte = (*byte & !(1 << bit)) | ((on as u8) << bit);
}

fn rgb565_bytes(color: u32) -> [u8; 2] {
    let r = (color >> 16) & 0xFF;
    let g = (color >> 8) & 0xFF;
    let b = color & 0xFF;
    let hi = (r & 0xF8) | (g >> 5);
    let lo = ((g << 3) & 0xE0) | (b >> 3);
    [lo as u8, hi as u8]
}

fn rgb565_color(lo: u8, hi: u8) -> u32 {
    let (lo, hi) = (lo as u32, hi as u32);
    let r = hi & 0xF8;
    let g = ((hi & 0x07) << 5) | ((lo & 0xE0) >> 3);
    let b = (lo & 0x1F) << 3;
    (r << 16) | (g << 8) | b
}

fn rgb888_bytes(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

impl PixelFormat {
    /// Numeric format id.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Number of bits one pixel occupies.
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Mvlsb | PixelFormat::Mhmsb => 1,
            PixelFormat::Gs2Hmsb => 2,
            PixelFormat::Rgb565 => 16,
            PixelFormat::Rgb888 => 24,
        }
    }

    /// Round a row pitch up so every row starts on a byte boundary.
    ///
    /// Horizontal sub-byte formats take the bit position from `x` alone,
    /// so rows must hold a whole number of bytes: multiples of 8 pixels
    /// for `Mhmsb`, of 4 for `Gs2Hmsb`. Other formats are returned as is.
    /// Returns `None` if the rounded pitch does not fit in `usize`.
    pub const fn align_stride(self, stride: usize) -> Option<usize> {
        let pixels_per_byte = match self {
            PixelFormat::Mhmsb => 8,
            PixelFormat::Gs2Hmsb => 4,
            PixelFormat::Mvlsb | PixelFormat::Rgb565 | PixelFormat::Rgb888 => 1,
        };
        stride.div_ceil(pixels_per_byte).checked_mul(pixels_per_byte)
    }

    /// Minimum buffer length, in bytes, that can hold a `width × height`
    /// image with rows `stride` pixels apart.
    ///
    /// This is the index of the last byte any in-bounds pixel touches,
    /// plus one. `stride` should already be [aligned](Self::align_stride).
    /// Returns `None` if the length does not fit in `usize`.
    pub fn required_len(self, width: usize, height: usize, stride: usize) -> Option<usize> {
        if width == 0 || height == 0 {
            return Some(0);
        }
        let last = || (height - 1).checked_mul(stride)?.checked_add(width - 1);
        match self {
            PixelFormat::Mvlsb => ((height - 1) >> 3).checked_mul(stride)?.checked_add(width),
            PixelFormat::Mhmsb => Some(last()? / 8 + 1),
            PixelFormat::Gs2Hmsb => Some((last()? >> 2) + 1),
            PixelFormat::Rgb565 => last()?.checked_add(1)?.checked_mul(2),
            PixelFormat::Rgb888 => last()?.checked_add(1)?.checked_mul(3),
        }
    }

    /// Reduce a colour to the value a read-back of the same pixel returns.
    pub fn normalize(self, color: u32) -> u32 {
        match self {
            PixelFormat::Mvlsb | PixelFormat::Mhmsb => (color != 0) as u32,
            PixelFormat::Gs2Hmsb => color & 0b11,
            PixelFormat::Rgb565 => {
                let [lo, hi] = rgb565_bytes(color);
                rgb565_color(lo, hi)
            }
            PixelFormat::Rgb888 => color & 0x00FF_FFFF,
        }
    }

    /// Brightest colour the format can represent.
    pub const fn full_intensity(self) -> u32 {
        match self {
            PixelFormat::Mvlsb | PixelFormat::Mhmsb => 1,
            PixelFormat::Gs2Hmsb => 0b11,
            PixelFormat::Rgb565 | PixelFormat::Rgb888 => 0x00FF_FFFF,
        }
    }

    /// Read the colour of pixel `(x, y)`.
    pub fn get_pixel(self, buf: &[u8], stride: usize, x: usize, y: usize) -> u32 {
        match self {
            PixelFormat::Mvlsb => {
                let index = (y >> 3) * stride + x;
                ((buf[index] >> (y & 0x07)) & 0x01) as u32
            }
            PixelFormat::Mhmsb => {
                let index = (y * stride + x) / 8;
                let offset = 7 - (x & 0x07);
                ((buf[index] >> offset) & 0x01) as u32
            }
            PixelFormat::Gs2Hmsb => {
                let index = (y * stride + x) >> 2;
                let shift = (x & 0b11) << 1;
                ((buf[index] >> shift) & 0b11) as u32
            }
            PixelFormat::Rgb565 => {
                let index = (y * stride + x) * 2;
                rgb565_color(buf[index], buf[index + 1])
            }
            PixelFormat::Rgb888 => {
                let index = (y * stride + x) * 3;
                ((buf[index] as u32) << 16) | ((buf[index + 1] as u32) << 8) | buf[index + 2] as u32
            }
        }
    }

    /// Write pixel `(x, y)`, leaving every other pixel sharing the same
    /// byte(s) untouched.
    pub fn set_pixel(self, buf: &mut [u8], stride: usize, x: usize, y: usize, color: u32) {
        match self {
            PixelFormat::Mvlsb => {
                let index = (y >> 3) * stride + x;
                write_bit(&mut buf[index], (y & 0x07) as u32, color != 0);
            }
            PixelFormat::Mhmsb => {
                let index = (y * stride + x) / 8;
                write_bit(&mut buf[index], 7 - (x & 0x07) as u32, color != 0);
            }
            PixelFormat::Gs2Hmsb => {
                let index = (y * stride + x) >> 2;
                let shift = (x & 0b11) << 1;
                let mask = 0b11u8 << shift;
                let bits = ((color & 0b11) as u8) << shift;
                buf[index] = bits | (buf[index] & !mask);
            }
            PixelFormat::Rgb565 => {
                let index = (y * stride + x) * 2;
                buf[index..index + 2].copy_from_slice(&rgb565_bytes(color));
            }
            PixelFormat::Rgb888 => {
                let index = (y * stride + x) * 3;
                buf[index..index + 3].copy_from_slice(&rgb888_bytes(color));
            }
        }
    }

    /// Fill the whole buffer with one colour.
    ///
    /// Sub-byte formats replicate the colour across every field of each
    /// byte; multi-byte formats write every complete pixel-sized chunk.
    pub fn fill(self, buf: &mut [u8], color: u32) {
        match self {
            PixelFormat::Mvlsb | PixelFormat::Mhmsb => {
                buf.fill(if color != 0 { 0xFF } else { 0x00 });
            }
            PixelFormat::Gs2Hmsb => {
                let bits = (color & 0b11) as u8;
                buf.fill((bits << 6) | (bits << 4) | (bits << 2) | bits);
            }
            PixelFormat::Rgb565 => {
                let bytes = rgb565_bytes(color);
                for chunk in buf.chunks_exact_mut(2) {
                    chunk.copy_from_slice(&bytes);
                }
            }
            PixelFormat::Rgb888 => {
                let bytes = rgb888_bytes(color);
                for chunk in buf.chunks_exact_mut(3) {
                    chunk.copy_from_slice(&bytes);
                }
            }
        }
    }

    /// Fill a `width × height` block whose top-left corner is `(x, y)`.
    ///
    /// Produces exactly the same buffer as calling
    /// [`set_pixel`](Self::set_pixel) for every covered coordinate.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_rect(
        self,
        buf: &mut [u8],
        stride: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        color: u32,
    ) {
        match self {
            PixelFormat::Mvlsb => {
                let on = color != 0;
                for row in y..y + height {
                    let index = (row >> 3) * stride + x;
                    let bit = (row & 0x07) as u32;
                    for byte in &mut buf[index..index + width] {
                        write_bit(byte, bit, on);
                    }
                }
            }
            PixelFormat::Mhmsb => {
                let on = color != 0;
                for col in x..x + width {
                    let bit = 7 - (col & 0x07) as u32;
                    for row in y..y + height {
                        write_bit(&mut buf[(row * stride + col) / 8], bit, on);
                    }
                }
            }
            PixelFormat::Rgb565 => {
                let bytes = rgb565_bytes(color);
                for row in y..y + height {
                    let start = (row * stride + x) * 2;
                    for chunk in buf[start..start + width * 2].chunks_exact_mut(2) {
                        chunk.copy_from_slice(&bytes);
                    }
                }
            }
            PixelFormat::Rgb888 => {
                let bytes = rgb888_bytes(color);
                for row in y..y + height {
                    let start = (row * stride + x) * 3;
                    for chunk in buf[start..start + width * 3].chunks_exact_mut(3) {
                        chunk.copy_from_slice(&bytes);
                    }
                }
            }
            PixelFormat::Gs2Hmsb => {
                for row in y..y + height {
                    for col in x..x + width {
                        self.set_pixel(buf, stride, col, row, color);
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
