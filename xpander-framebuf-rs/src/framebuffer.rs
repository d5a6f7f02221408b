//! The drawing surface.
//!
//! [`Framebuffer`] owns a flat byte buffer and exposes the drawing
//! primitives used by the display layer. Every public drawing call first
//! maps logical coordinates through the active [`Rotation`], clips against
//! the physical bounds, and only then hands in-bounds work to the
//! [`PixelFormat`].
//!
//! Out-of-bounds pixels are dropped silently so that animations and text
//! may run off the edge of the screen without error.

use embedded_graphics::{
    image::{Image, ImageDrawable},
    pixelcolor::BinaryColor,
    prelude::*,
};

use crate::error::FramebufError;
use crate::font::{BitmapFont, FontSource};
use crate::format::PixelFormat;

// ── Rotation ─────────────────────────────────────────────────────────────

/// Mounting orientation, in clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Identity.
    #[default]
    Deg0 = 0,
    /// Axes swapped, x mirrored.
    Deg90 = 1,
    /// Both axes mirrored.
    Deg180 = 2,
    /// Axes swapped, y mirrored.
    Deg270 = 3,
}

impl TryFrom<u8> for Rotation {
    type Error = FramebufError;

    fn try_from(quarter_turns: u8) -> Result<Self, Self::Error> {
        match quarter_turns {
            0 => Ok(Rotation::Deg0),
            1 => Ok(Rotation::Deg90),
            2 => Ok(Rotation::Deg180),
            3 => Ok(Rotation::Deg270),
            _ => Err(FramebufError::InvalidRotation),
        }
    }
}

impl Rotation {
    /// Number of clockwise quarter turns (0–3).
    pub const fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// `true` for the two orientations that exchange width and height.
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

// ── Framebuffer ──────────────────────────────────────────────────────────

/// In-memory pixel buffer with a fixed geometry and pixel format.
///
/// `B` is the backing storage: an owned array (`[u8; N]`), a borrowed
/// slice (`&mut [u8]`), or anything else that derefs to bytes. The
/// buffer is never resized after construction.
///
/// # Example
///
/// ```
/// use xpander_framebuf::{Framebuffer, PixelFormat};
///
/// let mut fb = Framebuffer::new([0u8; 1024], 128, 64, PixelFormat::Mvlsb).unwrap();
/// fb.rect(0, 0, 128, 64, 1, false);
/// fb.line(0, 0, 127, 63, 1);
/// assert_eq!(fb.get_pixel(127, 63), Some(1));
/// ```
pub struct Framebuffer<B> {
    buf: B,
    width: u32,
    height: u32,
    stride: u32,
    rotation: Rotation,
    format: PixelFormat,
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a framebuffer whose rows are exactly `width` pixels apart.
    ///
    /// # Errors
    /// * [`FramebufError::InvalidDimensions`] if `width` or `height` is zero.
    /// * [`FramebufError::BufferTooSmall`] if `buf` cannot hold every pixel.
    pub fn new(
        buf: B,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self, FramebufError> {
        Self::with_stride(buf, width, height, width, format)
    }

    /// Create a framebuffer whose rows are `stride` pixels apart.
    ///
    /// A stride wider than `width` lets a framebuffer address a window of a
    /// larger buffer. `Mhmsb` and `Gs2Hmsb` round the stride up to a whole
    /// byte per row (8 and 4 pixels); [`stride()`](Self::stride) reports
    /// the rounded value.
    ///
    /// # Errors
    /// * [`FramebufError::InvalidDimensions`] if `width` or `height` is
    ///   zero, `stride < width`, or the geometry overflows the address space.
    /// * [`FramebufError::BufferTooSmall`] if `buf` cannot hold every pixel.
    pub fn with_stride(
        buf: B,
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Result<Self, FramebufError> {
        if width == 0 || height == 0 || stride < width {
            return Err(FramebufError::InvalidDimensions);
        }

        let stride = format
            .align_stride(stride as usize)
            .and_then(|stride| u32::try_from(stride).ok())
            .ok_or(FramebufError::InvalidDimensions)?;
        let required = format
            .required_len(width as usize, height as usize, stride as usize)
            .ok_or(FramebufError::InvalidDimensions)?;
        let actual = buf.as_ref().len();
        if actual < required {
            return Err(FramebufError::BufferTooSmall { required, actual });
        }

        Ok(Self {
            buf,
            width,
            height,
            stride,
            rotation: Rotation::Deg0,
            format,
        })
    }

    // ── Geometry ─────────────────────────────────────────────────────

    /// Physical width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Physical height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in pixels.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Set the mounting orientation from a quarter-turn count.
    ///
    /// # Errors
    /// [`FramebufError::InvalidRotation`] unless `quarter_turns` is 0–3;
    /// the current rotation is kept in that case.
    pub fn set_rotation(&mut self, quarter_turns: u8) -> Result<(), FramebufError> {
        self.rotation = Rotation::try_from(quarter_turns)?;
        Ok(())
    }

    /// Logical `(width, height)` as seen by drawing calls under the current
    /// rotation.
    pub fn frame_size(&self) -> (u32, u32) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    // ── Raw buffer access ────────────────────────────────────────────

    pub fn buffer(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// Release the backing storage.
    pub fn into_inner(self) -> B {
        self.buf
    }

    // ── Coordinate mapping ───────────────────────────────────────────
    //
    // Internal maths runs in i64 so no i32 argument can overflow it.

    fn physical_size(&self) -> (i64, i64) {
        (i64::from(self.width), i64::from(self.height))
    }

    /// Rotate logical `(x, y)` and return its buffer position, if in bounds.
    fn to_physical(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let (w, h) = self.physical_size();
        let (x, y) = match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - y - 1, x),
            Rotation::Deg180 => (w - x - 1, h - y - 1),
            Rotation::Deg270 => (y, h - x - 1),
        };
        (x >= 0 && y >= 0 && x < w && y < h).then_some((x as usize, y as usize))
    }

    fn plot(&mut self, x: i64, y: i64, color: u32) {
        if let Some((x, y)) = self.to_physical(x, y) {
            let stride = self.stride as usize;
            self.format.set_pixel(self.buf.as_mut(), stride, x, y, color);
        }
    }

    // ── Pixels ───────────────────────────────────────────────────────

    /// Fill the entire buffer with `color`.
    pub fn fill(&mut self, color: u32) {
        self.format.fill(self.buf.as_mut(), color);
    }

    /// Read the colour at logical `(x, y)`, or `None` if it lies outside the
    /// frame.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        let (x, y) = self.to_physical(x.into(), y.into())?;
        let stride = self.stride as usize;
        Some(self.format.get_pixel(self.buf.as_ref(), stride, x, y))
    }

    /// Set logical `(x, y)` to `color`. Does nothing outside the frame.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        self.plot(x.into(), y.into(), color);
    }

    // ── Rectangles and straight lines ────────────────────────────────

    /// Draw a filled rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        self.rect(x, y, width, height, color, true);
    }

    /// Draw a horizontal line `width` pixels long.
    pub fn hline(&mut self, x: i32, y: i32, width: i32, color: u32) {
        self.rect(x, y, width, 1, color, true);
    }

    /// Draw a vertical line `height` pixels long.
    pub fn vline(&mut self, x: i32, y: i32, height: i32, color: u32) {
        self.rect(x, y, 1, height, color, true);
    }

    /// Draw a rectangle, either filled or as a 1 pixel outline.
    ///
    /// The rectangle is rotated as a whole, then clipped to the buffer; a
    /// clipped area of zero draws nothing. The outline is the four edges,
    /// each drawn with one bulk fill.
    pub fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32, fill: bool) {
        self.draw_rect(x.into(), y.into(), width.into(), height.into(), color, fill);
    }

    pub(crate) fn draw_rect(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        color: u32,
        fill: bool,
    ) {
        let (w, h) = self.physical_size();
        let (x, y, width, height) = match self.rotation {
            Rotation::Deg0 => (x, y, width, height),
            Rotation::Deg90 => (w - y - height, x, height, width),
            Rotation::Deg180 => (w - x - width, h - y - height, width, height),
            Rotation::Deg270 => (y, h - x - width, height, width),
        };

        if width < 1 || height < 1 || x + width <= 0 || y + height <= 0 || x >= w || y >= h {
            return;
        }

        let x_end = (w - 1).min(x + width - 1) as usize;
        let y_end = (h - 1).min(y + height - 1) as usize;
        let x = x.max(0) as usize;
        let y = y.max(0) as usize;
        let span_w = x_end - x + 1;
        let span_h = y_end - y + 1;

        let stride = self.stride as usize;
        let format = self.format;
        let buf = self.buf.as_mut();
        if fill {
            format.fill_rect(buf, stride, x, y, span_w, span_h, color);
        } else {
            format.fill_rect(buf, stride, x, y, span_w, 1, color);
            format.fill_rect(buf, stride, x, y, 1, span_h, color);
            format.fill_rect(buf, stride, x, y_end, span_w, 1, color);
            format.fill_rect(buf, stride, x_end, y, 1, span_h, color);
        }
    }

    /// Draw a line from `(x0, y0)` to `(x1, y1)` inclusive using integer
    /// Bresenham stepping.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 > x1 { -1 } else { 1 };
        let sy = if y0 > y1 { -1 } else { 1 };
        let (mut x, mut y) = (x0, y0);

        if dx > dy {
            let mut err = dx / 2;
            while x != x1 {
                self.plot(x, y, color);
                err -= dy;
                if err < 0 {
                    y += sy;
                    err += dx;
                }
                x += sx;
            }
        } else {
            let mut err = dy / 2;
            while y != y1 {
                self.plot(x, y, color);
                err -= dx;
                if err < 0 {
                    x += sx;
                    err += dy;
                }
                y += sy;
            }
        }
        self.plot(x, y, color);
    }

    // ── Circles ──────────────────────────────────────────────────────

    /// Draw a 1 pixel circle outline with the midpoint algorithm.
    ///
    /// Each step plots the eight octant reflections of one point. A
    /// negative radius draws nothing.
    pub fn circle(&mut self, center_x: i32, center_y: i32, radius: i32, color: u32) {
        let (center_x, center_y) = (i64::from(center_x), i64::from(center_y));
        let radius = i64::from(radius);
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while x >= y {
            self.plot(center_x + x, center_y + y, color);
            self.plot(center_x + y, center_y + x, color);
            self.plot(center_x - y, center_y + x, color);
            self.plot(center_x - x, center_y + y, color);
            self.plot(center_x - x, center_y - y, color);
            self.plot(center_x - y, center_y - x, color);
            self.plot(center_x + y, center_y - x, color);
            self.plot(center_x + x, center_y - y, color);

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    // ── Scrolling ────────────────────────────────────────────────────

    /// Shift the physical buffer contents by `(delta_x, delta_y)`.
    ///
    /// Pixels pushed past the edge are lost. The band uncovered at the
    /// opposite edge is **not** cleared: it keeps whatever was there, so
    /// fill it afterwards if a clean edge is needed. A shift of the full
    /// width or height (or more) leaves the buffer untouched.
    pub fn scroll(&mut self, delta_x: i32, delta_y: i32) {
        if delta_x.unsigned_abs() >= self.width || delta_y.unsigned_abs() >= self.height {
            return;
        }
        let (w, h) = self.physical_size();
        let (delta_x, delta_y) = (i64::from(delta_x), i64::from(delta_y));

        // Walk away from the direction of travel so every source pixel is
        // read before it is overwritten.
        let (x_start, x_end, x_step) = if delta_x < 0 {
            (0, w + delta_x, 1)
        } else {
            (w - 1, delta_x - 1, -1)
        };
        let (y_start, y_end, y_step) = if delta_y < 0 {
            (0, h + delta_y, 1)
        } else {
            (h - 1, delta_y - 1, -1)
        };

        let stride = self.stride as usize;
        let format = self.format;
        let buf = self.buf.as_mut();

        let mut y = y_start;
        while y != y_end {
            let mut x = x_start;
            while x != x_end {
                let (src_x, src_y) = ((x - delta_x) as usize, (y - delta_y) as usize);
                let color = format.get_pixel(buf, stride, src_x, src_y);
                format.set_pixel(buf, stride, x as usize, y as usize, color);
                x += x_step;
            }
            y += y_step;
        }
    }

    // ── Text ─────────────────────────────────────────────────────────

    /// Render `text` with a bitmap font, top-left corner at `(x, y)`.
    ///
    /// Lines break on `'\n'`. Glyphs advance by `font_width + 1` pixels
    /// and lines by `font_height`, both scaled by `size` (minimum 1). Glyphs
    /// that fall completely outside the frame are skipped; no wrapping is
    /// performed.
    pub fn text<S: FontSource>(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: u32,
        font: &mut BitmapFont<S>,
        size: u32,
    ) {
        let (frame_width, frame_height) = self.frame_size();
        let (frame_width, frame_height) = (i64::from(frame_width), i64::from(frame_height));
        let size = i64::from(size.max(1));
        let glyph_width = i64::from(font.font_width());
        let glyph_height = i64::from(font.font_height());
        let advance = (glyph_width + 1) * size;

        let mut y = i64::from(y);
        for line in text.split('\n') {
            let mut char_x = i64::from(x);
            for ch in line.chars() {
                if char_x >= frame_width {
                    break;
                }
                if char_x + glyph_width * size > 0 && y + glyph_height * size > 0 && y < frame_height
                {
                    font.draw_glyph(ch, char_x, y, self, color, size);
                }
                char_x += advance;
            }
            y += glyph_height * size;
        }
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Replace the frame with a monochrome image.
    ///
    /// The image must have exactly the rotation-adjusted frame size. The
    /// buffer is cleared, then every lit image pixel is set to the format's
    /// full intensity.
    ///
    /// # Errors
    /// [`FramebufError::DimensionMismatch`] if the sizes differ; the buffer
    /// is left untouched.
    pub fn image<I>(&mut self, image: &I) -> Result<(), FramebufError>
    where
        I: ImageDrawable<Color = BinaryColor>,
    {
        let (width, height) = self.frame_size();
        let size = image.size();
        if size.width != width || size.height != height {
            return Err(FramebufError::DimensionMismatch {
                expected: (width, height),
                actual: (size.width, size.height),
            });
        }

        self.buf.as_mut().fill(0);
        let Ok(()) = Image::new(image, Point::zero()).draw(self);
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::rgb;
    use embedded_graphics::image::ImageRaw;

    fn mono(width: u32, height: u32) -> Framebuffer<[u8; 512]> {
        Framebuffer::new([0u8; 512], width, height, PixelFormat::Mvlsb).unwrap()
    }

    fn lit<B: AsRef<[u8]> + AsMut<[u8]>>(fb: &Framebuffer<B>) -> usize {
        let (w, h) = fb.frame_size();
        let mut count = 0;
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                if fb.get_pixel(x, y).unwrap_or(0) != 0 {
                    count += 1;
                }
            }
        }
        count
    }

    /// 5×8 font where 'A' is a solid first column and 'B' lights only the
    /// top pixel of its first column.
    fn test_font_data() -> [u8; 2 + 256 * 5] {
        let mut data = [0u8; 2 + 256 * 5];
        data[0] = 5;
        data[1] = 8;
        data[2 + b'A' as usize * 5] = 0xFF;
        data[2 + b'B' as usize * 5] = 0x01;
        data
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_rejects_short_buffer() {
        let result = Framebuffer::new([0u8; 10], 20, 20, PixelFormat::Mvlsb);
        assert_eq!(
            result.err(),
            Some(FramebufError::BufferTooSmall { required: 60, actual: 10 })
        );
    }

    #[test]
    fn new_rejects_zero_dimensions_and_narrow_stride() {
        assert_eq!(
            Framebuffer::new([0u8; 8], 0, 8, PixelFormat::Mvlsb).err(),
            Some(FramebufError::InvalidDimensions)
        );
        assert_eq!(
            Framebuffer::with_stride([0u8; 64], 8, 8, 4, PixelFormat::Mvlsb).err(),
            Some(FramebufError::InvalidDimensions)
        );
    }

    #[test]
    fn format_id_errors_propagate_as_invalid_format() {
        let result = PixelFormat::try_from(2).and_then(|f| Framebuffer::new([0u8; 64], 8, 8, f));
        assert_eq!(result.err(), Some(FramebufError::InvalidFormat));
    }

    #[test]
    fn wide_stride_addresses_a_window() {
        let mut fb = Framebuffer::with_stride([0u8; 32], 8, 8, 16, PixelFormat::Mvlsb).unwrap();
        fb.set_pixel(7, 0, 1);
        assert_eq!(fb.buffer()[7], 0x01);
        fb.fill_rect(0, 0, 8, 8, 1);
        assert!(fb.buffer()[8..16].iter().all(|&b| b == 0));
    }

    #[test]
    fn horizontal_sub_byte_formats_pad_rows_to_whole_bytes() {
        let mut mono = Framebuffer::new([0u8; 4], 10, 2, PixelFormat::Mhmsb).unwrap();
        assert_eq!(mono.stride(), 16);
        mono.set_pixel(8, 0, 1);
        assert_eq!(mono.get_pixel(8, 0), Some(1));
        assert_eq!(mono.get_pixel(0, 1), Some(0));

        let mut grey = Framebuffer::new([0u8; 4], 5, 2, PixelFormat::Gs2Hmsb).unwrap();
        assert_eq!(grey.stride(), 8);
        grey.set_pixel(4, 0, 3);
        assert_eq!(grey.get_pixel(4, 0), Some(3));
        assert_eq!(grey.get_pixel(0, 1), Some(0));

        // Sized for unpadded rows.
        assert_eq!(
            Framebuffer::new([0u8; 3], 10, 2, PixelFormat::Mhmsb).err(),
            Some(FramebufError::BufferTooSmall { required: 4, actual: 3 })
        );
    }

    #[test]
    fn every_pixel_owns_its_bits_at_any_width() {
        let formats = [
            PixelFormat::Mvlsb,
            PixelFormat::Rgb565,
            PixelFormat::Mhmsb,
            PixelFormat::Rgb888,
            PixelFormat::Gs2Hmsb,
        ];
        for format in formats {
            for width in 1..=9 {
                for y in 0..3 {
                    for x in 0..width as i32 {
                        let mut fb = Framebuffer::new([0u8; 256], width, 3, format).unwrap();
                        fb.set_pixel(x, y, format.full_intensity());
                        assert_eq!(lit(&fb), 1, "{:?} width {} at ({}, {})", format, width, x, y);
                    }
                }
            }
        }
    }

    #[test]
    fn geometry_overflow_is_invalid() {
        let result = Framebuffer::new([0u8; 4], u32::MAX, u32::MAX, PixelFormat::Rgb888);
        assert_eq!(result.err(), Some(FramebufError::InvalidDimensions));
    }

    // ── Rotation ─────────────────────────────────────────────────────

    #[test]
    fn set_rotation_rejects_out_of_range() {
        let mut fb = mono(8, 8);
        assert_eq!(fb.set_rotation(4), Err(FramebufError::InvalidRotation));
        assert_eq!(fb.rotation(), Rotation::Deg0);
        assert_eq!(fb.set_rotation(3), Ok(()));
        assert_eq!(fb.rotation(), Rotation::Deg270);
    }

    #[test]
    fn rotation_maps_coordinates_per_formula() {
        let (w, h) = (12i32, 8i32);
        for turns in 0..4u8 {
            let mut sizer = mono(w as u32, h as u32);
            sizer.set_rotation(turns).unwrap();
            let (fw, fh) = sizer.frame_size();
            for ly in 0..fh as i32 {
                for lx in 0..fw as i32 {
                    let mut fb = mono(w as u32, h as u32);
                    fb.set_rotation(turns).unwrap();
                    fb.set_pixel(lx, ly, 1);

                    let expected = match turns {
                        0 => (lx, ly),
                        1 => (w - 1 - ly, lx),
                        2 => (w - 1 - lx, h - 1 - ly),
                        _ => (ly, h - 1 - lx),
                    };

                    // Read back physically, bypassing rotation.
                    fb.set_rotation(0).unwrap();
                    assert_eq!(
                        fb.get_pixel(expected.0, expected.1),
                        Some(1),
                        "turns {} ({}, {})",
                        turns,
                        lx,
                        ly
                    );
                    assert_eq!(lit(&fb), 1);
                }
            }
        }
    }

    #[test]
    fn rotated_rect_matches_rotated_pixels() {
        for turns in 0..4u8 {
            let mut bulk = mono(16, 8);
            let mut single = mono(16, 8);
            bulk.set_rotation(turns).unwrap();
            single.set_rotation(turns).unwrap();

            bulk.fill_rect(1, 2, 5, 3, 1);
            for y in 2..5 {
                for x in 1..6 {
                    single.set_pixel(x, y, 1);
                }
            }
            assert_eq!(bulk.buffer(), single.buffer(), "turns {}", turns);
        }
    }

    #[test]
    fn frame_size_swaps_for_quarter_turns() {
        let mut fb = mono(16, 8);
        assert_eq!(fb.frame_size(), (16, 8));
        fb.set_rotation(1).unwrap();
        assert_eq!(fb.frame_size(), (8, 16));
        fb.set_rotation(2).unwrap();
        assert_eq!(fb.frame_size(), (16, 8));
    }

    // ── Pixels ───────────────────────────────────────────────────────

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut fb = mono(8, 8);
        fb.set_pixel(-1, 0, 1);
        fb.set_pixel(0, 8, 1);
        fb.set_pixel(8, 3, 1);
        assert_eq!(lit(&fb), 0);
        assert_eq!(fb.get_pixel(-1, 0), None);
        assert_eq!(fb.get_pixel(0, 8), None);
        assert_eq!(fb.get_pixel(7, 7), Some(0));
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut fb = Framebuffer::new([0u8; 192], 8, 8, PixelFormat::Rgb888).unwrap();
        fb.fill(rgb(1, 2, 3));
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.get_pixel(x, y), Some(rgb(1, 2, 3)));
            }
        }
    }

    #[test]
    fn extreme_coordinates_are_clipped() {
        let mut fb = mono(16, 16);
        for turns in 0..4 {
            fb.set_rotation(turns).unwrap();
            fb.set_pixel(i32::MIN, i32::MAX, 1);
            fb.fill_rect(i32::MAX, 0, 4, 4, 1);
            fb.fill_rect(0, i32::MIN, 4, 4, 1);
            fb.fill_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, 1);
            fb.rect(i32::MAX - 1, 0, i32::MAX, 4, 1, false);
            fb.hline(i32::MAX, i32::MAX, i32::MAX, 1);
            fb.vline(i32::MIN, 0, i32::MAX, 1);
            fb.line(i32::MAX - 3, i32::MIN, i32::MAX, i32::MIN + 3, 1);
            fb.circle(i32::MAX, i32::MIN, 3, 1);
            fb.scroll(i32::MIN, 0);
            fb.scroll(0, i32::MIN);
            assert_eq!(lit(&fb), 0);
            assert_eq!(fb.get_pixel(i32::MAX, i32::MIN), None);
        }

        fb.set_rotation(1).unwrap();
        fb.fill_rect(-5, -5, i32::MAX, i32::MAX, 1);
        assert_eq!(lit(&fb), 256);
    }

    // ── Rectangles ───────────────────────────────────────────────────

    #[test]
    fn unfilled_one_pixel_tall_rect_is_a_strip() {
        let mut fb = Framebuffer::new([0u8; 60], 20, 20, PixelFormat::Mvlsb).unwrap();
        fb.rect(0, 0, 10, 1, 1, false);
        for y in 0..20 {
            for x in 0..20 {
                let expected = if y == 0 && x < 10 { 1 } else { 0 };
                assert_eq!(fb.get_pixel(x, y), Some(expected), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rect_outline_draws_only_the_border() {
        let mut fb = mono(16, 16);
        fb.rect(2, 3, 5, 4, 1, false);
        for y in 0..16 {
            for x in 0..16 {
                let inside = (2..7).contains(&x) && (3..7).contains(&y);
                let border = inside && (x == 2 || x == 6 || y == 3 || y == 6);
                assert_eq!(fb.get_pixel(x, y), Some(border as u32), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rect_clips_to_buffer() {
        let mut fb = mono(8, 8);
        fb.fill_rect(-3, -3, 5, 5, 1);
        assert_eq!(lit(&fb), 4);
        fb.fill(0);
        fb.rect(6, 6, 10, 10, 1, false);
        // Clipped to (6..8, 6..8): the whole 2×2 is border.
        assert_eq!(lit(&fb), 4);
    }

    #[test]
    fn degenerate_rects_draw_nothing() {
        let mut fb = mono(8, 8);
        fb.fill_rect(2, 2, 0, 4, 1);
        fb.fill_rect(2, 2, 4, -1, 1);
        fb.fill_rect(-5, 0, 5, 4, 1);
        fb.fill_rect(8, 0, 3, 3, 1);
        fb.fill_rect(0, 8, 3, 3, 1);
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn hline_and_vline() {
        let mut fb = mono(8, 8);
        fb.hline(1, 2, 4, 1);
        fb.vline(6, 0, 3, 1);
        assert_eq!(lit(&fb), 7);
        assert_eq!(fb.get_pixel(4, 2), Some(1));
        assert_eq!(fb.get_pixel(5, 2), Some(0));
        assert_eq!(fb.get_pixel(6, 2), Some(1));
        assert_eq!(fb.get_pixel(6, 3), Some(0));
    }

    // ── Lines ────────────────────────────────────────────────────────

    #[test]
    fn line_includes_both_endpoints() {
        let mut fb = mono(16, 8);
        fb.line(0, 0, 7, 3, 1);
        assert_eq!(fb.get_pixel(0, 0), Some(1));
        assert_eq!(fb.get_pixel(7, 3), Some(1));
        // Shallow line: one pixel per column.
        assert_eq!(lit(&fb), 8);
    }

    #[test]
    fn steep_and_reversed_lines() {
        let mut fb = mono(8, 16);
        fb.line(2, 10, 0, 0, 1);
        assert_eq!(fb.get_pixel(2, 10), Some(1));
        assert_eq!(fb.get_pixel(0, 0), Some(1));
        assert_eq!(lit(&fb), 11);

        let mut diag = mono(8, 8);
        diag.line(7, 7, 0, 0, 1);
        for i in 0..8 {
            assert_eq!(diag.get_pixel(i, i), Some(1));
        }
        assert_eq!(lit(&diag), 8);
    }

    #[test]
    fn single_point_line() {
        let mut fb = mono(8, 8);
        fb.line(3, 4, 3, 4, 1);
        assert_eq!(lit(&fb), 1);
        assert_eq!(fb.get_pixel(3, 4), Some(1));
    }

    // ── Circles ──────────────────────────────────────────────────────

    #[test]
    fn circle_is_eightfold_symmetric() {
        let (cx, cy, r) = (15, 15, 10);
        let mut fb = mono(32, 32);
        fb.circle(cx, cy, r, 1);

        for y in 0..32 {
            for x in 0..32 {
                if fb.get_pixel(x, y) != Some(1) {
                    continue;
                }
                let (dx, dy) = (x - cx, y - cy);
                let reflections = [
                    (dx, dy),
                    (dy, dx),
                    (-dy, dx),
                    (-dx, dy),
                    (-dx, -dy),
                    (-dy, -dx),
                    (dy, -dx),
                    (dx, -dy),
                ];
                for (mx, my) in reflections {
                    let reflected = fb.get_pixel(cx + mx, cy + my);
                    assert_eq!(reflected, Some(1), "reflection of ({}, {})", dx, dy);
                }
                let d2 = dx * dx + dy * dy;
                assert!((d2 - r * r).abs() <= r, "({}, {}) too far from radius", dx, dy);
            }
        }

        for (x, y) in [(cx + r, cy), (cx - r, cy), (cx, cy + r), (cx, cy - r)] {
            assert_eq!(fb.get_pixel(x, y), Some(1));
        }
        // Centre stays clear: outline only.
        assert_eq!(fb.get_pixel(cx, cy), Some(0));
    }

    #[test]
    fn circle_point_count_matches_octant_steps() {
        // Radius 3 steps: (3,0) (3,1) (2,2). Axis point collapses to 4
        // distinct pixels, the diagonal point to 4, the general one gives 8.
        let mut fb = mono(16, 16);
        fb.circle(8, 8, 3, 1);
        assert_eq!(lit(&fb), 4 + 8 + 4);
    }

    #[test]
    fn circle_clips_at_edges() {
        let mut fb = mono(8, 8);
        fb.circle(0, 0, 4, 1);
        assert_eq!(fb.get_pixel(4, 0), Some(1));
        assert_eq!(fb.get_pixel(0, 4), Some(1));
    }

    // ── Scrolling ────────────────────────────────────────────────────

    #[test]
    fn scroll_right_leaves_stale_edge() {
        let mut fb = mono(8, 8);
        fb.set_pixel(0, 0, 1);
        fb.set_pixel(3, 5, 1);
        fb.scroll(2, 0);
        assert_eq!(fb.get_pixel(2, 0), Some(1));
        assert_eq!(fb.get_pixel(5, 5), Some(1));
        // Revealed column keeps its old content.
        assert_eq!(fb.get_pixel(0, 0), Some(1));
        assert_eq!(fb.get_pixel(3, 5), Some(0));
    }

    #[test]
    fn scroll_up_left_moves_content() {
        let mut fb = mono(8, 8);
        fb.set_pixel(4, 4, 1);
        fb.scroll(-1, -2);
        assert_eq!(fb.get_pixel(3, 2), Some(1));
        assert_eq!(fb.get_pixel(4, 4), Some(0));
    }

    #[test]
    fn scroll_drops_pixels_pushed_off_the_edge() {
        let mut fb = mono(8, 8);
        fb.set_pixel(7, 7, 1);
        fb.set_pixel(2, 1, 1);
        fb.scroll(0, 3);
        assert_eq!(fb.get_pixel(7, 7), Some(0));
        assert_eq!(fb.get_pixel(2, 4), Some(1));
        // Stale copy left in the revealed band.
        assert_eq!(fb.get_pixel(2, 1), Some(1));
        assert_eq!(lit(&fb), 2);
    }

    #[test]
    fn scroll_by_full_size_is_a_no_op() {
        let mut fb = mono(8, 8);
        fb.set_pixel(1, 1, 1);
        fb.scroll(8, 0);
        fb.scroll(0, -9);
        assert_eq!(fb.get_pixel(1, 1), Some(1));
        assert_eq!(lit(&fb), 1);
    }

    #[test]
    fn scroll_moves_colour_pixels() {
        let red = rgb(0xF8, 0, 0);
        let green = rgb(0, 0xFC, 0);
        let mut fb = Framebuffer::new([0u8; 32], 4, 4, PixelFormat::Rgb565).unwrap();
        fb.set_pixel(0, 0, red);
        fb.set_pixel(1, 2, green);
        fb.scroll(2, 1);
        assert_eq!(fb.get_pixel(2, 1), Some(red));
        assert_eq!(fb.get_pixel(3, 3), Some(green));
        assert_eq!(fb.get_pixel(0, 0), Some(red));
    }

    #[test]
    fn scroll_moves_greyscale_pixels() {
        let mut fb = Framebuffer::new([0u8; 4], 6, 2, PixelFormat::Gs2Hmsb).unwrap();
        fb.set_pixel(1, 0, 2);
        fb.set_pixel(3, 1, 1);
        fb.scroll(2, 0);
        assert_eq!(fb.get_pixel(3, 0), Some(2));
        assert_eq!(fb.get_pixel(5, 1), Some(1));
        assert_eq!(fb.get_pixel(1, 0), Some(2));
        assert_eq!(fb.get_pixel(3, 1), Some(0));
    }

    // ── Text ─────────────────────────────────────────────────────────

    #[test]
    fn text_advances_by_glyph_width_plus_one() {
        let data = test_font_data();
        let mut font = BitmapFont::load(&data[..]).unwrap();
        let mut fb = mono(32, 16);
        fb.text("AB", 0, 0, 1, &mut font, 1);

        for row in 0..8 {
            assert_eq!(fb.get_pixel(0, row), Some(1));
        }
        assert_eq!(fb.get_pixel(5, 0), Some(0));
        assert_eq!(fb.get_pixel(6, 0), Some(1));
        assert_eq!(fb.get_pixel(6, 1), Some(0));
        assert_eq!(lit(&fb), 9);
    }

    #[test]
    fn text_breaks_lines_on_newline() {
        let data = test_font_data();
        let mut font = BitmapFont::load(&data[..]).unwrap();
        let mut fb = mono(32, 24);
        fb.text("B\nB", 2, 1, 1, &mut font, 1);
        assert_eq!(fb.get_pixel(2, 1), Some(1));
        assert_eq!(fb.get_pixel(2, 9), Some(1));
        assert_eq!(lit(&fb), 2);
    }

    #[test]
    fn text_scales_by_size() {
        let data = test_font_data();
        let mut font = BitmapFont::load(&data[..]).unwrap();
        let mut fb = mono(32, 16);
        fb.text("BB", 0, 0, 1, &mut font, 2);
        // Each lit font pixel becomes a 2×2 block; second glyph at 12.
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1), (12, 0), (13, 1)] {
            assert_eq!(fb.get_pixel(x, y), Some(1));
        }
        assert_eq!(lit(&fb), 8);
    }

    #[test]
    fn text_skips_offscreen_and_unmapped_glyphs() {
        let data = test_font_data();
        let mut font = BitmapFont::load(&data[..]).unwrap();
        let mut fb = mono(16, 8);
        fb.text("A", -10, 0, 1, &mut font, 1);
        fb.text("A", 0, 20, 1, &mut font, 1);
        fb.text("\u{20AC}", 0, 0, 1, &mut font, 1);
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn text_at_extreme_positions_and_sizes() {
        let data = test_font_data();
        let mut font = BitmapFont::load(&data[..]).unwrap();
        let mut fb = mono(16, 8);
        fb.text("AAAA", i32::MAX - 1, 0, 1, &mut font, 1);
        fb.text("A\nA", i32::MIN, i32::MIN, 1, &mut font, 4);
        fb.text("AA", 0, i32::MAX, 1, &mut font, u32::MAX);
        assert_eq!(lit(&fb), 0);

        // One solid column scaled past the frame covers all of it.
        fb.text("A", -5, -5, 1, &mut font, u32::MAX);
        assert_eq!(lit(&fb), 16 * 8);
    }

    #[test]
    fn text_follows_rotation() {
        let data = test_font_data();
        let mut font = BitmapFont::load(&data[..]).unwrap();
        let mut fb = mono(16, 8);
        fb.set_rotation(2).unwrap();
        fb.text("B", 0, 0, 1, &mut font, 1);
        fb.set_rotation(0).unwrap();
        assert_eq!(fb.get_pixel(15, 7), Some(1));
        assert_eq!(lit(&fb), 1);
    }

    // ── Images ───────────────────────────────────────────────────────

    #[test]
    fn image_rejects_wrong_size_without_touching_buffer() {
        let mut fb = mono(16, 8);
        fb.set_pixel(0, 0, 1);
        let data = [0xFFu8; 8];
        let raw = ImageRaw::<BinaryColor>::new(&data, 8);
        assert_eq!(
            fb.image(&raw),
            Err(FramebufError::DimensionMismatch { expected: (16, 8), actual: (8, 8) })
        );
        assert_eq!(fb.get_pixel(0, 0), Some(1));
    }

    #[test]
    fn image_replaces_frame_contents() {
        let mut fb = mono(8, 8);
        fb.fill(1);
        // Row-major, MSB first: diagonal.
        let data = [0x80u8, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];
        let raw = ImageRaw::<BinaryColor>::new(&data, 8);
        fb.image(&raw).unwrap();
        for i in 0..8 {
            assert_eq!(fb.get_pixel(i, i), Some(1));
        }
        assert_eq!(lit(&fb), 8);
    }
}
