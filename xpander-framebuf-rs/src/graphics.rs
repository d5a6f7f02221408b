//! `embedded-graphics` integration.
//!
//! Lets any [`Framebuffer`] act as a [`DrawTarget`] with
//! [`BinaryColor`], so styled primitives and `MonoTextStyle` text from the
//! `embedded-graphics` ecosystem can render into it. `On` maps to the
//! format's full-intensity colour, `Off` to zero. Drawing honours the
//! framebuffer's rotation and clips silently like the native primitives.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

use crate::framebuffer::Framebuffer;

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn binary_to_raw(&self, color: BinaryColor) -> u32 {
        if color.is_on() {
            self.format().full_intensity()
        } else {
            0
        }
    }
}

impl<B> OriginDimensions for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let (width, height) = self.frame_size();
        Size::new(width, height)
    }
}

impl<B> DrawTarget for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let raw = self.binary_to_raw(color);
            self.set_pixel(point.x, point.y, raw);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let raw = self.binary_to_raw(color);
        let Point { x, y } = area.top_left;
        let Size { width, height } = area.size;
        self.draw_rect(x.into(), y.into(), width.into(), height.into(), raw, true);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let raw = self.binary_to_raw(color);
        self.fill(raw);
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
