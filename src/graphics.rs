//! Off-screen frame buffer with embedded-graphics support.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::{BUFFER_LEN, HEIGHT, WIDTH, WIDTH_BYTES};

/// Frame buffer in the panel's packed 1-bit layout.
///
/// Draw into it with the embedded-graphics primitives, where
/// `BinaryColor::On` is black ink, then hand
/// [`buffer`](Display7in5::buffer) to
/// [`Epd7in5::display`](crate::Epd7in5::display). A fresh buffer is all
/// white.
pub struct Display7in5 {
    buffer: Box<[u8]>,
}

impl Display7in5 {
    /// An all-white frame buffer of the full panel size.
    pub fn new() -> Self {
        Display7in5 {
            buffer: vec![0xFF; BUFFER_LEN].into_boxed_slice(),
        }
    }

    /// The packed buffer, ready for transmission.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Paint a single pixel. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let index = (x / 8) as usize + y as usize * WIDTH_BYTES;
        let mask = 0x80 >> (x % 8);
        match color {
            // bit 0 = black ink, bit 1 = white
            BinaryColor::On => self.buffer[index] &= !mask,
            BinaryColor::Off => self.buffer[index] |= mask,
        }
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: BinaryColor) {
        let value = match color {
            BinaryColor::On => 0x00,
            BinaryColor::Off => 0xFF,
        };
        self.buffer.fill(value);
    }
}

impl Default for Display7in5 {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for Display7in5 {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl OriginDimensions for Display7in5 {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}
