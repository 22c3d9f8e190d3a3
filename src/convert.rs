//! Conversion of raster images into the panel's packed 1-bit layout.

use image::{DynamicImage, GenericImageView, Rgba};

use crate::{BUFFER_LEN, HEIGHT, WIDTH, WIDTH_BYTES};

/// Bit value for panel pixels the source image does not cover.
const BACKGROUND_WHITE: u8 = 1;

/// Map an image onto the packed monochrome buffer the panel uses.
///
/// Every pixel inside the image is quantized to the nearer of black and
/// white; panel area the image does not cover is padded with white, and
/// images larger than the panel are cropped at the right and bottom
/// edges. The result is always exactly [`BUFFER_LEN`] bytes and feeds
/// straight into [`Epd7in5::display`](crate::Epd7in5::display).
///
/// The quantizer is a plain nearest-color rule over a two-entry palette.
/// For photographic input, run a dithering pass first and feed the
/// two-color result through here.
pub fn convert(img: &DynamicImage) -> Vec<u8> {
    let (img_width, img_height) = img.dimensions();
    let mut buffer = vec![0u8; BUFFER_LEN];
    let mut packed: u8 = 0;

    for j in 0..HEIGHT {
        for i in 0..WIDTH {
            let bit = if i < img_width && j < img_height {
                palette_index(img.get_pixel(i, j))
            } else {
                BACKGROUND_WHITE
            };
            if bit == 1 {
                packed |= 0x80 >> (i % 8);
            }
            if i % 8 == 7 {
                buffer[(i / 8) as usize + j as usize * WIDTH_BYTES] = packed;
                packed = 0;
            }
        }
    }

    buffer
}

/// Index of the nearer palette entry, 0 for black and 1 for white, by
/// squared distance over the color channels. Ties go to black.
fn palette_index(pixel: Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    let to_black = sq(r) + sq(g) + sq(b);
    let to_white = sq(255 - r) + sq(255 - g) + sq(255 - b);
    u8::from(to_white < to_black)
}

fn sq(channel: u8) -> u32 {
    u32::from(channel) * u32::from(channel)
}
