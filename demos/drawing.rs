//! Draw some shapes and text and push them to the panel.
//!
//! Run on a Raspberry Pi with the panel on the default HAT wiring:
//! `cargo run --example drawing --features linux`

use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use epd7in5::graphics::Display7in5;
use epd7in5::linux::{self, PanelConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("Opening the panel");
    let mut epd = linux::open(&PanelConfig::default())?;

    log::info!("Initializing the display");
    epd.init()?;

    log::info!("Clearing");
    epd.clear()?;

    let mut display = Display7in5::new();

    Circle::new(Point::new(30, 238), 100)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
        .draw(&mut display)?;

    Rectangle::new(Point::new(180, 238), Size::new(100, 100))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut display)?;

    Text::new(
        "Hello world!",
        Point::new(420, 288),
        MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
    )
    .draw(&mut display)?;

    log::info!("Displaying the drawing");
    epd.display(display.buffer())?;

    log::info!("Going to sleep");
    epd.sleep()?;
    Ok(())
}
