//! Decode an image from the command line and show it on the panel.
//!
//! `cargo run --example load_image --features "linux image" -- photo.png`
//!
//! The converter snaps every pixel to black or white; dither photographic
//! input beforehand for a usable result.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use epd7in5::linux::{self, PanelConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let path: PathBuf = env::args_os()
        .nth(1)
        .context("usage: load_image <image.png>")?
        .into();

    log::info!("Loading {}", path.display());
    let img = image::open(&path)
        .with_context(|| format!("could not decode {}", path.display()))?;

    log::info!("Opening the panel");
    let mut epd = linux::open(&PanelConfig::default())?;

    log::info!("Initializing the display");
    epd.init()?;

    log::info!("Clearing");
    epd.clear()?;

    log::info!("Displaying the image");
    epd.display(&epd7in5::convert(&img))?;

    log::info!("Going to sleep");
    epd.sleep()?;
    Ok(())
}
