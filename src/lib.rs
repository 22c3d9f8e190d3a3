//! SPI driver for the Waveshare 7.5 inch e-paper display (640x384, black/white)
//!
//! The panel hangs off an SPI bus plus three control lines: data/command
//! select, reset and busy. Chip select belongs to the SPI device, which
//! asserts it around every transfer.
//!
//! To put something on the panel:
//!
//! 1. build an [`Epd7in5`] from an SPI device and the control pins
//!    (on a Raspberry Pi the `linux` module does the wiring),
//! 2. call [`Epd7in5::init`] to power the panel up,
//! 3. produce a packed 1-bit buffer, either by [`convert`]ing a raster
//!    image or by drawing into a [`graphics::Display7in5`],
//! 4. push it with [`Epd7in5::display`],
//! 5. park the panel with [`Epd7in5::sleep`] once done.
//!
//! E-paper refreshes are slow. [`Epd7in5::display`] and
//! [`Epd7in5::clear`] block the calling thread for the whole refresh
//! cycle, typically a few seconds, while polling the panel's busy line.
//! The driver is not reentrant; callers sharing a panel across threads
//! must serialize access themselves.

#![warn(missing_docs)]

pub mod driver;
pub mod interface;

mod cmd;
mod encode;
mod flag;

#[cfg(feature = "image")]
mod convert;
#[cfg(feature = "graphics")]
pub mod graphics;
#[cfg(feature = "linux")]
pub mod linux;

#[cfg(test)]
pub(crate) mod testsupport;

pub use crate::cmd::Cmd;
#[cfg(feature = "image")]
pub use crate::convert::convert;
pub use crate::driver::{Epd7in5, PowerState};
pub use crate::encode::expand_byte;
pub use crate::flag::Flag;

use display_interface::DisplayError;

/// Display width, pixels horizontally
pub const WIDTH: u32 = 640;

/// Display height, pixels vertically
pub const HEIGHT: u32 = 384;

/// Bytes per row of the packed buffer, one bit per pixel
pub const WIDTH_BYTES: usize = WIDTH.div_ceil(8) as usize;

/// Length of a packed 1-bit frame buffer in bytes
pub const BUFFER_LEN: usize = WIDTH_BYTES * HEIGHT as usize;

/// Length of the expanded 2-bit wire frame in bytes, four wire bytes per
/// packed byte
pub const FRAME_LEN: usize = BUFFER_LEN * 4;

/// Everything that can go wrong while driving the panel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SPI or control line fault, propagated from the display interface
    /// without retry.
    #[error("display interface error: {0:?}")]
    Interface(DisplayError),

    /// The buffer handed to [`Epd7in5::display`] does not match the
    /// panel geometry. Nothing was written to the panel.
    #[error("buffer is {actual} bytes, the panel needs exactly {expected}")]
    InvalidBufferSize {
        /// Required length, [`BUFFER_LEN`].
        expected: usize,
        /// Length of the rejected buffer.
        actual: usize,
    },

    /// An operation was called in a power state that does not allow it.
    /// Nothing was written to the panel.
    #[error("{op} cannot run while the panel is {actual:?}")]
    InvalidState {
        /// The rejected operation.
        op: &'static str,
        /// State the panel was in at the time of the call.
        actual: PowerState,
    },

    /// The busy line never went high within the configured timeout. The
    /// panel state is unknown; recover with [`Epd7in5::reset`] and
    /// [`Epd7in5::init`].
    #[error("busy line still low after {waited_ms} ms")]
    BusyTimeout {
        /// How long the driver polled before giving up.
        waited_ms: u32,
    },
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Interface(e)
    }
}
