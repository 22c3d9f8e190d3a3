//! Construction helpers for Linux boards, the Raspberry Pi in particular.
//!
//! Resolves the control lines through the GPIO character device and
//! configures the spidev bus, then hands back a driver that is ready for
//! [`Epd7in5::init`]. Chip select stays with the bus; on the default
//! wiring the kernel drives CE0 around every transfer.

use std::io;
use std::path::PathBuf;

use linux_embedded_hal::gpio_cdev::{errors::Error as GpioError, Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use thiserror::Error;

use crate::driver::Epd7in5;

/// SPI clock rate. The panel is specified from 1 MHz up and runs
/// reliably at 5 MHz.
pub const SPI_CLOCK_HZ: u32 = 5_000_000;

/// Where the panel is wired up.
///
/// The defaults match the Waveshare HAT on a Raspberry Pi header: DC on
/// BCM 25, RST on BCM 17, BUSY on BCM 24, the bus on `/dev/spidev0.0`
/// with CE0 as chip select.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// SPI bus device node.
    pub spidev: PathBuf,
    /// GPIO character device holding the control lines.
    pub gpiochip: PathBuf,
    /// Data/command select line offset.
    pub dc: u32,
    /// Reset line offset.
    pub rst: u32,
    /// Busy line offset.
    pub busy: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        PanelConfig {
            spidev: PathBuf::from("/dev/spidev0.0"),
            gpiochip: PathBuf::from("/dev/gpiochip0"),
            dc: 25,
            rst: 17,
            busy: 24,
        }
    }
}

/// Construction failures. No partial handle is ever returned: either
/// every line and the bus come up, or the first failure aborts the build.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A control line could not be resolved or claimed.
    #[error("control line {name} not available: {source}")]
    PinNotFound {
        /// Which line failed, with its offset.
        name: String,
        /// The underlying GPIO error.
        source: GpioError,
    },

    /// The SPI bus could not be opened or configured.
    #[error("SPI bus {path} unavailable: {source}")]
    BusUnavailable {
        /// The device node that was tried.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// The driver as it comes out of [`open`].
pub type LinuxEpd7in5 = Epd7in5<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

/// Claim the control lines and the SPI bus and build the driver.
///
/// The bus is configured for mode 0, MSB first, 8-bit words at
/// [`SPI_CLOCK_HZ`]. The returned driver is still
/// [`Unpowered`](crate::PowerState::Unpowered); call [`Epd7in5::init`]
/// next.
pub fn open(config: &PanelConfig) -> Result<LinuxEpd7in5, SetupError> {
    let mut spi =
        SpidevDevice::open(&config.spidev).map_err(|source| SetupError::BusUnavailable {
            path: config.spidev.clone(),
            source: io::Error::other(source),
        })?;
    spi.0
        .configure(
            &SpidevOptions::new()
                .max_speed_hz(SPI_CLOCK_HZ)
                .mode(SpiModeFlags::SPI_MODE_0)
                .bits_per_word(8)
                .build(),
        )
        .map_err(|source| SetupError::BusUnavailable {
            path: config.spidev.clone(),
            source,
        })?;

    let mut chip = Chip::new(&config.gpiochip).map_err(|source| SetupError::PinNotFound {
        name: format!("gpio chip {}", config.gpiochip.display()),
        source,
    })?;

    let dc = output_line(&mut chip, "dc", config.dc)?;
    let rst = output_line(&mut chip, "rst", config.rst)?;
    let busy = input_line(&mut chip, "busy", config.busy)?;

    log::info!(
        "panel on {} with dc={} rst={} busy={}",
        config.spidev.display(),
        config.dc,
        config.rst,
        config.busy
    );
    Ok(Epd7in5::new(spi, busy, dc, rst, Delay))
}

fn output_line(chip: &mut Chip, name: &str, line: u32) -> Result<CdevPin, SetupError> {
    claim_line(chip, name, line, LineRequestFlags::OUTPUT)
}

fn input_line(chip: &mut Chip, name: &str, line: u32) -> Result<CdevPin, SetupError> {
    claim_line(chip, name, line, LineRequestFlags::INPUT)
}

fn claim_line(
    chip: &mut Chip,
    name: &str,
    line: u32,
    flags: LineRequestFlags,
) -> Result<CdevPin, SetupError> {
    request_line(chip, line, flags).map_err(|source| SetupError::PinNotFound {
        name: format!("{name} (gpio {line})"),
        source,
    })
}

fn request_line(chip: &mut Chip, line: u32, flags: LineRequestFlags) -> Result<CdevPin, GpioError> {
    let handle = chip.get_line(line)?.request(flags, 0, "epd7in5")?;
    CdevPin::new(handle)
}
