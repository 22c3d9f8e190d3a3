//! Display interface using SPI plus the data/command, reset and busy lines.

use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::Error;

/// Dwell time at each level of the reset pulse, the settle time the panel
/// requires.
const RESET_DWELL_MS: u32 = 200;

/// How often the busy line is sampled while waiting for the panel.
pub const BUSY_POLL_INTERVAL_MS: u32 = 100;

/// Repeated-fill writes go out in chunks of this many bytes.
const FILL_CHUNK_SIZE: usize = 256;

/// The connection to the panel.
///
/// Owns the SPI device and the three control lines for the lifetime of
/// the driver. Chip select belongs to the SPI device, which asserts it
/// around every transfer; the data/command line decides how the panel
/// interprets the transferred bytes.
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// Low while the panel is processing, high once it is ready
    busy: BSY,
    /// Data/Command control pin (high for data, low for command)
    dc: DC,
    /// Pin for resetting
    rst: RST,
    /// Delay source for the reset dwell and busy polling
    pub(crate) delay: DELAY,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Wrap the SPI device and control lines. No bus traffic happens here.
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
        }
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Basic function for sending one command byte.
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi.write(&[command]).map_err(|_| {
            log::error!("SPI write failed for command {:#04x}", command);
            DisplayError::BusWriteError
        })
    }

    /// Basic function for sending a slice of data bytes.
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Send the same data byte many times, for filling a whole frame with
    /// one value without staging it in memory.
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: u32) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;

        let chunk = [val; FILL_CHUNK_SIZE];
        let mut remaining = repetitions as usize;
        while remaining > 0 {
            let n = remaining.min(FILL_CHUNK_SIZE);
            self.spi
                .write(&chunk[..n])
                .map_err(|_| DisplayError::BusWriteError)?;
            remaining -= n;
        }
        Ok(())
    }

    /// Drive the reset pulse: high, low, high, holding each level for the
    /// vendor settle time. Afterwards the panel accepts nothing until it
    /// has been through the full init sequence again.
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DWELL_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DWELL_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DWELL_MS);
        Ok(())
    }

    /// Poll the busy line until the panel reports ready.
    ///
    /// The line sits low for the whole internal processing cycle and goes
    /// high once the panel can take the next command. With
    /// `timeout_ms: None` the poll loop runs forever, which is what the
    /// vendor reference code does.
    pub(crate) fn wait_until_idle(&mut self, timeout_ms: Option<u32>) -> Result<(), Error> {
        log::debug!("waiting for the busy line");
        let mut waited_ms = 0u32;
        loop {
            // DisplayError has no variant for the busy line, reuse DCError
            let idle = self
                .busy
                .is_high()
                .map_err(|_| Error::Interface(DisplayError::DCError))?;
            if idle {
                return Ok(());
            }
            if let Some(limit) = timeout_ms {
                if waited_ms >= limit {
                    log::error!("busy line still low after {} ms, giving up", waited_ms);
                    return Err(Error::BusyTimeout { waited_ms });
                }
            }
            self.delay.delay_ms(BUSY_POLL_INTERVAL_MS);
            waited_ms = waited_ms.saturating_add(BUSY_POLL_INTERVAL_MS);
        }
    }
}
