//! Protocol driver for the 7.5 inch panel.
//!
//! Owns the panel's power state and issues the vendor command sequences
//! for reset, initialization, clearing, frame transmission and deep
//! sleep. The busy line is the panel's only handshake: after power
//! transitions and refreshes the driver blocks until the panel raises it.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::cmd::Cmd;
use crate::encode::expand_byte;
use crate::flag::Flag;
use crate::interface::DisplayInterface;
use crate::{Error, BUFFER_LEN, FRAME_LEN, HEIGHT, WIDTH, WIDTH_BYTES};

/// Delay between the refresh command and the first busy sample.
const REFRESH_SETTLE_MS: u32 = 100;

/// Default bound on busy-waits. A full refresh takes a few seconds;
/// a panel that stays busy this long is not going to answer.
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Power state of the panel, advanced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// After construction or a reset pulse. Only [`Epd7in5::init`]
    /// leaves this state.
    Unpowered,
    /// Configured and accepting frame data.
    Ready,
    /// Deep sleep. Only a reset pulse, followed by a fresh init, brings
    /// the panel back.
    Sleeping,
}

/// Driver for the Waveshare 7.5 inch e-paper panel.
///
/// One instance owns one physical panel: the SPI device, the
/// data/command, reset and busy lines, and a delay source. The panel
/// starts [`Unpowered`](PowerState::Unpowered) and must be initialized
/// before anything shows up on it.
///
/// ## Type parameters
///
/// - `SPI` - SPI device, also responsible for chip select framing
/// - `BSY` - busy input pin (low while the panel is processing)
/// - `DC` - data/command output pin
/// - `RST` - reset output pin
/// - `DELAY` - delay provider for timing
pub struct Epd7in5<SPI, BSY, DC, RST, DELAY> {
    interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    state: PowerState,
    busy_timeout_ms: Option<u32>,
}

impl<SPI, BSY, DC, RST, DELAY> Epd7in5<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Take ownership of the SPI device and control lines.
    ///
    /// Pins and bus are passed in explicitly so that several panels, or
    /// test doubles, can coexist in one process. No line is driven here;
    /// the panel stays [`Unpowered`](PowerState::Unpowered) until
    /// [`init`](Self::init).
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Epd7in5 {
            interface: DisplayInterface::new(spi, busy, dc, rst, delay),
            state: PowerState::Unpowered,
            busy_timeout_ms: Some(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Current position in the power state machine.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Bound the busy-waits that follow power transitions and refreshes.
    ///
    /// `None` polls forever, matching the vendor reference behavior; an
    /// unresponsive panel then hangs the calling thread. The default is
    /// [`DEFAULT_BUSY_TIMEOUT_MS`].
    pub fn set_busy_timeout(&mut self, timeout_ms: Option<u32>) {
        self.busy_timeout_ms = timeout_ms;
    }

    /// Drive the hardware reset pulse.
    ///
    /// Valid in any state and the only way out of deep sleep. The panel
    /// forgets its configuration: a full [`init`](Self::init) is
    /// required before the next frame.
    pub fn reset(&mut self) -> Result<(), Error> {
        log::info!("resetting the panel");
        self.interface.reset()?;
        self.state = PowerState::Unpowered;
        Ok(())
    }

    /// Power the panel up and load the vendor configuration.
    ///
    /// Runs a reset pulse first, then the fixed configuration sequence:
    /// power settings, booster timing, clocking, VCOM trimming and the
    /// panel resolution. Valid from `Unpowered` and from `Ready` for
    /// re-initialization; a sleeping panel ignores commands and has to
    /// go through [`reset`](Self::reset) first.
    pub fn init(&mut self) -> Result<(), Error> {
        if self.state == PowerState::Sleeping {
            return Err(Error::InvalidState {
                op: "init",
                actual: self.state,
            });
        }
        log::info!("initializing the panel");
        self.reset()?;

        self.interface.cmd_with_data(
            Cmd::POWER_SETTING,
            &[Flag::POWER_SOURCE_INTERNAL, Flag::POWER_VGHL_DEFAULT],
        )?;
        self.interface.cmd_with_data(
            Cmd::PANEL_SETTING,
            &[Flag::PANEL_LUT_FROM_FLASH, Flag::PANEL_VCOM_TO_GND],
        )?;
        self.interface.cmd_with_data(
            Cmd::BOOSTER_SOFT_START,
            &[
                Flag::BOOSTER_PHASE_A,
                Flag::BOOSTER_PHASE_B,
                Flag::BOOSTER_PHASE_C,
            ],
        )?;

        // Power-on is the one configuration step the panel acknowledges
        // through the busy line.
        self.interface.cmd(Cmd::POWER_ON)?;
        self.wait_until_idle()?;

        self.interface
            .cmd_with_data(Cmd::PLL_CONTROL, &[Flag::PLL_50HZ])?;
        self.interface
            .cmd_with_data(Cmd::TEMPERATURE_CALIBRATION, &[Flag::TEMP_INTERNAL_SENSOR])?;
        self.interface.cmd_with_data(
            Cmd::VCOM_AND_DATA_INTERVAL_SETTING,
            &[Flag::VCOM_INTERVAL_DEFAULT],
        )?;
        self.interface
            .cmd_with_data(Cmd::TCON_SETTING, &[Flag::TCON_S2G_G2S_12])?;
        self.send_resolution()?;
        self.interface
            .cmd_with_data(Cmd::VCM_DC_SETTING, &[Flag::VCM_DC_1V5])?;
        self.interface
            .cmd_with_data(Cmd::FLASH_MODE, &[Flag::FLASH_MODE_DEFAULT])?;

        self.state = PowerState::Ready;
        Ok(())
    }

    /// Fill the panel with white and refresh it.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.require_ready("clear")?;
        log::info!("clearing the panel to white");
        self.interface.cmd(Cmd::DATA_START_TRANSMISSION_1)?;
        self.interface
            .data_x_times(Flag::WHITE_PAIR, FRAME_LEN as u32)?;
        self.turn_on_display()
    }

    /// Transmit a packed 1-bit frame buffer and refresh the panel.
    ///
    /// `buffer` must be exactly [`BUFFER_LEN`] bytes, row-major, MSB
    /// first, bit 1 = white. The frame is expanded row by row into the
    /// panel's 2-bit wire format (see
    /// [`expand_byte`](crate::expand_byte)) while streaming. Blocks
    /// until the refresh cycle has finished.
    pub fn display(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.require_ready("display")?;
        if buffer.len() != BUFFER_LEN {
            return Err(Error::InvalidBufferSize {
                expected: BUFFER_LEN,
                actual: buffer.len(),
            });
        }

        log::info!("writing a frame of {} bytes", buffer.len());
        self.interface.cmd(Cmd::DATA_START_TRANSMISSION_1)?;

        let mut row = [0u8; WIDTH_BYTES * 4];
        for packed_row in buffer.chunks_exact(WIDTH_BYTES) {
            for (packed, wire) in packed_row.iter().zip(row.chunks_exact_mut(4)) {
                wire.copy_from_slice(&expand_byte(*packed));
            }
            self.interface.data(&row)?;
        }

        self.turn_on_display()
    }

    /// Put the panel into deep sleep.
    ///
    /// Power consumption drops to almost nothing. The panel no longer
    /// listens on the bus; wake it with [`reset`](Self::reset) followed
    /// by [`init`](Self::init).
    pub fn sleep(&mut self) -> Result<(), Error> {
        self.require_ready("sleep")?;
        log::info!("putting the panel into deep sleep");
        self.interface.cmd(Cmd::POWER_OFF)?;
        self.wait_until_idle()?;
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP, &[Flag::DEEP_SLEEP_CHECK_CODE])?;
        self.state = PowerState::Sleeping;
        Ok(())
    }

    /// Kick off the refresh cycle and wait for the panel to finish it.
    fn turn_on_display(&mut self) -> Result<(), Error> {
        self.interface.cmd(Cmd::DISPLAY_REFRESH)?;
        self.interface.delay.delay_ms(REFRESH_SETTLE_MS);
        self.wait_until_idle()
    }

    fn wait_until_idle(&mut self) -> Result<(), Error> {
        self.interface.wait_until_idle(self.busy_timeout_ms)
    }

    fn require_ready(&self, op: &'static str) -> Result<(), Error> {
        if self.state == PowerState::Ready {
            Ok(())
        } else {
            Err(Error::InvalidState {
                op,
                actual: self.state,
            })
        }
    }

    /// The resolution arguments are the geometry split into high and low
    /// bytes, width first.
    fn send_resolution(&mut self) -> Result<(), Error> {
        self.interface.cmd_with_data(
            Cmd::TCON_RESOLUTION,
            &[
                (WIDTH >> 8) as u8,
                WIDTH as u8,
                (HEIGHT >> 8) as u8,
                HEIGHT as u8,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{Event, EventLog, MockBusyPin, MockDelay, MockOutputPin, MockSpi};

    type MockEpd = Epd7in5<MockSpi, MockBusyPin, MockOutputPin, MockOutputPin, MockDelay>;

    fn epd(busy: MockBusyPin) -> (MockEpd, EventLog) {
        let log = EventLog::default();
        let epd = Epd7in5::new(
            MockSpi(log.clone()),
            busy,
            MockOutputPin {
                name: "dc",
                log: log.clone(),
            },
            MockOutputPin {
                name: "rst",
                log: log.clone(),
            },
            MockDelay,
        );
        (epd, log)
    }

    #[test]
    fn new_drives_no_lines() {
        let (epd, log) = epd(MockBusyPin::idle());
        assert_eq!(epd.state(), PowerState::Unpowered);
        assert!(log.is_empty());
    }

    #[test]
    fn operations_before_init_fail_fast() {
        let (mut epd, log) = epd(MockBusyPin::idle());

        assert!(matches!(
            epd.clear().unwrap_err(),
            Error::InvalidState { op: "clear", .. }
        ));
        assert!(matches!(
            epd.display(&vec![0xFF; BUFFER_LEN]).unwrap_err(),
            Error::InvalidState { op: "display", .. }
        ));
        assert!(matches!(
            epd.sleep().unwrap_err(),
            Error::InvalidState { op: "sleep", .. }
        ));

        assert!(log.is_empty());
        assert_eq!(epd.state(), PowerState::Unpowered);
    }

    #[test]
    fn reset_drives_high_low_high() {
        let (mut epd, log) = epd(MockBusyPin::idle());
        epd.reset().unwrap();

        let rst: Vec<bool> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Pin { name: "rst", high } => Some(*high),
                _ => None,
            })
            .collect();
        assert_eq!(rst, [true, false, true]);
        assert_eq!(epd.state(), PowerState::Unpowered);
    }

    #[test]
    fn init_sends_the_vendor_sequence() {
        let (mut epd, log) = epd(MockBusyPin::idle());
        epd.init().unwrap();
        assert_eq!(epd.state(), PowerState::Ready);

        let expected: &[(u8, &[u8])] = &[
            (Cmd::POWER_SETTING, &[0x37, 0x00]),
            (Cmd::PANEL_SETTING, &[0xCF, 0x08]),
            (Cmd::BOOSTER_SOFT_START, &[0xC7, 0xCC, 0x28]),
            (Cmd::POWER_ON, &[]),
            (Cmd::PLL_CONTROL, &[0x3C]),
            (Cmd::TEMPERATURE_CALIBRATION, &[0x00]),
            (Cmd::VCOM_AND_DATA_INTERVAL_SETTING, &[0x77]),
            (Cmd::TCON_SETTING, &[0x22]),
            (Cmd::TCON_RESOLUTION, &[0x02, 0x80, 0x01, 0x80]),
            (Cmd::VCM_DC_SETTING, &[0x1E]),
            (Cmd::FLASH_MODE, &[0x03]),
        ];

        let sent = log.commands();
        assert_eq!(sent.len(), expected.len());
        for ((cmd, args), (want_cmd, want_args)) in sent.iter().zip(expected) {
            assert_eq!(cmd, want_cmd);
            assert_eq!(args.as_slice(), *want_args);
        }
    }

    #[test]
    fn init_from_sleep_is_rejected_until_reset() {
        let (mut epd, _log) = epd(MockBusyPin::idle());
        epd.init().unwrap();
        epd.sleep().unwrap();
        assert_eq!(epd.state(), PowerState::Sleeping);

        assert!(matches!(
            epd.init().unwrap_err(),
            Error::InvalidState { op: "init", .. }
        ));
        assert_eq!(epd.state(), PowerState::Sleeping);

        epd.reset().unwrap();
        assert_eq!(epd.state(), PowerState::Unpowered);
        epd.init().unwrap();
        assert_eq!(epd.state(), PowerState::Ready);
    }

    #[test]
    fn clear_streams_a_white_frame() {
        let (mut epd, log) = epd(MockBusyPin::idle());
        epd.init().unwrap();
        let before = log.commands().len();

        epd.clear().unwrap();

        let sent = log.commands();
        let (cmd, payload) = &sent[before];
        assert_eq!(*cmd, Cmd::DATA_START_TRANSMISSION_1);
        assert_eq!(payload.len(), FRAME_LEN);
        assert!(payload.iter().all(|&b| b == Flag::WHITE_PAIR));
        assert_eq!(sent[before + 1], (Cmd::DISPLAY_REFRESH, vec![]));
    }

    #[test]
    fn display_rejects_a_wrong_buffer_size() {
        let (mut epd, log) = epd(MockBusyPin::idle());
        epd.init().unwrap();
        let before = log.events().len();

        let err = epd.display(&[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidBufferSize {
                expected: BUFFER_LEN,
                actual: 10
            }
        ));
        // nothing reached the transport
        assert_eq!(log.events().len(), before);
        assert_eq!(epd.state(), PowerState::Ready);
    }

    #[test]
    fn display_expands_white_and_black_frames() {
        let (mut epd, log) = epd(MockBusyPin::idle());
        epd.init().unwrap();

        let before = log.commands().len();
        epd.display(&vec![0xFF; BUFFER_LEN]).unwrap();
        let sent = log.commands();
        let (cmd, payload) = &sent[before];
        assert_eq!(*cmd, Cmd::DATA_START_TRANSMISSION_1);
        assert_eq!(payload.len(), FRAME_LEN);
        assert!(payload.iter().all(|&b| b == Flag::WHITE_PAIR));

        let before = log.commands().len();
        epd.display(&vec![0x00; BUFFER_LEN]).unwrap();
        let sent = log.commands();
        let (_, payload) = &sent[before];
        assert_eq!(payload.len(), FRAME_LEN);
        assert!(payload.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn sleep_powers_off_then_enters_deep_sleep() {
        let (mut epd, log) = epd(MockBusyPin::idle());
        epd.init().unwrap();
        epd.sleep().unwrap();

        let sent = log.commands();
        let n = sent.len();
        assert_eq!(sent[n - 2], (Cmd::POWER_OFF, vec![]));
        assert_eq!(sent[n - 1], (Cmd::DEEP_SLEEP, vec![0xA5]));
        assert_eq!(epd.state(), PowerState::Sleeping);
    }

    #[test]
    fn a_full_session_walks_the_power_states() {
        let (mut epd, _log) = epd(MockBusyPin::idle());
        assert_eq!(epd.state(), PowerState::Unpowered);

        epd.init().unwrap();
        assert_eq!(epd.state(), PowerState::Ready);

        epd.clear().unwrap();
        assert_eq!(epd.state(), PowerState::Ready);

        epd.display(&vec![0xFF; BUFFER_LEN]).unwrap();
        assert_eq!(epd.state(), PowerState::Ready);

        epd.sleep().unwrap();
        assert_eq!(epd.state(), PowerState::Sleeping);
    }

    #[test]
    fn a_stuck_busy_line_times_out() {
        let (mut epd, _log) = epd(MockBusyPin::stuck_busy());
        epd.set_busy_timeout(Some(300));

        // init busy-waits after the power-on command
        let err = epd.init().unwrap_err();
        assert!(matches!(err, Error::BusyTimeout { waited_ms: 300 }));
        assert_eq!(epd.state(), PowerState::Unpowered);
    }

    #[test]
    fn the_busy_wait_outlasts_a_slow_refresh() {
        let (mut epd, _log) = epd(MockBusyPin::busy_for(20));
        epd.init().unwrap();
        assert_eq!(epd.state(), PowerState::Ready);
    }
}
