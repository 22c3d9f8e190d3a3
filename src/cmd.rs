//! Command bytes understood by the panel controller.

/// Command bytes of the 7.5 inch panel controller.
///
/// The values are fixed by the vendor protocol; the panel only accepts
/// the documented argument bytes after each of them.
pub struct Cmd;

#[allow(missing_docs)]
impl Cmd {
    // Configuration and power
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_SETTING: u8 = 0x01;
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_OFF_SEQUENCE_SETTING: u8 = 0x03;
    pub const POWER_ON: u8 = 0x04;
    pub const POWER_ON_MEASURE: u8 = 0x05;
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    pub const DEEP_SLEEP: u8 = 0x07;

    // Frame data and refresh
    pub const DATA_START_TRANSMISSION_1: u8 = 0x10;
    pub const DATA_STOP: u8 = 0x11;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const IMAGE_PROCESS: u8 = 0x13;

    // Waveform look-up tables
    pub const LUT_FOR_VCOM: u8 = 0x20;
    pub const LUT_BLUE: u8 = 0x21;
    pub const LUT_WHITE: u8 = 0x22;
    pub const LUT_GRAY_1: u8 = 0x23;
    pub const LUT_GRAY_2: u8 = 0x24;
    pub const LUT_RED_0: u8 = 0x25;
    pub const LUT_RED_1: u8 = 0x26;
    pub const LUT_RED_2: u8 = 0x27;
    pub const LUT_RED_3: u8 = 0x28;
    pub const LUT_XON: u8 = 0x29;

    // Clocking and calibration
    pub const PLL_CONTROL: u8 = 0x30;
    pub const TEMPERATURE_SENSOR_COMMAND: u8 = 0x40;
    pub const TEMPERATURE_CALIBRATION: u8 = 0x41;
    pub const TEMPERATURE_SENSOR_WRITE: u8 = 0x42;
    pub const TEMPERATURE_SENSOR_READ: u8 = 0x43;
    pub const VCOM_AND_DATA_INTERVAL_SETTING: u8 = 0x50;
    pub const LOW_POWER_DETECTION: u8 = 0x51;
    pub const TCON_SETTING: u8 = 0x60;
    pub const TCON_RESOLUTION: u8 = 0x61;
    pub const SPI_FLASH_CONTROL: u8 = 0x65;

    // Status and VCOM trimming
    pub const REVISION: u8 = 0x70;
    pub const GET_STATUS: u8 = 0x71;
    pub const AUTO_MEASUREMENT_VCOM: u8 = 0x80;
    pub const READ_VCOM_VALUE: u8 = 0x81;
    pub const VCM_DC_SETTING: u8 = 0x82;
    pub const FLASH_MODE: u8 = 0xE5;
}
