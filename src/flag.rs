//! Argument bytes and wire codes paired with the commands in [`Cmd`](crate::Cmd).

/// Fixed argument bytes of the vendor configuration sequence, plus the
/// 2-bit pixel codes used on the wire.
pub struct Flag;

#[allow(missing_docs)]
impl Flag {
    // PowerSetting (0x01): internal DC/DC for source and gate power
    pub const POWER_SOURCE_INTERNAL: u8 = 0x37;
    pub const POWER_VGHL_DEFAULT: u8 = 0x00;

    // PanelSetting (0x00): black/white mode, LUT from external flash
    pub const PANEL_LUT_FROM_FLASH: u8 = 0xCF;
    pub const PANEL_VCOM_TO_GND: u8 = 0x08;

    // BoosterSoftStart (0x06)
    pub const BOOSTER_PHASE_A: u8 = 0xC7;
    pub const BOOSTER_PHASE_B: u8 = 0xCC;
    pub const BOOSTER_PHASE_C: u8 = 0x28;

    // PllControl (0x30): 50 Hz frame rate
    pub const PLL_50HZ: u8 = 0x3C;

    // TemperatureCalibration (0x41): use the internal sensor
    pub const TEMP_INTERNAL_SENSOR: u8 = 0x00;

    // VcomAndDataIntervalSetting (0x50): white border, interval of 10
    pub const VCOM_INTERVAL_DEFAULT: u8 = 0x77;

    // TconSetting (0x60): S2G and G2S non-overlap periods of 12
    pub const TCON_S2G_G2S_12: u8 = 0x22;

    // VcmDcSetting (0x82): VCOM_DC of -1.5 V
    pub const VCM_DC_1V5: u8 = 0x1E;

    // FlashMode (0xE5)
    pub const FLASH_MODE_DEFAULT: u8 = 0x03;

    // DeepSleep (0x07): the panel ignores the command without this check code
    pub const DEEP_SLEEP_CHECK_CODE: u8 = 0xA5;

    /// 2-bit wire code for a black pixel.
    pub const PIXEL_BLACK: u8 = 0x00;
    /// 2-bit wire code for a white pixel.
    pub const PIXEL_WHITE: u8 = 0x03;
    /// One wire byte holding two white pixels, the fill value of a
    /// cleared frame.
    pub const WHITE_PAIR: u8 = 0x33;
}
