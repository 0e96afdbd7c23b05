//! Registers for the BMP280 pressure and temperature sensor
//! See https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bmp280-ds001.pdf

/// Reading `REG_ID` on a genuine BMP280 returns this value.
pub const BMP280_ID: u8 = 0x58;

pub const REG_ID: u8 = 0xd0;
pub const REG_CTRL_MEAS: u8 = 0xf4;
pub const REG_CONFIG: u8 = 0xf5;
pub const REG_PRESS_MSB: u8 = 0xf7;
pub const REG_TEMP_MSB: u8 = 0xfa;
pub const REG_TEMP_CALIB: u8 = 0x88;
pub const REG_PRESS_CALIB: u8 = 0x8e;

pub const TEMP_CALIB_LEN: usize = 3 * 2;
pub const PRESS_CALIB_LEN: usize = 9 * 2;
pub const RAW_SAMPLE_LEN: usize = 3;

// Oversampling x16 on both channels gives 20 bits of resolution.
const OSRS_T: u8 = 0x5;
const OSRS_P: u8 = 0x5;
const MODE_NORMAL: u8 = 0x3;
// 1000ms between measurements in normal mode.
const T_SB: u8 = 0x5;
const FILTER_OFF: u8 = 0x0;
const SPI3W_EN: u8 = 0x0;

/// Value written to `REG_CTRL_MEAS` during initialisation.
pub const CTRL_MEAS: u8 = (OSRS_T << 5) | (OSRS_P << 2) | MODE_NORMAL;

/// Value written to `REG_CONFIG` during initialisation.
pub const CONFIG: u8 = (T_SB << 5) | (FILTER_OFF << 2) | SPI3W_EN;
