//! Fixed-point compensation formulas from the BMP280 datasheet,
//! section 3.11.3.
//!
//! Everything here is pure integer arithmetic on `i64`. The inputs are the
//! 20-bit ADC values, i.e. the register triple with its 4 padding bits
//! shifted out.

use crate::calibration::Calibration;

/// Assemble a register triple (MSB, LSB, XLSB) into one value.
///
/// The 4 low padding bits are kept. No range check is done on the result.
pub fn raw_from_triple(triple: &[u8]) -> i32 {
    (i32::from(triple[0]) << 16) | (i32::from(triple[1]) << 8) | i32::from(triple[2])
}

/// Drop the padding bits of a raw register value.
pub fn adc_from_raw(raw: i32) -> i32 {
    raw >> 4
}

/// Intermediate "fine" temperature, shared by the temperature and pressure
/// formulas.
///
/// The datasheet computes this in 32 bits, which wraps for some extreme
/// calibration words. In 64 bits every 20-bit input fits without wrapping.
pub fn fine_temperature(adc_t: i32, calib: &Calibration) -> i64 {
    let adc_t = i64::from(adc_t);
    let t1 = i64::from(calib.dig_t1);
    let t2 = i64::from(calib.dig_t2);
    let t3 = i64::from(calib.dig_t3);

    let var1 = (((adc_t >> 3) - (t1 << 1)) * t2) >> 11;
    let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * t3) >> 14;
    var1 + var2
}

/// Temperature in 1/100 degrees Celsius.
pub fn temperature(adc_t: i32, calib: &Calibration) -> i32 {
    ((fine_temperature(adc_t, calib) * 5 + 128) >> 8) as i32
}

/// Pressure in 1/256 Pa.
///
/// Returns 0 when the calibration makes the divisor vanish.
pub fn pressure(adc_p: i32, adc_t: i32, calib: &Calibration) -> u32 {
    let p1 = i64::from(calib.dig_p1);
    let p2 = i64::from(calib.dig_p2);
    let p3 = i64::from(calib.dig_p3);
    let p4 = i64::from(calib.dig_p4);
    let p5 = i64::from(calib.dig_p5);
    let p6 = i64::from(calib.dig_p6);
    let p7 = i64::from(calib.dig_p7);
    let p8 = i64::from(calib.dig_p8);
    let p9 = i64::from(calib.dig_p9);

    // Out-of-range readings wrap in two's complement.
    let mut var1 = fine_temperature(adc_t, calib) - 128000;
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5).wrapping_shl(17));
    var2 = var2.wrapping_add(p4.wrapping_shl(35));
    var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8)
        .wrapping_add(var1.wrapping_mul(p2).wrapping_shl(12));
    var1 = (1i64 << 47).wrapping_add(var1).wrapping_mul(p1) >> 33;
    if var1 == 0 {
        return 0;
    }

    let mut p = 1048576 - i64::from(adc_p);
    p = p
        .wrapping_shl(31)
        .wrapping_sub(var2)
        .wrapping_mul(3125)
        .wrapping_div(var1);
    var1 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    var2 = p8.wrapping_mul(p) >> 19;
    p = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);
    p as u32
}
