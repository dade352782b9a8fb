//! Unit Conversion Functions
//!
//! Linear conversions between raw ADC codes and voltages. No calibration or
//! filtering; out-of-range codes are the input source's problem.

/// Convert a raw ADC code to a voltage.
///
/// Pure linear mapping: code 0 reads as 0 V, the top code
/// (`resolution - 1`) reads as the full reference voltage.
pub fn raw_to_volts(raw: u16, resolution: u32, reference_volts: f64) -> f64 {
    raw as f64 / (resolution - 1) as f64 * reference_volts
}

/// Convert a voltage back to the nearest raw ADC code, saturating at the
/// ends of the code range.
pub fn volts_to_raw(volts: f64, resolution: u32, reference_volts: f64) -> u16 {
    let top = (resolution - 1) as f64;
    (volts / reference_volts * top).round().clamp(0.0, top) as u16
}

/// Clamp a commanded voltage into the drivable `[0, reference]` range
pub fn clamp_volts(volts: f64, reference_volts: f64) -> f64 {
    volts.clamp(0.0, reference_volts)
}
