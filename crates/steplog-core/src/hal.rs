//! Hardware abstraction
//!
//! The sampler and step session talk to the analog world through these two
//! traits and own their collaborators as boxed trait objects, so tests can
//! substitute scripted fakes and the binaries can plug in the simulator.

/// Source of raw ADC codes
pub trait AnalogInput {
    /// Read the current raw code from the converter
    fn read_raw(&mut self) -> u16;
}

/// Sink for a commanded output voltage
pub trait AnalogOutput {
    /// Drive the output to the given voltage
    fn write_output(&mut self, volts: f64);
}
