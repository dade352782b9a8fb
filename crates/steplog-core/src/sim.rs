//! Simulated analog plant
//!
//! First-order lag plant for running the logger without bench hardware:
//! the sensor voltage relaxes toward `ambient + gain * setpoint` with a
//! configurable time constant, plus a little measurement noise. Stands in
//! for the thermal rig the logger was built against.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

use crate::convert;
use crate::hal::{AnalogInput, AnalogOutput};

/// First-order plant with an ADC front end and a drivable setpoint input
pub struct PlantSimulator {
    setpoint_volts: f64,
    sensor_volts: f64,
    ambient_volts: f64,
    gain: f64,
    time_constant_ms: f64,
    noise_volts: f64,
    last_update_ms: Option<u32>,
    adc_resolution: u32,
    reference_volts: f64,
    rng: StdRng,
}

impl PlantSimulator {
    /// Create a plant matched to the logger's ADC configuration.
    ///
    /// Default dynamics: 0.5 V ambient, gain 1.2, 8 s time constant,
    /// 10 mV measurement noise.
    pub fn new(reference_volts: f64, adc_resolution: u32) -> Self {
        Self {
            setpoint_volts: 0.0,
            sensor_volts: 0.5,
            ambient_volts: 0.5,
            gain: 1.2,
            time_constant_ms: 8000.0,
            noise_volts: 0.01,
            last_update_ms: None,
            adc_resolution,
            reference_volts,
            rng: StdRng::from_entropy(),
        }
    }

    /// Override the plant dynamics
    pub fn with_dynamics(mut self, gain: f64, time_constant_ms: f64) -> Self {
        self.gain = gain;
        self.time_constant_ms = time_constant_ms;
        self
    }

    /// Override the measurement noise amplitude (0 for deterministic runs)
    pub fn with_noise_volts(mut self, noise_volts: f64) -> Self {
        self.noise_volts = noise_volts;
        self
    }

    /// Seed the noise generator for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Advance the plant to `now_ms`, relaxing the sensor toward its
    /// steady-state value for the current setpoint
    pub fn advance(&mut self, now_ms: u32) {
        let delta_ms = match self.last_update_ms {
            Some(last) => now_ms.wrapping_sub(last),
            None => 0,
        };
        self.last_update_ms = Some(now_ms);
        if delta_ms == 0 {
            return;
        }

        let target = self.ambient_volts + self.gain * self.setpoint_volts;
        let alpha = 1.0 - (-(delta_ms as f64) / self.time_constant_ms).exp();
        self.sensor_volts += (target - self.sensor_volts) * alpha;
    }

    /// Current noiseless sensor voltage
    pub fn sensor_volts(&self) -> f64 {
        self.sensor_volts
    }

    /// Currently driven setpoint voltage
    pub fn setpoint_volts(&self) -> f64 {
        self.setpoint_volts
    }

    fn sample_raw(&mut self) -> u16 {
        let noisy = self.sensor_volts
            + self.rng.gen_range(-self.noise_volts..=self.noise_volts);
        convert::volts_to_raw(noisy, self.adc_resolution, self.reference_volts)
    }

    fn set_drive(&mut self, volts: f64) {
        self.setpoint_volts = convert::clamp_volts(volts, self.reference_volts);
    }

    /// Split the plant into a shared handle plus input and output sides.
    ///
    /// The session owns the input and output boxes; the caller keeps the
    /// handle to `advance` the plant each loop iteration. Single-threaded
    /// by design, like the rest of the loop.
    pub fn shared(self) -> (Rc<RefCell<PlantSimulator>>, SimInput, SimOutput) {
        let plant = Rc::new(RefCell::new(self));
        (plant.clone(), SimInput(plant.clone()), SimOutput(plant))
    }
}

/// ADC side of a shared [`PlantSimulator`]
pub struct SimInput(Rc<RefCell<PlantSimulator>>);

impl AnalogInput for SimInput {
    fn read_raw(&mut self) -> u16 {
        self.0.borrow_mut().sample_raw()
    }
}

/// Setpoint drive side of a shared [`PlantSimulator`]
pub struct SimOutput(Rc<RefCell<PlantSimulator>>);

impl AnalogOutput for SimOutput {
    fn write_output(&mut self, volts: f64) {
        self.0.borrow_mut().set_drive(volts);
    }
}
