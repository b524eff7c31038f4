//! Power sensor abstraction
//!
//! The monitor only sees [`PowerSensor`]; bus setup and register
//! programming live with the concrete driver on the firmware side.

use thiserror_no_std::Error;

/// One conversion result from an INA228-style power monitor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerReading {
    /// Bus voltage in V
    pub bus_voltage_v: f32,
    /// Voltage across the shunt in V
    pub shunt_voltage_v: f32,
    /// Die temperature in °C
    pub die_temperature_c: f32,
    /// Current in mA, negative while charging
    pub current_ma: f32,
    /// Energy accumulated since the sensor was reset, in Ws
    pub energy_ws: f32,
}

/// Errors a power sensor can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("no conversion ready")]
    NotReady,

    #[error("{sensor} read failed: {details}")]
    ReadFailed {
        sensor: &'static str,
        details: &'static str,
    },
}

/// Source of power readings
pub trait PowerSensor {
    /// Fetch the latest conversion.
    fn read(&mut self) -> Result<PowerReading, SensorError>;
}

impl<S: PowerSensor + ?Sized> PowerSensor for &mut S {
    fn read(&mut self) -> Result<PowerReading, SensorError> {
        (**self).read()
    }
}
