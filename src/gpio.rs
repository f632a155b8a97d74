//! GPIO capabilities used by the monitor.
//!
//! `GpioAccess` is the seam between the monitor's decisions and the
//! hardware. `RppalGpio` is the real backend; `crate::dummy::DummyGpio`
//! replaces it in tests.

use std::collections::BTreeMap;

use log::{debug, info};
use rppal::gpio::{Gpio, InputPin, Level};

use crate::error::GpioError;

/// Pin naming convention. rppal always addresses pins by their BCM number.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumberingMode {
    Bcm,
}

pub trait GpioAccess {
    fn numbering_mode(&self) -> NumberingMode;

    /// Configure `pin` as a digital input without pull resistor.
    fn configure_input(&mut self, pin: u8) -> Result<(), GpioError>;

    fn read(&self, pin: u8) -> Result<Level, GpioError>;

    /// Reset every pin configured by this handle. Calling it again is a no-op.
    fn release_all(&mut self);
}

#[derive(Debug)]
pub struct RppalGpio {
    gpio: Gpio,
    inputs: BTreeMap<u8, InputPin>,
}

impl RppalGpio {
    pub fn new() -> Result<RppalGpio, GpioError> {
        Ok(RppalGpio {
            gpio: Gpio::new()?,
            inputs: BTreeMap::new(),
        })
    }
}

impl GpioAccess for RppalGpio {
    fn numbering_mode(&self) -> NumberingMode {
        NumberingMode::Bcm
    }

    fn configure_input(&mut self, pin: u8) -> Result<(), GpioError> {
        // Dropping an InputPin restores the mode the pin had before.
        let input = self.gpio.get(pin)?.into_input();
        debug!("GPIO{} configured as input", pin);
        self.inputs.insert(pin, input);

        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Level, GpioError> {
        self.inputs
            .get(&pin)
            .map(InputPin::read)
            .ok_or(GpioError::NotConfigured { pin })
    }

    fn release_all(&mut self) {
        if !self.inputs.is_empty() {
            info!("Releasing {} GPIO pin(s)", self.inputs.len());
            self.inputs.clear();
        }
    }
}

impl std::fmt::Display for NumberingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NumberingMode::Bcm => write!(f, "BCM"),
        }
    }
}
