//! Diagnostic dump of the function every GPIO pin is configured for.

use std::io::Write;
use std::ops::Range;

use log::warn;
use rppal::gpio::{Gpio, Mode};

use crate::error::GpioError;
use crate::gpio::NumberingMode;

pub trait PinFunctions {
    fn numbering_mode(&self) -> NumberingMode;

    /// Current function of `pin` (input, output or one of the alternates).
    fn function(&self, pin: u8) -> Result<Mode, GpioError>;
}

impl PinFunctions for Gpio {
    fn numbering_mode(&self) -> NumberingMode {
        NumberingMode::Bcm
    }

    fn function(&self, pin: u8) -> Result<Mode, GpioError> {
        Ok(self.get(pin)?.mode())
    }
}

/// Writes the numbering mode followed by one `GPIO-<pin>: <function>` line
/// per pin. Pins that cannot be queried are reported and skipped over.
pub fn print_gpio_status<P, W>(gpio: &P, pins: Range<u8>, out: &mut W) -> std::io::Result<()>
where
    P: PinFunctions,
    W: Write,
{
    writeln!(out, "GPIO mode: {}", gpio.numbering_mode())?;
    writeln!(out, "GPIO Pin Status:")?;

    for pin in pins {
        match gpio.function(pin) {
            Ok(mode) => writeln!(out, "GPIO-{}: {}", pin, mode)?,
            Err(err) => {
                warn!("Could not query GPIO{}: {}", pin, err);
                writeln!(out, "GPIO-{}: unavailable ({})", pin, err)?;
            }
        }
    }

    Ok(())
}
