//! Shut a single-board computer down when a toggle switch wired to a GPIO
//! input is opened, plus a small GPIO pin-function dump.

pub mod config;
pub mod dummy;
pub mod error;
pub mod gpio;
pub mod monitor;
pub mod pins;
pub mod shutdown;
pub mod signals;
