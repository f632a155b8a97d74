use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GpioError {
    #[error("GPIO access failed: {0}")]
    Rppal(#[from] rppal::gpio::Error),

    #[error("GPIO{pin} has not been configured as an input.")]
    NotConfigured { pin: u8 },
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command is empty or whitespace.")]
    NoCommand,

    #[error("Command could not be started: {0}")]
    Spawn(#[from] std::io::Error),
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Gpio(#[from] GpioError),

    #[error(transparent)]
    Shutdown(#[from] CommandError),

    #[error("Writing to the console failed: {0}")]
    Console(#[from] std::io::Error),
}
