//! Toggle switch monitor.
//!
//! The switch pulls its pin to ground while closed. The monitor keeps
//! sampling the pin and requests a shutdown as soon as one sampling window
//! sees anything other than LOW.

use std::io::Write;

use log::{debug, info};
use rppal::gpio::Level;
use tokio::select;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::config::{MonitorConfig, EXIT_INTERRUPTED};
use crate::error::{GpioError, MonitorError};
use crate::gpio::GpioAccess;
use crate::shutdown::Shutdown;

/// Reads `config.pin` up to `config.sample_count` times, sleeping
/// `config.sample_interval` after every LOW read. True only if every read was
/// LOW; returns on the first other level.
pub async fn sample_is_shorted<G: GpioAccess>(
    gpio: &G,
    config: &MonitorConfig,
) -> Result<bool, GpioError> {
    for sample in 0..config.sample_count.get() {
        let level = gpio.read(config.pin)?;
        debug!("GPIO{} sample {}: {:?}", config.pin, sample, level);

        if level != Level::Low {
            return Ok(false);
        }

        sleep(config.sample_interval).await;
    }

    Ok(true)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The switch was opened and the shutdown command has been issued.
    ShutdownIssued,
    /// Monitoring was interrupted by a signal.
    Interrupted,
}

impl Outcome {
    /// Status the process exits with once the GPIO pins have been released.
    pub fn exit_code(&self) -> u8 {
        // The Python script this replaces chose 42 on interrupt but then
        // exited 0 unconditionally in its cleanup block, so 42 never reached
        // the caller. Interrupts exit 42 here.
        match self {
            Outcome::ShutdownIssued => 0,
            Outcome::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Monitoring,
    ShuttingDown,
    Terminated(Outcome),
}

/// Owns the GPIO handle for its whole lifetime and releases it on drop,
/// whichever way monitoring ended.
pub struct ToggleMonitor<G: GpioAccess, S: Shutdown, W: Write> {
    gpio: G,
    shutdown: S,
    console: W,
    config: MonitorConfig,
    cancellation_token: CancellationToken,
}

impl<G: GpioAccess, S: Shutdown, W: Write> ToggleMonitor<G, S, W> {
    pub fn new(
        gpio: G,
        shutdown: S,
        console: W,
        config: MonitorConfig,
        cancellation_token: CancellationToken,
    ) -> Result<ToggleMonitor<G, S, W>, GpioError> {
        let mut monitor = ToggleMonitor {
            gpio,
            shutdown,
            console,
            config,
            cancellation_token,
        };

        monitor.gpio.configure_input(monitor.config.pin)?;

        info!(
            "Monitoring GPIO{} ({} numbering): {} samples every {} ms, re-poll after {} ms",
            monitor.config.pin,
            monitor.gpio.numbering_mode(),
            monitor.config.sample_count,
            monitor.config.sample_interval.as_millis(),
            monitor.config.poll_interval.as_millis()
        );

        Ok(monitor)
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// Drives the state machine until it terminates. The shutdown command is
    /// issued at most once.
    pub async fn run(&mut self) -> Result<Outcome, MonitorError> {
        let mut state = MonitorState::Monitoring;

        loop {
            state = match state {
                MonitorState::Monitoring => self.monitor().await?,
                MonitorState::ShuttingDown => {
                    self.shutdown.shutdown().await?;
                    MonitorState::Terminated(Outcome::ShutdownIssued)
                }
                MonitorState::Terminated(outcome) => {
                    info!("Monitoring finished: {}", outcome);
                    return Ok(outcome);
                }
            };
        }
    }

    async fn monitor(&mut self) -> Result<MonitorState, MonitorError> {
        let verdict = select! {
            biased;
            _ = self.cancellation_token.cancelled() => None,
            shorted = sample_is_shorted(&self.gpio, &self.config) => Some(shorted?),
        };

        match verdict {
            None => self.interrupted(),
            Some(true) => {
                writeln!(self.console, "GPIO{} is shorted to ground!", self.config.pin)?;

                if self.sleep_or_cancelled(self.config.poll_interval).await {
                    return self.interrupted();
                }

                Ok(MonitorState::Monitoring)
            }
            Some(false) => {
                writeln!(
                    self.console,
                    "GPIO{} Toggle has been switched to off. Executing shutdown",
                    self.config.pin
                )?;

                Ok(MonitorState::ShuttingDown)
            }
        }
    }

    fn interrupted(&mut self) -> Result<MonitorState, MonitorError> {
        writeln!(self.console, "\nScript interrupted by user.")?;

        Ok(MonitorState::Terminated(Outcome::Interrupted))
    }

    /// Returns true if the token was cancelled before `duration` elapsed.
    async fn sleep_or_cancelled(&self, duration: Duration) -> bool {
        select! {
            biased;
            _ = self.cancellation_token.cancelled() => true,
            _ = sleep(duration) => false,
        }
    }
}

impl<G: GpioAccess, S: Shutdown, W: Write> Drop for ToggleMonitor<G, S, W> {
    fn drop(&mut self) {
        self.gpio.release_all();
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
