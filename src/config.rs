use std::num::NonZeroU32;

use clap::Parser;
use tokio::time::Duration;

/// BCM number of the pin the toggle switch pulls to ground.
pub const DEFAULT_PIN: u8 = 25;

/// Number of consecutive LOW reads required for a shorted verdict.
pub const DEFAULT_SAMPLE_COUNT: NonZeroU32 = match NonZeroU32::new(20) {
    Some(count) => count,
    None => panic!("sample count must not be zero"),
};

/// Delay after each read within one sampling window.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Delay between two sampling windows while the switch stays closed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

pub const DEFAULT_SHUTDOWN_COMMAND: &str = "sudo shutdown -h now";

/// Exit status chosen when the user interrupts monitoring.
pub const EXIT_INTERRUPTED: u8 = 42;

/// First pin listed by the pin-status dump.
pub const FIRST_LISTED_PIN: u8 = 2;

/// End (exclusive) of the pins listed by the pin-status dump.
pub const END_LISTED_PIN: u8 = 28;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub pin: u8,
    pub sample_count: NonZeroU32,
    pub sample_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            pin: DEFAULT_PIN,
            sample_count: DEFAULT_SAMPLE_COUNT,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Shuts the system down once the toggle switch is opened
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// BCM number of the pin wired to the toggle switch
    #[arg(long, default_value_t = DEFAULT_PIN)]
    pub pin: u8,

    /// Consecutive LOW reads required to consider the switch closed
    #[arg(long, default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub samples: NonZeroU32,

    /// Delay in milliseconds after each read
    #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL.as_millis() as u64)]
    pub sample_interval_ms: u64,

    /// Delay in milliseconds between two sampling windows
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,

    /// Command to execute to shut down the system
    #[arg(long, default_value = DEFAULT_SHUTDOWN_COMMAND)]
    pub shutdown: String,
}

impl Args {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            pin: self.pin,
            sample_count: self.samples,
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Lists the configured function of every GPIO pin
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct PinArgs {
    /// First BCM pin to list
    #[arg(long, default_value_t = FIRST_LISTED_PIN)]
    pub first: u8,

    /// BCM pin to stop before
    #[arg(long, default_value_t = END_LISTED_PIN)]
    pub last: u8,
}
