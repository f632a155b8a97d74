use std::num::NonZeroU32;

use rppal::gpio::Level;
use tokio::time::{sleep, Duration, Instant};
use tokio_util::sync::CancellationToken;
use toggle_shutdown::config::MonitorConfig;
use toggle_shutdown::dummy::{DummyGpio, DummyShutdown};
use toggle_shutdown::error::{GpioError, MonitorError};
use toggle_shutdown::error::CommandError;
use toggle_shutdown::monitor::{Outcome, ToggleMonitor};
use toggle_shutdown::shutdown::CommandShutdown;

const SHORTED: &str = "GPIO25 is shorted to ground!";
const SWITCHED_OFF: &str = "GPIO25 Toggle has been switched to off. Executing shutdown";
const INTERRUPTED: &str = "Script interrupted by user.";

fn console_lines(console: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(console)
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn closed_switch_keeps_monitoring_until_opened() {
    let gpio = DummyGpio::new()
        .with_levels(vec![Level::Low; 40])
        .with_fallback(Level::High);
    let releases = gpio.releases();
    let shutdown = DummyShutdown::new();
    let invocations = shutdown.invocations();

    let mut monitor = ToggleMonitor::new(
        gpio,
        shutdown,
        Vec::new(),
        MonitorConfig::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let start = Instant::now();
    let outcome = monitor.run().await.unwrap();

    assert_eq!(outcome, Outcome::ShutdownIssued);
    assert_eq!(
        console_lines(monitor.console()),
        vec![SHORTED, SHORTED, SWITCHED_OFF]
    );
    // Two full windows of 2 s plus two re-poll delays of 1 s.
    assert!(start.elapsed() >= Duration::from_secs(6));
    assert_eq!(invocations.get(), 1);

    drop(monitor);
    assert_eq!(releases.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn single_high_read_triggers_one_shutdown() {
    let mut levels = vec![Level::Low; 5];
    levels.push(Level::High);
    levels.extend(vec![Level::Low; 14]);

    let gpio = DummyGpio::new().with_levels(levels);
    let reads = gpio.reads();
    let releases = gpio.releases();
    let shutdown = DummyShutdown::new();
    let invocations = shutdown.invocations();

    let mut monitor = ToggleMonitor::new(
        gpio,
        shutdown,
        Vec::new(),
        MonitorConfig::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let outcome = monitor.run().await.unwrap();

    assert_eq!(outcome, Outcome::ShutdownIssued);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(console_lines(monitor.console()), vec![SWITCHED_OFF]);
    assert_eq!(reads.get(), 6);
    assert_eq!(invocations.get(), 1);

    drop(monitor);
    assert_eq!(releases.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn interrupt_during_sleep_releases_once_and_exits_42() {
    let gpio = DummyGpio::new().with_fallback(Level::Low);
    let releases = gpio.releases();
    let shutdown = DummyShutdown::new();
    let invocations = shutdown.invocations();
    let cancellation_token = CancellationToken::new();

    let mut monitor = ToggleMonitor::new(
        gpio,
        shutdown,
        Vec::new(),
        MonitorConfig::default(),
        cancellation_token.clone(),
    )
    .unwrap();

    // Lands inside the re-poll delay following the first window.
    tokio::spawn(async move {
        sleep(Duration::from_millis(2500)).await;
        cancellation_token.cancel();
    });

    let outcome = monitor.run().await.unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(outcome.exit_code(), 42);
    assert_eq!(console_lines(monitor.console()), vec![SHORTED, INTERRUPTED]);
    assert_eq!(invocations.get(), 0);

    drop(monitor);
    assert_eq!(releases.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn interrupt_during_sampling_stops_the_window() {
    let gpio = DummyGpio::new().with_fallback(Level::Low);
    let reads = gpio.reads();
    let cancellation_token = CancellationToken::new();

    let mut monitor = ToggleMonitor::new(
        gpio,
        DummyShutdown::new(),
        Vec::new(),
        MonitorConfig::default(),
        cancellation_token.clone(),
    )
    .unwrap();

    tokio::spawn(async move {
        sleep(Duration::from_millis(550)).await;
        cancellation_token.cancel();
    });

    let outcome = monitor.run().await.unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(console_lines(monitor.console()), vec![INTERRUPTED]);
    assert!(reads.get() < 20);
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_never_shuts_down() {
    let gpio = DummyGpio::new().with_fallback(Level::High);
    let shutdown = DummyShutdown::new();
    let invocations = shutdown.invocations();
    let cancellation_token = CancellationToken::new();
    cancellation_token.cancel();

    let mut monitor = ToggleMonitor::new(
        gpio,
        shutdown,
        Vec::new(),
        MonitorConfig::default(),
        cancellation_token,
    )
    .unwrap();

    assert_eq!(monitor.run().await.unwrap(), Outcome::Interrupted);
    assert_eq!(invocations.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn custom_configuration_is_honoured() {
    let config = MonitorConfig {
        pin: 17,
        sample_count: NonZeroU32::new(3).unwrap(),
        sample_interval: Duration::from_millis(10),
        poll_interval: Duration::from_millis(50),
    };
    let gpio = DummyGpio::new()
        .with_levels(vec![Level::Low; 3])
        .with_fallback(Level::High);
    let reads = gpio.reads();

    let mut monitor = ToggleMonitor::new(
        gpio,
        DummyShutdown::new(),
        Vec::new(),
        config,
        CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(monitor.run().await.unwrap(), Outcome::ShutdownIssued);
    assert_eq!(
        console_lines(monitor.console()),
        vec![
            "GPIO17 is shorted to ground!",
            "GPIO17 Toggle has been switched to off. Executing shutdown",
        ]
    );
    assert_eq!(reads.get(), 4);
}

#[tokio::test(start_paused = true)]
async fn failing_shutdown_command_still_releases() {
    let gpio = DummyGpio::new().with_fallback(Level::High);
    let releases = gpio.releases();

    let mut monitor = ToggleMonitor::new(
        gpio,
        CommandShutdown::new("   "),
        Vec::new(),
        MonitorConfig::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let result = monitor.run().await;

    assert!(matches!(
        result,
        Err(MonitorError::Shutdown(CommandError::NoCommand))
    ));
    assert_eq!(console_lines(monitor.console()), vec![SWITCHED_OFF]);

    drop(monitor);
    assert_eq!(releases.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn read_failure_mid_window_still_releases() {
    let gpio = DummyGpio::new()
        .with_fallback(Level::Low)
        .with_read_failure_after(7);
    let reads = gpio.reads();
    let releases = gpio.releases();
    let shutdown = DummyShutdown::new();
    let invocations = shutdown.invocations();

    let mut monitor = ToggleMonitor::new(
        gpio,
        shutdown,
        Vec::new(),
        MonitorConfig::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let result = monitor.run().await;

    assert!(matches!(
        result,
        Err(MonitorError::Gpio(GpioError::Rppal(_)))
    ));
    assert!(console_lines(monitor.console()).is_empty());
    assert_eq!(reads.get(), 7);
    assert_eq!(invocations.get(), 0);

    drop(monitor);
    assert_eq!(releases.get(), 1);
}

#[test]
fn failed_configuration_still_releases() {
    let gpio = DummyGpio::new().with_unavailable(25);
    let releases = gpio.releases();

    let result = ToggleMonitor::new(
        gpio,
        DummyShutdown::new(),
        Vec::new(),
        MonitorConfig::default(),
        CancellationToken::new(),
    );

    assert!(matches!(result, Err(GpioError::Rppal(_))));
    assert_eq!(releases.get(), 1);
}

#[test]
fn monitor_errors_wrap_gpio_errors() {
    let err = MonitorError::from(GpioError::NotConfigured { pin: 25 });

    assert_eq!(
        err.to_string(),
        "GPIO25 has not been configured as an input."
    );
}
