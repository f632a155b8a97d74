use std::process::ExitCode;

use clap::Parser;
use log::info;
use toggle_shutdown::config::Args;
use toggle_shutdown::gpio::RppalGpio;
use toggle_shutdown::monitor::ToggleMonitor;
use toggle_shutdown::shutdown::CommandShutdown;
use toggle_shutdown::signals::setup_signals;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cancellation_token = setup_signals();

    let outcome = {
        let mut monitor = ToggleMonitor::new(
            RppalGpio::new()?,
            CommandShutdown::new(args.shutdown.clone()),
            std::io::stdout(),
            args.monitor_config(),
            cancellation_token,
        )?;

        monitor.run().await?
    };

    info!("Exiting with status {}", outcome.exit_code());

    Ok(ExitCode::from(outcome.exit_code()))
}
