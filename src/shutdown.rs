use chrono::Local;
use log::{info, warn};
use tokio::process::Command;

use crate::error::CommandError;

#[allow(async_fn_in_trait)]
pub trait Shutdown {
    /// Ask the host to power off. Returns once the request has been handed over.
    async fn shutdown(&mut self) -> Result<(), CommandError>;
}

/// Powers off by running a shell command such as `sudo shutdown -h now`.
#[derive(Debug, Clone)]
pub struct CommandShutdown {
    command: String,
}

impl CommandShutdown {
    pub fn new(command: impl Into<String>) -> CommandShutdown {
        CommandShutdown {
            command: command.into(),
        }
    }
}

impl Shutdown for CommandShutdown {
    async fn shutdown(&mut self) -> Result<(), CommandError> {
        info!(
            "Running shutdown command `{}` at {}",
            self.command,
            Local::now().format("%d-%m-%Y %H:%M:%S")
        );

        run_shell_command(&self.command).await
    }
}

async fn run_shell_command(command: &str) -> Result<(), CommandError> {
    let mut parts = command.split_whitespace();

    let command = parts.next().ok_or(CommandError::NoCommand)?;
    let arguments = parts.collect::<Vec<_>>();

    let exit_status = Command::new(command).args(arguments).status().await?;

    // The host is going down anyway, a failing status is only reported.
    if !exit_status.success() {
        warn!("Shutdown command exited with {}", exit_status);
    }

    Ok(())
}
