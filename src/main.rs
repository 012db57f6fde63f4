mod domain;
mod clients;
mod messages;
mod error;
mod config;

mod app_system;
mod actors;
mod view;

#[cfg(test)]
mod mock_framework;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::app_system::{setup_tracing, DirectorySystem};
use crate::clients::HttpUserClient;
use crate::config::DirectoryConfig;
use crate::view::{enter_terminal, event_source_from_env, leave_terminal, pump_events, Tui};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DirectoryConfig::load()?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_level, config.log_dir.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.api_url,
        "Starting user directory"
    );

    let api = HttpUserClient::new(&config.api_url);
    let system = DirectorySystem::new(api, config.mailbox_size);

    let source = event_source_from_env()?;
    let scripted = source.is_scripted();

    let terminal = enter_terminal(scripted)?;
    let (sender, receiver) = mpsc::channel(64);
    let pump = pump_events(source, sender);

    let mut tui = Tui::new(system.directory_client.clone(), terminal);
    let result = tui.run(receiver).await;

    let mut terminal = tui.into_terminal();
    leave_terminal(&mut terminal, scripted)?;
    // The receiver went away with `run`; the pump stops at its next poll.
    pump.await?;

    if let Err(e) = result {
        error!(error = %e, "Terminal UI failed");
    }

    system.shutdown().await?;

    info!("User directory closed");
    Ok(())
}
