//! Update permissions of all presentation material in the event.
//!
//! Marks every unprotected attachment as restricted to registrants, using
//! the event's single registration form as the ACL.

use std::path::PathBuf;

use clap::Parser;
use indico_client::Event;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crier::config::CrierConfig;
use crier::protect::protect_event_material;

/// Update permissions of all presentation material in the event.
#[derive(Parser)]
#[command(name = "crier-protect", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Write debug information to the terminal.
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "crier=debug,indico_client=debug"
    } else {
        "crier=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = CrierConfig::from_file(&cli.config)?;

    let event = Event::new(config.indico.event_id, config.indico.api_token.clone())?
        .with_instance_url(config.indico.instance_url.clone())
        .with_timezone(config.indico.event_timezone.clone());

    let report = protect_event_material(&event).await?;
    info!(
        "protected {} attachment(s), {} already protected",
        report.protected, report.already_protected
    );
    Ok(())
}
