//! Announce sessions and talks to dedicated Slack channels.
//!
//! Fetches the event timetable, asks which room to monitor, then walks that
//! room's schedule announcing each session and talk as its start time
//! arrives. Runs until the last item in the room has been handled.

use std::path::PathBuf;

use clap::Parser;
use indico_client::Event;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crier::clock::{ClockOrigin, EventClock};
use crier::config::CrierConfig;
use crier::dispatch::Dispatcher;
use crier::notify::slack::router_from_config;
use crier::rooms::choose_one_room;
use crier::schedule::Schedule;

/// Announce sessions and contributions to dedicated Slack channels.
#[derive(Parser)]
#[command(name = "crier", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Write debug information to the terminal.
    #[arg(short, long)]
    debug: bool,

    /// Spoof the clock as if it read this time when the program started.
    /// ISO 8601 format YYYY-MM-DDTHH:MM:SS; the event timezone is assumed.
    #[arg(short = 's', long)]
    simulated_start_time: Option<String>,

    /// Delay the announcement of talks other than the first in each
    /// session by this many minutes.
    #[arg(short = 'k', long, default_value_t = 0)]
    schedule_delay: u32,
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

    if let Some(ref stamp) = cli.simulated_start_time {
        debug!("will spoof the clock to {stamp}");
    }
    if cli.schedule_delay > 0 {
        debug!(
            "will delay talk announcements by {} minutes",
            cli.schedule_delay
        );
    }

    let config = CrierConfig::from_file(&cli.config)?;

    let event = Event::new(config.indico.event_id, config.indico.api_token.clone())?
        .with_instance_url(config.indico.instance_url.clone())
        .with_timezone(config.indico.event_timezone.clone());

    debug!("fetching session information...");
    let records = event.get_sessions().await?;
    debug!("done");

    let schedule = Schedule::from_records(records)?;

    let stdin = std::io::stdin();
    let room = choose_one_room(&schedule.rooms(), stdin.lock(), std::io::stdout())?
        .ok_or_else(|| anyhow::anyhow!("no room selected"))?;
    println!("Selected: {room}");

    // Start the simulated clock now, or just set up the real clock.
    let origin = ClockOrigin::capture();
    let clock = EventClock::new(
        origin,
        &config.indico.event_timezone,
        cli.simulated_start_time.as_deref(),
    )?;

    let router = router_from_config(&config.slack)?;
    let dispatcher = Dispatcher::new(clock, router, room)
        .with_schedule_delay(chrono::Duration::minutes(i64::from(cli.schedule_delay)))
        .with_excluded_types(config.filters.talk_types.clone());

    dispatcher.run(&schedule).await?;
    Ok(())
}
