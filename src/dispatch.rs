//! Time-driven announcement dispatch.
//!
//! The dispatcher walks the schedule in order and, for the one room it
//! monitors, announces each session and talk at its scheduled moment. The
//! schedule is already sorted, so waiting on the current item never delays
//! an earlier one. Items whose moment has passed are logged and skipped;
//! a session that has already ended is skipped without looking at its
//! talks.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::clock::EventClock;
use crate::error::Result;
use crate::notify::{ChannelRouter, Notifier};
use crate::schedule::{Schedule, Session, Talk};

/// How often a waiting dispatcher re-reads the clock.
pub const DEFAULT_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Longest title shown verbatim in log lines.
const LOG_TITLE_LIMIT: usize = 37;

/// Counters for one dispatcher run.
///
/// Sessions in other rooms are not counted; they belong to other
/// dispatchers. Talks of a session that had already ended are not counted
/// either, since they are never looked at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sessions_announced: usize,
    pub talks_announced: usize,
    pub sessions_skipped: usize,
    pub talks_skipped: usize,
}

/// Announces one room's sessions and talks as their start times arrive.
pub struct Dispatcher {
    clock: EventClock,
    router: ChannelRouter,
    room: String,
    schedule_delay: Duration,
    excluded_types: Vec<String>,
    poll_interval: std::time::Duration,
}

impl Dispatcher {
    pub fn new(clock: EventClock, router: ChannelRouter, room: impl Into<String>) -> Self {
        Self {
            clock,
            router,
            room: room.into(),
            schedule_delay: Duration::zero(),
            excluded_types: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Hold back talks other than the first in each session by `delay`.
    pub fn with_schedule_delay(mut self, delay: Duration) -> Self {
        self.schedule_delay = delay;
        self
    }

    /// Never announce talks whose contribution type appears in `types`.
    pub fn with_excluded_types(mut self, types: Vec<String>) -> Self {
        self.excluded_types = types;
        self
    }

    /// Override how often a waiting dispatcher re-reads the clock.
    pub fn with_poll_interval(mut self, interval: std::time::Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Dispatch every announcement for the monitored room.
    ///
    /// Blocks (asynchronously) until the last announcement for the room has
    /// been delivered or skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the room cannot be routed to a channel or an
    /// announcement fails to deliver. Either aborts the run.
    pub async fn run(&self, schedule: &Schedule) -> Result<DispatchReport> {
        let mut report = DispatchReport::default();
        for session in schedule.sessions() {
            self.dispatch_session(session, &mut report).await?;
        }
        info!(
            "announced {} session(s) and {} talk(s), skipped {} session(s) and {} talk(s)",
            report.sessions_announced,
            report.talks_announced,
            report.sessions_skipped,
            report.talks_skipped,
        );
        Ok(report)
    }

    async fn dispatch_session(&self, session: &Session, report: &mut DispatchReport) -> Result<()> {
        if session.room != self.room {
            return Ok(());
        }
        if self.clock.now() > session.end {
            report.sessions_skipped += 1;
            return Ok(());
        }

        let notifier = self.router.resolve(&session.room)?;
        let title = log_title(&session.title);

        debug!("time is {}", self.clock.now());

        if self.clock.now() < session.start {
            info!("waiting until {} to announce session '{title}'", session.start);
            self.wait_until(session.start).await;
            notifier.announce_session(session).await?;
            report.sessions_announced += 1;
        } else {
            info!("ignoring session '{title}' that has already started");
            report.sessions_skipped += 1;
        }

        for talk in &session.talks {
            self.dispatch_talk(notifier, session, talk, report).await?;
        }
        Ok(())
    }

    async fn dispatch_talk(
        &self,
        notifier: &dyn Notifier,
        session: &Session,
        talk: &Talk,
        report: &mut DispatchReport,
    ) -> Result<()> {
        if self.clock.now() > talk.end {
            report.talks_skipped += 1;
            return Ok(());
        }
        if let Some(kind) = talk.kind.as_deref() {
            if self.excluded_types.iter().any(|t| t == kind) {
                debug!("skipping talk with filtered type {kind}");
                report.talks_skipped += 1;
                return Ok(());
            }
        }

        let title = log_title(&talk.title);
        debug!("time is {}", self.clock.now());

        if talk.start == session.start {
            // The first talk rides on the session announcement that was
            // just delivered (or deliberately withheld).
            info!("announcing '{title}' first in the session");
            notifier.announce_talk(session, talk).await?;
            report.talks_announced += 1;
        } else {
            let threshold = talk.start + self.schedule_delay;
            if self.clock.now() < threshold {
                info!("waiting until {threshold} to announce talk '{title}'");
                self.wait_until(threshold).await;
                notifier.announce_talk(session, talk).await?;
                report.talks_announced += 1;
            } else {
                info!("ignoring talk '{title}' that has already started");
                report.talks_skipped += 1;
            }
        }
        Ok(())
    }

    async fn wait_until(&self, deadline: DateTime<Tz>) {
        while self.clock.now() < deadline {
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn log_title(title: &str) -> String {
    if title.chars().count() > LOG_TITLE_LIMIT {
        let short: String = title.chars().take(LOG_TITLE_LIMIT).collect();
        format!("{short}...")
    } else {
        title.to_owned()
    }
}
