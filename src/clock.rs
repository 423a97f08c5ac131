//! Wall-clock and simulated time sources.
//!
//! Announcements are driven by an [`EventClock`] that reports the current
//! time in the event timezone. For rehearsals the clock can be started from
//! an arbitrary stamp; it then advances at real speed from that point. All
//! simulated clocks in a process share a [`ClockOrigin`] so they agree on
//! how much time has elapsed.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CrierError, Result};

/// Format accepted for simulated start stamps, e.g. `2026-06-01T09:59:00`.
pub const SIM_START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Process-wide anchor for simulated clocks.
///
/// Capture one of these at startup and hand it to every clock you build.
#[derive(Debug, Clone, Copy)]
pub struct ClockOrigin(tokio::time::Instant);

impl ClockOrigin {
    /// Capture the current instant.
    pub fn capture() -> Self {
        Self(tokio::time::Instant::now())
    }

    fn elapsed(self) -> Duration {
        let elapsed = self.0.elapsed();
        Duration::milliseconds(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
    }
}

#[derive(Debug, Clone)]
enum ClockMode {
    Wall,
    Simulated {
        origin: ClockOrigin,
        start: DateTime<Tz>,
    },
}

/// Time source for the dispatcher, real or simulated.
#[derive(Debug, Clone)]
pub struct EventClock {
    tz: Tz,
    mode: ClockMode,
}

impl EventClock {
    /// Build a clock reporting in `timezone`.
    ///
    /// With `simulated_start` set, [`now`](Self::now) reports that stamp
    /// plus the time elapsed since `origin`; otherwise it reports the real
    /// wall clock converted to `timezone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone is unknown, or if the simulated
    /// start does not match [`SIM_START_FORMAT`] or names a local time that
    /// does not exist in that zone.
    pub fn new(origin: ClockOrigin, timezone: &str, simulated_start: Option<&str>) -> Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| CrierError::Clock(format!("unknown timezone '{timezone}'")))?;
        let mode = match simulated_start {
            None => ClockMode::Wall,
            Some(stamp) => {
                let naive = NaiveDateTime::parse_from_str(stamp, SIM_START_FORMAT)
                    .map_err(|e| CrierError::Clock(format!("bad simulated start '{stamp}': {e}")))?;
                // Ambiguous local times (DST fall-back) resolve to the
                // earlier instant.
                let start = tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
                    CrierError::Clock(format!(
                        "simulated start '{stamp}' does not exist in {timezone}"
                    ))
                })?;
                ClockMode::Simulated { origin, start }
            }
        };
        Ok(Self { tz, mode })
    }

    /// Current time in the event timezone.
    pub fn now(&self) -> DateTime<Tz> {
        match &self.mode {
            ClockMode::Wall => Utc::now().with_timezone(&self.tz),
            ClockMode::Simulated { origin, start } => *start + origin.elapsed(),
        }
    }

    /// The timezone this clock reports in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_clock_starts_at_the_given_stamp() {
        let origin = ClockOrigin::capture();
        let clock = EventClock::new(origin, "Europe/Zurich", Some("2026-06-01T09:59:00")).unwrap();
        assert_eq!(
            clock.now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2026-06-01 09:59:00"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_clock_advances_with_elapsed_time() {
        let origin = ClockOrigin::capture();
        let clock = EventClock::new(origin, "Europe/Zurich", Some("2026-06-01T09:59:00")).unwrap();

        tokio::time::advance(std::time::Duration::from_secs(90)).await;
        assert_eq!(clock.now().format("%H:%M:%S").to_string(), "10:00:30");
    }

    #[tokio::test(start_paused = true)]
    async fn clocks_sharing_an_origin_agree() {
        let origin = ClockOrigin::capture();
        let first = EventClock::new(origin, "Europe/Zurich", Some("2026-06-01T09:00:00")).unwrap();

        tokio::time::advance(std::time::Duration::from_secs(5)).await;
        let second = EventClock::new(origin, "Europe/Zurich", Some("2026-06-01T09:00:00")).unwrap();
        assert_eq!(first.now(), second.now());
    }

    #[test]
    fn wall_clock_tracks_utc() {
        let clock = EventClock::new(ClockOrigin::capture(), "UTC", None).unwrap();
        let before = Utc::now();
        let now = clock.now().with_timezone(&Utc);
        let after = Utc::now();
        assert!(now >= before && now <= after);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let result = EventClock::new(ClockOrigin::capture(), "Mars/Olympus_Mons", None);
        assert!(matches!(result, Err(CrierError::Clock(_))));
    }

    #[test]
    fn malformed_simulated_start_is_rejected() {
        let result = EventClock::new(
            ClockOrigin::capture(),
            "Europe/Zurich",
            Some("2026-06-01 09:00:00"),
        );
        assert!(matches!(result, Err(CrierError::Clock(_))));
    }

    #[test]
    fn nonexistent_local_time_is_rejected() {
        // Europe/Zurich springs forward over 02:00-03:00 on 2026-03-29.
        let result = EventClock::new(
            ClockOrigin::capture(),
            "Europe/Zurich",
            Some("2026-03-29T02:30:00"),
        );
        assert!(matches!(result, Err(CrierError::Clock(_))));
    }
}
