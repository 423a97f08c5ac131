//! Typed timetable model built from raw Indico export records.
//!
//! The raw export uses stringly-typed stamps and optional fields everywhere.
//! [`Schedule::from_records`] is the validation boundary: past it, every
//! session and talk has concrete zoned start and end times, and both lists
//! are sorted by start time then id (the ordering Indico's own timetable
//! view uses).

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use indico_client::{ContributionRecord, PersonRecord, SessionRecord, Stamp};

use crate::error::{CrierError, Result};

/// A person attached to a session or talk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    /// Space-joined display name, skipping empty parts.
    ///
    /// Returns `-` when no part of the name is available.
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(title) = self.title.as_deref() {
            if !title.is_empty() {
                parts.push(title);
            }
        }
        if !self.first_name.is_empty() {
            parts.push(&self.first_name);
        }
        if !self.last_name.is_empty() {
            parts.push(&self.last_name);
        }
        if parts.is_empty() {
            "-".to_owned()
        } else {
            parts.join(" ")
        }
    }
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        Self {
            title: record.title,
            first_name: record.first_name,
            last_name: record.last_name,
        }
    }
}

/// A scheduled contribution within a session.
#[derive(Debug, Clone)]
pub struct Talk {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Contribution type as labelled in Indico (e.g. "Talk", "Break").
    pub kind: Option<String>,
    pub speakers: Vec<Person>,
}

/// A session block in one room, holding zero or more talks.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub title: String,
    pub room: String,
    pub url: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub conveners: Vec<Person>,
    pub talks: Vec<Talk>,
}

/// The validated event timetable.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    sessions: Vec<Session>,
}

impl Schedule {
    /// Validate raw export records into a sorted schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if any session or talk is missing a start or end
    /// stamp, or carries a stamp that cannot be resolved in its timezone.
    pub fn from_records(records: Vec<SessionRecord>) -> Result<Self> {
        let mut sessions = Vec::with_capacity(records.len());
        for record in records {
            sessions.push(session_from_record(record)?);
        }
        Ok(Self::from_sessions(sessions))
    }

    /// Build a schedule from already-typed sessions.
    pub fn from_sessions(mut sessions: Vec<Session>) -> Self {
        sessions.sort_by_key(|s| (s.start, s.id));
        for session in &mut sessions {
            session.talks.sort_by_key(|t| (t.start, t.id));
        }
        Self { sessions }
    }

    /// Sessions in announcement order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Unique room names in use, sorted.
    pub fn rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = self.sessions.iter().map(|s| s.room.clone()).collect();
        rooms.sort();
        rooms.dedup();
        rooms
    }
}

fn session_from_record(record: SessionRecord) -> Result<Session> {
    let start = required_stamp(&record.start_date, "session", "startDate", record.id)?;
    let end = required_stamp(&record.end_date, "session", "endDate", record.id)?;

    let mut talks = Vec::with_capacity(record.contributions.len());
    for contribution in record.contributions {
        talks.push(talk_from_record(contribution)?);
    }

    Ok(Session {
        id: record.id,
        title: record.title,
        room: record.room,
        url: record.url,
        start,
        end,
        conveners: record.conveners.into_iter().map(Person::from).collect(),
        talks,
    })
}

fn talk_from_record(record: ContributionRecord) -> Result<Talk> {
    let start = required_stamp(&record.start_date, "talk", "startDate", record.id)?;
    let end = required_stamp(&record.end_date, "talk", "endDate", record.id)?;

    Ok(Talk {
        id: record.id,
        title: record.title,
        url: record.url,
        start,
        end,
        kind: record.kind,
        speakers: record.speakers.into_iter().map(Person::from).collect(),
    })
}

fn required_stamp(
    stamp: &Option<Stamp>,
    what: &str,
    field: &str,
    id: i64,
) -> Result<DateTime<Tz>> {
    let stamp = stamp
        .as_ref()
        .ok_or_else(|| CrierError::Schedule(format!("{what} {id} is missing {field}")))?;
    parse_stamp(stamp, what, id)
}

fn parse_stamp(stamp: &Stamp, what: &str, id: i64) -> Result<DateTime<Tz>> {
    let tz: Tz = stamp.tz.parse().map_err(|_| {
        CrierError::Schedule(format!("{what} {id} has unknown timezone '{}'", stamp.tz))
    })?;
    let naive = NaiveDateTime::parse_from_str(
        &format!("{}T{}", stamp.date, stamp.time),
        "%Y-%m-%dT%H:%M:%S",
    )
    .map_err(|e| {
        CrierError::Schedule(format!(
            "{what} {id} has invalid stamp '{} {}': {e}",
            stamp.date, stamp.time
        ))
    })?;
    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        CrierError::Schedule(format!(
            "{what} {id} stamp '{} {}' does not exist in {}",
            stamp.date, stamp.time, stamp.tz
        ))
    })
}
