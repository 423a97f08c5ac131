//! Serde records mirroring the Indico HTTP export payloads.
//!
//! These are wire shapes, not a domain model: every field the server may
//! omit defaults to empty, and timestamps stay in Indico's
//! `{date, time, tz}` form. Callers decide what is required and convert.

use serde::Deserialize;

/// Indico's timestamp object, e.g. `{"date": "2026-06-01", "time":
/// "09:00:00", "tz": "Europe/Zurich"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stamp {
    pub date: String,
    pub time: String,
    pub tz: String,
}

/// A convener or speaker entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonRecord {
    /// Honorific title ("Dr", "Prof.", ...), often empty.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// One session block from the `detail=sessions` export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "startDate")]
    pub start_date: Option<Stamp>,
    #[serde(default, rename = "endDate")]
    pub end_date: Option<Stamp>,
    #[serde(default)]
    pub conveners: Vec<PersonRecord>,
    #[serde(default)]
    pub contributions: Vec<ContributionRecord>,
}

/// One contribution (talk) nested in a session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributionRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "startDate")]
    pub start_date: Option<Stamp>,
    #[serde(default, rename = "endDate")]
    pub end_date: Option<Stamp>,
    /// Contribution type tag ("Talk", "Break", ...), null for untyped ones.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub speakers: Vec<PersonRecord>,
    #[serde(default)]
    pub folders: Vec<FolderRecord>,
}

/// A material folder attached to a contribution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
}

/// One attachment inside a folder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_protected: bool,
    /// Absolute URL the attachment is served from. Also the only place the
    /// export exposes the ids needed to address the attachment for updates.
    #[serde(default)]
    pub download_url: String,
}

/// One registration form from the event API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    /// Stable identifier usable as an ACL principal.
    pub identifier: String,
    #[serde(default)]
    pub title: String,
}
