//! # indico-client
//!
//! Thin async client for the Indico event-management HTTP APIs, scoped to a
//! single event: timetable export (sessions with nested contributions),
//! registration-form listing, and attachment permission updates.
//!
//! The crate deliberately stays at the wire level. Responses come back as
//! loosely-typed records ([`types`]) with Indico's own field conventions;
//! consumers build their domain model on top and decide which fields are
//! required.

pub mod error;
pub mod event;
pub mod types;

pub use error::{IndicoError, Result};
pub use event::{DEFAULT_INSTANCE_URL, Event};
pub use types::{
    AttachmentRecord, ContributionRecord, FolderRecord, PersonRecord, RegistrationForm,
    SessionRecord, Stamp,
};
