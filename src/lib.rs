//! Crier: time-driven conference announcements from Indico to Slack.
//!
//! The crate fetches an event's session timetable from an Indico instance,
//! lets an operator pick one room to monitor, and then announces each
//! session and talk in that room to the configured Slack channel as its
//! scheduled start time arrives.
//!
//! # Architecture
//!
//! The moving parts are deliberately separate:
//! - **Schedule**: Typed, validated, sorted view of the Indico export
//! - **Clock**: Current time in the event timezone, real or simulated
//! - **Notifier**: Delivery seam; Slack webhooks are the one implementation
//! - **Dispatcher**: Walks the schedule and announces at the right moments
//!
//! Material protection (restricting attachment downloads to registrants)
//! lives in [`protect`] and shares the same Indico client.

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod protect;
pub mod rooms;
pub mod schedule;

pub use clock::{ClockOrigin, EventClock};
pub use config::CrierConfig;
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::{CrierError, Result};
pub use notify::{ChannelRouter, Notifier};
pub use schedule::{Schedule, Session, Talk};
