//! Announcement delivery.
//!
//! [`Notifier`] is the seam between dispatch logic and the wire: the
//! dispatcher decides *when* to announce, a notifier decides *how*. The
//! [`ChannelRouter`] holds the configured notifiers and the room-to-channel
//! mapping that picks one per session.

pub mod slack;

pub use slack::SlackWebhook;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CrierError, Result};
use crate::schedule::{Session, Talk};

/// A destination that can announce sessions and talks.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce the start of a session.
    async fn announce_session(&self, session: &Session) -> Result<()>;

    /// Announce a talk within a session.
    async fn announce_talk(&self, session: &Session, talk: &Talk) -> Result<()>;
}

/// Routes each room's announcements to the notifier configured for it.
#[derive(Default)]
pub struct ChannelRouter {
    channels: HashMap<String, Arc<dyn Notifier>>,
    channel_map: HashMap<String, String>,
}

impl ChannelRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notifier under a channel name.
    pub fn add_channel(&mut self, name: impl Into<String>, notifier: Arc<dyn Notifier>) {
        self.channels.insert(name.into(), notifier);
    }

    /// Map a room name to a channel name.
    pub fn map_room(&mut self, room: impl Into<String>, channel: impl Into<String>) {
        self.channel_map.insert(room.into(), channel.into());
    }

    /// Resolve the notifier responsible for `room`.
    ///
    /// # Errors
    ///
    /// Returns an error if the room has no channel mapping, or the mapped
    /// channel has no registered notifier.
    pub fn resolve(&self, room: &str) -> Result<&dyn Notifier> {
        let channel = self.channel_map.get(room).ok_or_else(|| {
            CrierError::Channel(format!(
                "configuration does not map room '{room}' to a channel"
            ))
        })?;
        self.channels
            .get(channel)
            .map(|notifier| notifier.as_ref())
            .ok_or_else(|| {
                CrierError::Channel(format!("no webhook configured for channel '{channel}'"))
            })
    }
}
