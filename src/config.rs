//! Configuration types for the announcer.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level configuration for the announcer.
#[derive(Debug, Clone, Deserialize)]
pub struct CrierConfig {
    /// Indico connection settings.
    pub indico: IndicoConfig,
    /// Slack delivery settings.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Announcement filtering settings.
    #[serde(default)]
    pub filters: FilterConfig,
}

/// Indico connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicoConfig {
    /// API token sent as a bearer credential.
    pub api_token: String,
    /// Numeric id of the event to announce.
    pub event_id: i64,
    /// Timezone the event runs in, e.g. `Europe/Zurich`.
    ///
    /// Drives both the export request and the announcement clock.
    pub event_timezone: String,
    /// Base URL of the Indico instance.
    #[serde(default = "default_instance_url")]
    pub instance_url: String,
}

/// Slack delivery configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Channel name to incoming-webhook URL.
    pub webhooks: HashMap<String, String>,
    /// Room name to channel name.
    pub channel_map: HashMap<String, String>,
}

/// Announcement filtering configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Contribution types that are never announced.
    pub talk_types: Vec<String>,
}

fn default_instance_url() -> String {
    indico_client::DEFAULT_INSTANCE_URL.to_owned()
}

impl CrierConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::CrierError::Config(e.to_string()))
    }
}
