//! Async client for one Indico event.
//!
//! Covers three server surfaces: the read-only "export" API for timetable
//! data, the "api" API for registration forms, and the undocumented
//! "manage" API used to update attachment permissions. See
//! <https://docs.getindico.io/en/stable/http-api/> for the documented parts.

use crate::error::{IndicoError, Result};
use crate::types::{AttachmentRecord, RegistrationForm, SessionRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Default Indico instance.
pub const DEFAULT_INSTANCE_URL: &str = "https://indico.global";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Interface to a single Indico event via the HTTP APIs.
///
/// The API token needs the "Classic API" read scope for the export
/// endpoints; attachment updates additionally need management rights on
/// the event.
pub struct Event {
    event_id: i64,
    api_token: String,
    instance_url: String,
    timezone: Option<String>,
    client: reqwest::Client,
}

impl Event {
    /// Create a client for one event on the default Indico instance.
    ///
    /// # Errors
    ///
    /// Returns [`IndicoError::Http`] if the HTTP client cannot be built.
    pub fn new(event_id: i64, api_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IndicoError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            event_id,
            api_token: api_token.into(),
            instance_url: DEFAULT_INSTANCE_URL.to_owned(),
            timezone: None,
            client,
        })
    }

    /// Point the client at a different Indico instance.
    pub fn with_instance_url(mut self, url: impl Into<String>) -> Self {
        self.instance_url = url.into();
        self
    }

    /// Ask the server to render all timestamps in this timezone.
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }

    fn base_url(&self) -> &str {
        self.instance_url.trim_end_matches('/')
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_token)
    }

    async fn into_checked(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndicoError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Fetch the event's sessions with nested contributions, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`IndicoError::Api`] on a non-success status and
    /// [`IndicoError::Decode`] when the payload has no results entry.
    pub async fn get_sessions(&self) -> Result<Vec<SessionRecord>> {
        let url = format!("{}/export/event/{}.json", self.base_url(), self.event_id);
        let mut params = vec![
            ("detail", "sessions"),
            // Include the occurrence list and always bypass the server
            // cache.
            ("occ", "yes"),
            ("nocache", "yes"),
        ];
        if let Some(tz) = &self.timezone {
            params.push(("tz", tz.as_str()));
        }

        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| IndicoError::Http(e.to_string()))?;
        let response = Self::into_checked(response).await?;

        let envelope: ExportEnvelope = response
            .json()
            .await
            .map_err(|e| IndicoError::Decode(format!("invalid export payload: {e}")))?;
        let result = envelope
            .results
            .into_iter()
            .next()
            .ok_or_else(|| IndicoError::Decode("export returned no results".to_owned()))?;
        Ok(result.sessions)
    }

    /// List the registration forms attached to the event.
    pub async fn get_registration_forms(&self) -> Result<Vec<RegistrationForm>> {
        let url = format!(
            "{}/event/{}/api/registration-forms",
            self.base_url(),
            self.event_id
        );

        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| IndicoError::Http(e.to_string()))?;
        let response = Self::into_checked(response).await?;

        response
            .json()
            .await
            .map_err(|e| IndicoError::Decode(format!("invalid registration-forms payload: {e}")))
    }

    /// Update the properties of one attachment through the manage API.
    ///
    /// `changes` are form fields layered over the mandatory `folder=__None`
    /// default. The manage endpoint is internal and carries no stability
    /// guarantee; the path to it is recovered from the attachment's own
    /// download URL.
    ///
    /// # Errors
    ///
    /// Returns [`IndicoError::Attachment`] when the download URL cannot be
    /// mapped to a manage path, [`IndicoError::Api`] on a non-success
    /// status.
    pub async fn update_attachment(
        &self,
        attachment: &AttachmentRecord,
        changes: &[(&str, String)],
    ) -> Result<()> {
        let manage_path = manage_path_from_download_url(&attachment.download_url)?;
        let url = format!(
            "{}/event/{}/manage/{}",
            self.base_url(),
            self.event_id,
            manage_path
        );

        let mut form: HashMap<&str, String> = HashMap::new();
        form.insert("folder", "__None".to_owned());
        for (key, value) in changes {
            form.insert(key, value.clone());
        }

        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .form(&form)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| IndicoError::Http(e.to_string()))?;
        Self::into_checked(response).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ExportEnvelope {
    #[serde(default)]
    results: Vec<ExportResult>,
}

#[derive(Debug, Deserialize)]
struct ExportResult {
    #[serde(default)]
    sessions: Vec<SessionRecord>,
}

/// Recover the manage-API path for an attachment from its download URL.
///
/// Download URLs end with
/// `.../contributions/<id>/attachments/<folder>/<id>/<filename>`; the manage
/// path is everything from the `contributions` segment up to but excluding
/// the filename.
pub fn manage_path_from_download_url(download_url: &str) -> Result<String> {
    let mut segments: Vec<&str> = download_url.split('/').collect();
    segments.pop(); // filename
    let start = segments
        .iter()
        .position(|s| *s == "contributions")
        .ok_or_else(|| {
            IndicoError::Attachment(format!(
                "download URL '{download_url}' has no contributions segment"
            ))
        })?;
    Ok(segments[start..].join("/"))
}
