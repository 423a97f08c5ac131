//! Slack incoming-webhook notifier.
//!
//! Messages are sent as Block Kit payloads: sessions get a header block
//! plus a section with convener and timetable details, talks get a section
//! with the scheduled time range, linked title and speakers, followed by a
//! divider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::json;

use crate::config::SlackConfig;
use crate::error::{CrierError, Result};
use crate::notify::{ChannelRouter, Notifier};
use crate::schedule::{Person, Session, Talk};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One Slack channel reachable through a pre-configured webhook URL.
pub struct SlackWebhook {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackWebhook {
    /// Create a notifier posting to `webhook_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CrierError::Delivery(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }

    async fn post(&self, payload: &serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| CrierError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrierError::Delivery(format!(
                "webhook send failed ({status}): {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn announce_session(&self, session: &Session) -> Result<()> {
        self.post(&session_payload(session)).await
    }

    async fn announce_talk(&self, session: &Session, talk: &Talk) -> Result<()> {
        self.post(&talk_payload(session, talk)).await
    }
}

/// Build a router from the `[slack]` configuration tables.
///
/// # Errors
///
/// Returns an error if any webhook notifier cannot be constructed.
pub fn router_from_config(config: &SlackConfig) -> Result<ChannelRouter> {
    let mut router = ChannelRouter::new();
    for (name, url) in &config.webhooks {
        router.add_channel(name.clone(), Arc::new(SlackWebhook::new(url.clone())?));
    }
    for (room, channel) in &config.channel_map {
        router.map_room(room.clone(), channel.clone());
    }
    Ok(router)
}

/// 12-hour time without a leading zero, e.g. `1:00`.
fn fmt_time(dt: &DateTime<Tz>) -> String {
    let hour = dt.format("%I").to_string();
    format!("{}{}", hour.trim_start_matches('0'), dt.format(":%M"))
}

/// 12-hour time with meridiem, e.g. `1:00 PM`.
fn fmt_time_ampm(dt: &DateTime<Tz>) -> String {
    let hour = dt.format("%I").to_string();
    format!("{}{}", hour.trim_start_matches('0'), dt.format(":%M %p"))
}

fn name_list(people: &[Person]) -> String {
    people
        .iter()
        .map(Person::full_name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural_s(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

fn session_payload(session: &Session) -> serde_json::Value {
    let conveners = if session.conveners.is_empty() {
        "N/A".to_owned()
    } else {
        name_list(&session.conveners)
    };

    // The session page has one tab per day; the date fragment opens the
    // right one.
    let timetable_url = format!("{}#{}", session.url, session.start.format("%Y%m%d"));

    let text = format!(
        "*Convener{}:* {}\n<{}|Click here to view the session timetable>",
        plural_s(session.conveners.len()),
        conveners,
        timetable_url,
    );

    json!({
        "blocks": [
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("Starting session \"{}\" in {}", session.title, session.room),
                    "emoji": true,
                },
            },
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": text,
                },
            },
        ],
    })
}

fn talk_payload(session: &Session, talk: &Talk) -> serde_json::Value {
    let text = format!(
        "_Talk scheduled from {}\u{2013}{} in {}_\n*Title:* <{}|{}>\n*Speaker{}:* {}",
        fmt_time(&talk.start),
        fmt_time_ampm(&talk.end),
        session.room,
        talk.url,
        talk.title,
        plural_s(talk.speakers.len()),
        name_list(&talk.speakers),
    );

    json!({
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": text,
                },
            },
            {
                "type": "divider",
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Zurich;

    fn at(hour: u32, minute: u32) -> DateTime<Tz> {
        Zurich
            .with_ymd_and_hms(2026, 6, 1, hour, minute, 0)
            .unwrap()
    }

    fn person(first: &str, last: &str) -> Person {
        Person {
            title: None,
            first_name: first.to_owned(),
            last_name: last.to_owned(),
        }
    }

    fn sample_session() -> Session {
        Session {
            id: 5,
            title: "Opening Plenary".to_owned(),
            room: "Main Hall".to_owned(),
            url: "https://indico.example.org/event/1/sessions/5/".to_owned(),
            start: at(9, 0),
            end: at(12, 0),
            conveners: vec![],
            talks: vec![],
        }
    }

    fn sample_talk() -> Talk {
        Talk {
            id: 11,
            title: "Welcome".to_owned(),
            url: "https://indico.example.org/event/1/contributions/11/".to_owned(),
            start: at(12, 30),
            end: at(13, 0),
            kind: Some("Talk".to_owned()),
            speakers: vec![person("Maria", "Varga")],
        }
    }

    #[test]
    fn times_drop_the_leading_zero() {
        assert_eq!(fmt_time(&at(9, 5)), "9:05");
        assert_eq!(fmt_time(&at(13, 0)), "1:00");
        assert_eq!(fmt_time_ampm(&at(9, 5)), "9:05 AM");
        assert_eq!(fmt_time_ampm(&at(13, 0)), "1:00 PM");
    }

    #[test]
    fn noon_and_midnight_keep_twelve() {
        assert_eq!(fmt_time(&at(12, 30)), "12:30");
        assert_eq!(fmt_time_ampm(&at(12, 30)), "12:30 PM");
        assert_eq!(fmt_time_ampm(&at(0, 30)), "12:30 AM");
    }

    #[test]
    fn session_header_names_title_and_room() {
        let payload = session_payload(&sample_session());
        assert_eq!(payload["blocks"][0]["type"], "header");
        assert_eq!(
            payload["blocks"][0]["text"]["text"],
            "Starting session \"Opening Plenary\" in Main Hall"
        );
    }

    #[test]
    fn session_without_conveners_shows_not_available() {
        let payload = session_payload(&sample_session());
        let text = payload["blocks"][1]["text"]["text"].as_str().unwrap();
        assert!(text.starts_with("*Convener:* N/A\n"), "{text}");
        assert!(
            text.contains("<https://indico.example.org/event/1/sessions/5/#20260601|"),
            "{text}"
        );
    }

    #[test]
    fn multiple_conveners_pluralize() {
        let mut session = sample_session();
        session.conveners = vec![person("Maria", "Varga"), person("Jon", "Doe")];

        let payload = session_payload(&session);
        let text = payload["blocks"][1]["text"]["text"].as_str().unwrap();
        assert!(text.starts_with("*Conveners:* Maria Varga, Jon Doe\n"), "{text}");
    }

    #[test]
    fn talk_section_lists_time_range_title_and_speaker() {
        let payload = talk_payload(&sample_session(), &sample_talk());
        let text = payload["blocks"][0]["text"]["text"].as_str().unwrap();
        assert_eq!(
            text,
            "_Talk scheduled from 12:30\u{2013}1:00 PM in Main Hall_\n\
             *Title:* <https://indico.example.org/event/1/contributions/11/|Welcome>\n\
             *Speaker:* Maria Varga"
        );
        assert_eq!(payload["blocks"][1]["type"], "divider");
    }

    #[test]
    fn talk_without_speakers_leaves_the_list_empty() {
        let mut talk = sample_talk();
        talk.speakers.clear();

        let payload = talk_payload(&sample_session(), &talk);
        let text = payload["blocks"][0]["text"]["text"].as_str().unwrap();
        assert!(text.ends_with("*Speaker:* "), "{text}");
    }
}
