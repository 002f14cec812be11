//! Umami analytics sink.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_sink::{ClickSink, TrackingError};

/// Event name reported to Umami for every followed link.
pub const EVENT_NAME: &str = "link_click";

/// Fallback User-Agent when the visitor sent none. Umami drops events
/// without one.
const DEFAULT_USER_AGENT: &str = concat!("linkhop/", env!("CARGO_PKG_VERSION"));

/// Connection settings for an Umami instance.
#[derive(Debug, Clone)]
pub struct UmamiConfig {
    /// Base URL, e.g. `https://analytics.example.com`.
    pub api_url: String,
    pub website_id: String,
    pub api_key: Option<String>,
    /// Hostname reported as the page host of each event.
    pub hostname: String,
}

/// Sends click events to `POST {api_url}/api/send`.
pub struct UmamiSink {
    client: Client,
    endpoint: String,
    config: UmamiConfig,
}

impl UmamiSink {
    /// Builds the sink with its own HTTP client.
    ///
    /// `timeout` bounds each request; the click worker applies its own
    /// timeout on top.
    pub fn new(config: UmamiConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/api/send", config.api_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// JSON body for one click.
    pub fn payload(&self, event: &ClickEvent) -> Value {
        json!({
            "type": "event",
            "payload": {
                "website": self.config.website_id,
                "hostname": self.config.hostname,
                "url": format!("/go/{}", event.slug),
                "referrer": event.referrer.as_deref().unwrap_or_default(),
                "language": event.language.as_deref().unwrap_or_default(),
                "name": EVENT_NAME,
                "data": {
                    "link_id": event.link_id,
                    "link_slug": event.slug,
                    "target_url": event.resolved_target,
                    "visitor": event.visitor_fingerprint,
                },
            },
        })
    }
}

#[async_trait]
impl ClickSink for UmamiSink {
    async fn send(&self, event: ClickEvent) -> Result<(), TrackingError> {
        let body = self.payload(&event);
        let user_agent = event.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, user_agent)
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-umami-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TrackingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackingError::Rejected(status.as_u16()));
        }

        debug!(link_id = event.link_id, status = status.as_u16(), "Umami accepted click");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "umami"
    }
}
