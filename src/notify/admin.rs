use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};

use super::{NotificationPayload, Notifier};

/// POSTs the payload as JSON to the admin moments endpoint.
pub struct AdminPostNotifier {
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl AdminPostNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait::async_trait]
impl Notifier for AdminPostNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .context("admin post")?
            .error_for_status()
            .context("admin non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "admin-post"
    }
}

/// Prints a prefilled admin-form URL instead of posting; an operator opens it.
pub struct AdminUrlNotifier {
    base_url: String,
}

impl AdminUrlNotifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn prefill_url(&self, payload: &NotificationPayload) -> Result<Url> {
        let visitor_score = payload.visitor_score.to_string();
        let home_score = payload.home_score.to_string();
        let params = [
            ("player", payload.player.as_str()),
            ("title", payload.title.as_str()),
            ("type", payload.event_type.as_str()),
            ("desc", payload.desc.as_str()),
            ("intensity", payload.intensity.as_str()),
            ("visitor", payload.visitor_code.as_str()),
            ("home", payload.home_code.as_str()),
            ("visitorScore", visitor_score.as_str()),
            ("homeScore", home_score.as_str()),
            ("progress", payload.progress.as_str()),
        ];
        Url::parse_with_params(&self.base_url, &params)
            .with_context(|| format!("invalid admin base url: {}", self.base_url))
    }
}

#[async_trait::async_trait]
impl Notifier for AdminUrlNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        let url = self.prefill_url(payload)?;
        println!("{url}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "admin-url"
    }
}
