// src/notify/mod.rs
//! Outbound moments: payload shape, delivery backends and the paced dispatcher.

pub mod admin;
pub mod dedup;
pub mod format;
pub mod teams;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{AdminConfig, DispatchMode};
use crate::feed::GameContext;
use crate::synth::ContentPayload;

pub use crate::notify::admin::{AdminPostNotifier, AdminUrlNotifier};
pub use crate::notify::dedup::DedupSet;
pub use crate::notify::format::{ordinal, progress, EventType, FINAL};
pub use crate::notify::teams::{resolve_team_code, UNKNOWN_TEAM};

/// One moment for the admin form. Field names follow the form's query keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub player: String,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub desc: String,
    pub intensity: String,
    #[serde(rename = "visitor")]
    pub visitor_code: String,
    #[serde(rename = "home")]
    pub home_code: String,
    #[serde(rename = "visitorScore")]
    pub visitor_score: u32,
    #[serde(rename = "homeScore")]
    pub home_score: u32,
    /// "Final" or "Top 7th" style
    pub progress: String,
}

impl NotificationPayload {
    pub fn build(
        player: &str,
        event_type: EventType,
        content: ContentPayload,
        ctx: &GameContext,
        progress: String,
    ) -> Self {
        Self {
            player: player.to_string(),
            title: content.title,
            event_type,
            desc: content.desc,
            intensity: content.intensity,
            visitor_code: resolve_team_code(&ctx.away_team).to_string(),
            home_code: resolve_team_code(&ctx.home_team).to_string(),
            visitor_score: ctx.away_score,
            home_score: ctx.home_score,
            progress,
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Dry-run sink: logs what would have been sent.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, p: &NotificationPayload) -> Result<()> {
        tracing::info!(
            player = %p.player,
            event_type = %p.event_type,
            title = %p.title,
            visitor = %p.visitor_code,
            home = %p.home_code,
            score = %format!("{}-{}", p.visitor_score, p.home_score),
            progress = %p.progress,
            "dry-run moment"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// --- Test helper ---
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NotificationPayload>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the attempt, then errors.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: true,
        }
    }

    pub fn payloads(&self) -> Vec<NotificationPayload> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        if let Ok(mut v) = self.sent.lock() {
            v.push(payload.clone());
        }
        if self.fail {
            anyhow::bail!("recording notifier set to fail");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn notifier_from_config(cfg: &AdminConfig, dry_run: bool) -> Arc<dyn Notifier> {
    if dry_run {
        return Arc::new(LogNotifier);
    }
    match cfg.mode {
        DispatchMode::Post => {
            Arc::new(AdminPostNotifier::new(cfg.base_url.clone()).with_timeout(cfg.timeout_secs))
        }
        DispatchMode::Url => Arc::new(AdminUrlNotifier::new(cfg.base_url.clone())),
    }
}

/// Best-effort delivery with a fixed pause after every attempt.
/// Errors are logged and counted, never returned.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    pause: Duration,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, pause: Duration) -> Self {
        Self { notifier, pause }
    }

    pub fn from_config(cfg: &AdminConfig, dry_run: bool) -> Self {
        Self::new(
            notifier_from_config(cfg, dry_run),
            Duration::from_secs(cfg.pause_secs),
        )
    }

    pub async fn dispatch(&self, payload: &NotificationPayload) -> bool {
        metrics::counter!("dispatch_total").increment(1);
        let ok = match self.notifier.send(payload).await {
            Ok(()) => {
                tracing::info!(
                    notifier = self.notifier.name(),
                    player = %payload.player,
                    event_type = %payload.event_type,
                    progress = %payload.progress,
                    "moment dispatched"
                );
                true
            }
            Err(e) => {
                metrics::counter!("dispatch_errors_total").increment(1);
                tracing::warn!(
                    notifier = self.notifier.name(),
                    player = %payload.player,
                    "dispatch failed: {e:#}"
                );
                false
            }
        };
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
        ok
    }
}
