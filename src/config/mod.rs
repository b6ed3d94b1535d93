// src/config/mod.rs
//! Process configuration. Built once in `main` and handed to each component;
//! nothing below reads the environment on its own except credential resolution.

pub mod ai;
pub mod date;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use crate::config::ai::AiConfig;
pub use crate::config::date::TargetDate;

pub const DEFAULT_CONFIG_PATH: &str = "config/highlight.toml";
pub const ENV_CONFIG_PATH: &str = "HIGHLIGHT_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub synth: SynthConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// "today" (US/Eastern) or YYYY-MM-DD.
    #[serde(default = "default_date")]
    pub date: String,
    /// 0 = one pass and exit.
    #[serde(default)]
    pub interval_secs: u64,
    #[serde(default = "default_pass_deadline")]
    pub pass_deadline_secs: u64,
    /// Skip repeats of (game, player, event type) within a process.
    #[serde(default)]
    pub dedup_per_category: bool,
    /// Persist per-game play cursors here; unset = no cross-run dedup.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
    #[serde(default)]
    pub watch_list_path: Option<PathBuf>,
}

fn default_date() -> String {
    "today".to_string()
}
fn default_pass_deadline() -> u64 {
    900
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            date: default_date(),
            interval_secs: 0,
            pass_deadline_secs: default_pass_deadline(),
            dedup_per_category: false,
            state_path: None,
            watch_list_path: None,
        }
    }
}

impl ScanConfig {
    pub fn target_date(&self) -> Result<TargetDate> {
        self.date.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_base")]
    pub base_url: String,
    #[serde(default = "default_sport_id")]
    pub sport_id: u32,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_feed_base() -> String {
    crate::feed::statsapi::DEFAULT_BASE_URL.to_string()
}
fn default_sport_id() -> u32 {
    1
}
fn default_http_timeout() -> u64 {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base(),
            sport_id: default_sport_id(),
            timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Total generation attempts, initial call included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_pause_ms")]
    pub retry_pause_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_retry_pause_ms() -> u64 {
    1_000
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_pause_ms: default_retry_pause_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// JSON POST to the ingestion endpoint.
    #[default]
    Post,
    /// Print the prefilled admin form URL.
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_url")]
    pub base_url: String,
    #[serde(default)]
    pub mode: DispatchMode,
    #[serde(default = "default_dispatch_pause")]
    pub pause_secs: u64,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_admin_url() -> String {
    "http://localhost:3000/admin/moments".to_string()
}
fn default_dispatch_pause() -> u64 {
    3
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: default_admin_url(),
            mode: DispatchMode::default(),
            pause_secs: default_dispatch_pause(),
            timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// e.g. "0.0.0.0:9000"; unset = no exporter.
    #[serde(default)]
    pub listen: Option<String>,
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.scan.target_date()?;
        Ok(cfg)
    }

    /// Resolution order:
    /// 1) explicit path (CLI), must exist
    /// 2) $HIGHLIGHT_CONFIG_PATH, must exist
    /// 3) config/highlight.toml if present, else built-in defaults
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            return Self::load(Path::new(&p));
        }
        let default = Path::new(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load(default);
        }
        Ok(Self::default())
    }
}
