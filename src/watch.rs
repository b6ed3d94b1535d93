// src/watch.rs
//! Watch registry: the fixed set of players we generate cards for.
//! Loaded once at start; read-only afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::feed::PlayerId;

pub const ENV_WATCH_LIST_PATH: &str = "WATCH_LIST_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedPlayer {
    pub id: PlayerId,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub team_code: String,
}

impl WatchedPlayer {
    pub fn new(id: PlayerId, display_name: &str, team_code: &str) -> Self {
        Self {
            id,
            display_name: display_name.to_string(),
            team_code: team_code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WatchRegistry {
    players: HashMap<PlayerId, WatchedPlayer>,
}

impl WatchRegistry {
    /// Later entries with a duplicate id replace earlier ones.
    pub fn new(players: impl IntoIterator<Item = WatchedPlayer>) -> Self {
        let mut map = HashMap::new();
        for p in players {
            if let Some(prev) = map.insert(p.id, p) {
                tracing::warn!(id = prev.id, name = %prev.display_name, "duplicate watch-list id");
            }
        }
        Self { players: map }
    }

    /// 2025-26 roster of Japanese players in MLB.
    pub fn builtin() -> Self {
        Self::new([
            WatchedPlayer::new(808963, "佐々木朗希", "LAD"),
            WatchedPlayer::new(608372, "菅野智之", "BAL"),
            WatchedPlayer::new(672960, "岡本和真", "TOR"),
            WatchedPlayer::new(808959, "村上宗隆", "CWS"),
            WatchedPlayer::new(829272, "小笠原慎之介", "WSH"),
            WatchedPlayer::new(660271, "大谷翔平", "LAD"),
            WatchedPlayer::new(808967, "山本由伸", "LAD"),
            WatchedPlayer::new(506433, "ダルビッシュ有", "SD"),
            WatchedPlayer::new(673548, "鈴木誠也", "CHC"),
            WatchedPlayer::new(684007, "今永昇太", "CHC"),
            WatchedPlayer::new(807799, "吉田正尚", "BOS"),
            WatchedPlayer::new(673540, "千賀滉大", "NYM"),
            WatchedPlayer::new(579328, "菊池雄星", "LAA"),
            WatchedPlayer::new(673451, "松井裕樹", "SD"),
            WatchedPlayer::new(628317, "前田健太", "DET"),
            WatchedPlayer::new(663457, "ラーズ・ヌートバー", "STL"),
        ])
    }

    pub fn get(&self, id: PlayerId) -> Option<&WatchedPlayer> {
        self.players.get(&id)
    }

    /// `None` ids (missing in the feed) never match.
    pub fn lookup(&self, id: Option<PlayerId>) -> Option<&WatchedPlayer> {
        id.and_then(|id| self.players.get(&id))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Load from a TOML (`[[players]]`) or JSON (array) file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading watch list from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let players = parse_players(&content, &ext)
            .with_context(|| format!("parsing watch list {}", path.display()))?;
        Ok(Self::new(players))
    }

    /// Resolution order:
    /// 1) explicit path (config)
    /// 2) $WATCH_LIST_PATH
    /// 3) built-in roster
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load_from(p);
        }
        if let Ok(p) = std::env::var(ENV_WATCH_LIST_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_WATCH_LIST_PATH} points to non-existent path"));
            }
            return Self::load_from(&pb);
        }
        Ok(Self::builtin())
    }
}

fn parse_players(s: &str, hint_ext: &str) -> Result<Vec<WatchedPlayer>> {
    #[derive(Deserialize)]
    struct TomlList {
        players: Vec<WatchedPlayer>,
    }

    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    match toml::from_str::<TomlList>(s) {
        Ok(v) => Ok(v.players),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported watch list format: {toml_err}")),
    }
}
