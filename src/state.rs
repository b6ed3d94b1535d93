//! Per-game progress cursor persisted as pretty JSON between runs.
//! Missing or unreadable state is treated as "nothing processed yet".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCursor {
    #[serde(default)]
    pub last_play_index: Option<u32>,
    #[serde(default)]
    pub final_done: bool,
}

#[derive(Debug)]
pub struct CursorStore {
    path: PathBuf,
    games: BTreeMap<u64, GameCursor>,
}

impl CursorStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            games: BTreeMap::new(),
        }
    }

    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let games = match fs::read_to_string(&path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "cursor state unreadable, starting fresh: {e}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, games }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cursor(&self, game_id: u64) -> GameCursor {
        self.games.get(&game_id).copied().unwrap_or_default()
    }

    /// False for plays at or below the stored index.
    pub fn is_new(&self, game_id: u64, play_index: u32) -> bool {
        match self.cursor(game_id).last_play_index {
            Some(last) => play_index > last,
            None => true,
        }
    }

    pub fn advance(&mut self, game_id: u64, play_index: u32) {
        let c = self.games.entry(game_id).or_default();
        if c.last_play_index.map_or(true, |last| play_index > last) {
            c.last_play_index = Some(play_index);
        }
    }

    pub fn final_done(&self, game_id: u64) -> bool {
        self.cursor(game_id).final_done
    }

    pub fn mark_final(&mut self, game_id: u64) {
        self.games.entry(game_id).or_default().final_done = true;
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("state dir {}", dir.display()))?;
        }
        let body = serde_json::to_vec_pretty(&self.games)?;
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("write state {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cursors.json");

        let mut s = CursorStore::load(&path).await;
        assert!(s.is_new(776, 0));
        s.advance(776, 41);
        s.advance(776, 12); // never moves backwards
        s.mark_final(776);
        s.save().await.unwrap();

        let s = CursorStore::load(&path).await;
        assert_eq!(
            s.cursor(776),
            GameCursor {
                last_play_index: Some(41),
                final_done: true
            }
        );
        assert!(!s.is_new(776, 41));
        assert!(s.is_new(776, 42));
        assert!(s.is_new(777, 0));
    }

    #[tokio::test]
    async fn corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cursors.json");
        std::fs::write(&path, "{ nope").unwrap();
        let s = CursorStore::load(&path).await;
        assert!(!s.final_done(1));
        assert!(s.is_new(1, 0));
    }
}
