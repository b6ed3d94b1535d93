// src/feed/fixture.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::feed::statsapi::{parse_live_game, parse_schedule};
use crate::feed::types::{GameDocument, GameSummary};
use crate::feed::{FeedError, GameFeed};

/// Feed backed by captured statsapi JSON. Same parsing as the HTTP client,
/// no network. The schedule body is returned for any date.
pub struct FixtureFeed {
    schedule: String,
    games: HashMap<u64, String>,
}

impl FixtureFeed {
    pub fn from_fixture(schedule_json: &str) -> Self {
        Self {
            schedule: schedule_json.to_string(),
            games: HashMap::new(),
        }
    }

    pub fn with_game(mut self, game_id: u64, live_json: &str) -> Self {
        self.games.insert(game_id, live_json.to_string());
        self
    }
}

#[async_trait]
impl GameFeed for FixtureFeed {
    async fn list_games(&self, _date: NaiveDate) -> Result<Vec<GameSummary>, FeedError> {
        parse_schedule(&self.schedule)
    }

    async fn live_game(&self, game_id: u64) -> Result<GameDocument, FeedError> {
        let body = self
            .games
            .get(&game_id)
            .ok_or_else(|| FeedError::Shape(format!("no fixture for game {game_id}")))?;
        parse_live_game(game_id, body)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
