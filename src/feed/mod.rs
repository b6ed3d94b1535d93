// src/feed/mod.rs
//! Read side of the MLB stats feed: schedule listing and live game documents.
//! No business logic here; callers decide what a failure means.

pub mod fixture;
pub mod statsapi;
pub mod types;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

pub use crate::feed::types::{
    Base, GameContext, GameDecisions, GameDocument, GameSummary, GameType, Half, PlayEvent,
    PlayerId,
};

/// Any failure to obtain a usable document from the provider.
/// The scanner treats every variant the same way: skip the date or game.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("decoding {what} failed: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected feed shape: {0}")]
    Shape(String),
}

#[async_trait]
pub trait GameFeed: Send + Sync {
    /// Games scheduled on `date`, in feed order.
    async fn list_games(&self, date: NaiveDate) -> Result<Vec<GameSummary>, FeedError>;
    /// Context, ordered plays and pitching decisions for one game.
    async fn live_game(&self, game_id: u64) -> Result<GameDocument, FeedError>;
    fn name(&self) -> &'static str;
}
