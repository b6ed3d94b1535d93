// src/feed/types.rs
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// MLB person id (statsapi `person.id`).
pub type PlayerId = u64;

/// Coarse game classification. Only the postseason distinction drives decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Regular,
    Exhibition,
    Postseason,
}

impl GameType {
    /// `R` is regular season, `S`/`E` are spring training and exhibition.
    /// Every other code (`F`, `D`, `L`, `W`, ...) is a postseason round.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "R" | "" => GameType::Regular,
            "S" | "E" => GameType::Exhibition,
            _ => GameType::Postseason,
        }
    }

    pub fn is_postseason(self) -> bool {
        matches!(self, GameType::Postseason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// Anything that is not "bottom" is read as the top half.
    pub fn from_feed(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("bottom") {
            Half::Bottom
        } else {
            Half::Top
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    #[serde(rename = "1B")]
    First,
    #[serde(rename = "2B")]
    Second,
    #[serde(rename = "3B")]
    Third,
}

impl Base {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "1B" => Some(Base::First),
            "2B" => Some(Base::Second),
            "3B" => Some(Base::Third),
            _ => None,
        }
    }

    pub fn is_scoring_position(self) -> bool {
        matches!(self, Base::Second | Base::Third)
    }
}

/// One entry of the schedule listing for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: u64,
    pub game_type: GameType,
    /// Raw feed code, kept for the judgment prompt.
    pub game_type_code: String,
    pub away_team: String,
    pub home_team: String,
    pub is_final: bool,
}

/// Game-level state rebuilt on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameContext {
    pub game_id: u64,
    pub game_type: GameType,
    pub game_type_code: String,
    pub away_team: String,
    pub home_team: String,
    pub away_score: u32,
    pub home_score: u32,
    pub score_diff: u32,
    pub is_final: bool,
}

impl GameContext {
    /// Fill gaps from the schedule entry. The schedule is authoritative for
    /// team names and game type; Final from either side counts.
    pub fn absorb_summary(&mut self, summary: &GameSummary) {
        if !summary.away_team.is_empty() {
            self.away_team = summary.away_team.clone();
        }
        if !summary.home_team.is_empty() {
            self.home_team = summary.home_team.clone();
        }
        if !summary.game_type_code.is_empty() {
            self.game_type = summary.game_type;
            self.game_type_code = summary.game_type_code.clone();
        }
        self.is_final |= summary.is_final;
    }

    /// "away-home", e.g. "5-4".
    pub fn score_line(&self) -> String {
        format!("{}-{}", self.away_score, self.home_score)
    }
}

/// A single plate appearance from `liveData.plays.allPlays`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// `about.atBatIndex`, or the position in the play list when absent.
    pub index: u32,
    pub inning: u32,
    pub half: Half,
    pub event_name: String,
    pub description: String,
    pub batter_id: Option<PlayerId>,
    pub pitcher_id: Option<PlayerId>,
    pub runner_origins: BTreeSet<Base>,
    /// False while the at-bat is still being played.
    #[serde(default = "complete_by_default")]
    pub is_complete: bool,
}

fn complete_by_default() -> bool {
    true
}

impl PlayEvent {
    pub fn has_runner_in_scoring_position(&self) -> bool {
        self.runner_origins.iter().any(|b| b.is_scoring_position())
    }
}

/// Pitching decisions recorded for the game (`liveData.decisions`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDecisions {
    pub winner: Option<PlayerId>,
    pub save: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDocument {
    pub context: GameContext,
    pub plays: Vec<PlayEvent>,
    pub decisions: GameDecisions,
}
