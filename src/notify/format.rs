// src/notify/format.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feed::Half;

pub const FINAL: &str = "Final";

/// Admin-form moment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Homerun,
    Strikeout,
    Timely,
    Victory,
    BigPlay,
}

impl EventType {
    /// Substring heuristic over the feed's event name, first match wins.
    /// Note "Hit By Pitch" lands in TIMELY via "HIT".
    pub fn from_event_name(event: &str) -> Self {
        let up = event.to_uppercase();
        if up.contains("HOME RUN") {
            EventType::Homerun
        } else if up.contains("STRIKEOUT") {
            EventType::Strikeout
        } else if ["DOUBLE", "TRIPLE", "SINGLE", "HIT"]
            .iter()
            .any(|k| up.contains(k))
        {
            EventType::Timely
        } else if up.contains("GAME END") || up.contains("VICTORY") {
            EventType::Victory
        } else {
            EventType::BigPlay
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Homerun => "HOMERUN",
            EventType::Strikeout => "STRIKEOUT",
            EventType::Timely => "TIMELY",
            EventType::Victory => "VICTORY",
            EventType::BigPlay => "BIG_PLAY",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn ordinal(n: u32) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// "Top 7th" / "Bot 9th"; an unknown inning (0) gives an empty string.
pub fn progress(inning: u32, half: Half) -> String {
    if inning == 0 {
        return String::new();
    }
    let side = match half {
        Half::Bottom => "Bot",
        Half::Top => "Top",
    };
    format!("{side} {}", ordinal(inning))
}
