// src/feed/statsapi.rs
use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use metrics::histogram;
use serde::Deserialize;

use crate::feed::types::{
    Base, GameContext, GameDecisions, GameDocument, GameSummary, GameType, Half, PlayEvent,
};
use crate::feed::{FeedError, GameFeed};

pub const DEFAULT_BASE_URL: &str = "https://statsapi.mlb.com";

// ---------------------------------------------------------------------
// Raw wire shapes. Everything optional; defaults are applied on mapping.
// ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScheduleResp {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleGame {
    game_pk: Option<u64>,
    game_type: Option<String>,
    status: Option<Status>,
    teams: Option<ScheduleTeams>,
}

#[derive(Debug, Deserialize)]
struct ScheduleTeams {
    away: Option<ScheduleSide>,
    home: Option<ScheduleSide>,
}

#[derive(Debug, Deserialize)]
struct ScheduleSide {
    team: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Status {
    abstract_game_state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveResp {
    game_data: Option<GameData>,
    live_data: Option<LiveData>,
}

#[derive(Debug, Deserialize)]
struct GameData {
    game: Option<GameInfo>,
    status: Option<Status>,
    teams: Option<GameDataTeams>,
}

#[derive(Debug, Deserialize)]
struct GameInfo {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GameDataTeams {
    away: Option<Named>,
    home: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct LiveData {
    plays: Option<Plays>,
    linescore: Option<Linescore>,
    decisions: Option<Decisions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Plays {
    #[serde(default)]
    all_plays: Vec<RawPlay>,
}

#[derive(Debug, Deserialize)]
struct RawPlay {
    result: Option<PlayResult>,
    about: Option<About>,
    matchup: Option<Matchup>,
    #[serde(default)]
    runners: Vec<Runner>,
}

#[derive(Debug, Deserialize)]
struct PlayResult {
    event: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct About {
    at_bat_index: Option<u32>,
    half_inning: Option<String>,
    inning: Option<u32>,
    is_complete: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Matchup {
    batter: Option<PersonRef>,
    pitcher: Option<PersonRef>,
}

#[derive(Debug, Deserialize)]
struct PersonRef {
    id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Runner {
    movement: Option<Movement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movement {
    origin_base: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Linescore {
    inning_state: Option<String>,
    teams: Option<LinescoreTeams>,
}

#[derive(Debug, Deserialize)]
struct LinescoreTeams {
    home: Option<LinescoreSide>,
    away: Option<LinescoreSide>,
}

#[derive(Debug, Deserialize)]
struct LinescoreSide {
    runs: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Decisions {
    winner: Option<PersonRef>,
    save: Option<PersonRef>,
}

fn is_final_state(status: Option<&Status>) -> bool {
    status
        .and_then(|s| s.abstract_game_state.as_deref())
        .is_some_and(|s| s == "Final")
}

// ---------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------

/// Parse a `/api/v1/schedule` body. Only the first date block is read; an
/// empty `dates` array is an empty slate, not an error.
pub fn parse_schedule(body: &str) -> Result<Vec<GameSummary>, FeedError> {
    let resp: ScheduleResp = serde_json::from_str(body).map_err(|source| FeedError::Decode {
        what: "schedule".into(),
        source,
    })?;

    let Some(first) = resp.dates.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(first.games.len());
    for g in first.games {
        let game_id = g
            .game_pk
            .ok_or_else(|| FeedError::Shape("schedule game without gamePk".into()))?;
        let code = g.game_type.unwrap_or_else(|| "R".to_string());
        let (away_team, home_team) = match g.teams {
            Some(t) => (side_name(t.away), side_name(t.home)),
            None => (String::new(), String::new()),
        };
        out.push(GameSummary {
            game_id,
            game_type: GameType::from_code(&code),
            game_type_code: code,
            away_team,
            home_team,
            is_final: is_final_state(g.status.as_ref()),
        });
    }
    Ok(out)
}

fn side_name(side: Option<ScheduleSide>) -> String {
    side.and_then(|s| s.team)
        .and_then(|t| t.name)
        .unwrap_or_default()
}

/// Parse a `/api/v1.1/game/{pk}/feed/live` body. A document without
/// `liveData` is rejected; everything below it defaults.
pub fn parse_live_game(game_id: u64, body: &str) -> Result<GameDocument, FeedError> {
    let resp: LiveResp = serde_json::from_str(body).map_err(|source| FeedError::Decode {
        what: format!("live feed for game {game_id}"),
        source,
    })?;
    let live = resp
        .live_data
        .ok_or_else(|| FeedError::Shape(format!("game {game_id}: missing liveData")))?;

    let (code, gd_final, away_team, home_team) = match resp.game_data {
        Some(gd) => {
            let code = gd.game.and_then(|g| g.kind).unwrap_or_default();
            let fin = is_final_state(gd.status.as_ref());
            let (a, h) = match gd.teams {
                Some(t) => (
                    t.away.and_then(|n| n.name).unwrap_or_default(),
                    t.home.and_then(|n| n.name).unwrap_or_default(),
                ),
                None => (String::new(), String::new()),
            };
            (code, fin, a, h)
        }
        None => (String::new(), false, String::new(), String::new()),
    };

    let (inning_state, home_score, away_score) = match live.linescore {
        Some(ls) => {
            let (h, a) = match ls.teams {
                Some(t) => (
                    t.home.and_then(|s| s.runs).unwrap_or(0),
                    t.away.and_then(|s| s.runs).unwrap_or(0),
                ),
                None => (0, 0),
            };
            (ls.inning_state.unwrap_or_default(), h, a)
        }
        None => (String::new(), 0, 0),
    };

    let context = GameContext {
        game_id,
        game_type: GameType::from_code(&code),
        game_type_code: code,
        away_team,
        home_team,
        away_score,
        home_score,
        score_diff: home_score.abs_diff(away_score),
        is_final: gd_final || inning_state.contains("Final"),
    };

    let raw_plays = live.plays.map(|p| p.all_plays).unwrap_or_default();
    let plays = raw_plays
        .into_iter()
        .enumerate()
        .map(|(pos, p)| map_play(pos, p))
        .collect();

    let decisions = live
        .decisions
        .map(|d| GameDecisions {
            winner: d.winner.and_then(|p| p.id),
            save: d.save.and_then(|p| p.id),
        })
        .unwrap_or_default();

    Ok(GameDocument {
        context,
        plays,
        decisions,
    })
}

fn map_play(pos: usize, p: RawPlay) -> PlayEvent {
    let (event_name, description) = match p.result {
        Some(r) => (
            r.event.unwrap_or_default(),
            r.description.unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };
    // The at-bat in progress is listed with `isComplete: false`; older
    // documents omit the flag, so absent means complete.
    let (index, inning, half, is_complete) = match p.about {
        Some(a) => (
            a.at_bat_index.unwrap_or(pos as u32),
            a.inning.unwrap_or(0),
            Half::from_feed(a.half_inning.as_deref().unwrap_or("top")),
            a.is_complete.unwrap_or(true),
        ),
        None => (pos as u32, 0, Half::Top, true),
    };
    let (batter_id, pitcher_id) = match p.matchup {
        Some(m) => (
            m.batter.and_then(|b| b.id),
            m.pitcher.and_then(|b| b.id),
        ),
        None => (None, None),
    };
    let runner_origins: BTreeSet<Base> = p
        .runners
        .iter()
        .filter_map(|r| r.movement.as_ref()?.origin_base.as_deref())
        .filter_map(Base::from_label)
        .collect();

    PlayEvent {
        index,
        inning,
        half,
        event_name,
        description,
        batter_id,
        pitcher_id,
        runner_origins,
        is_complete,
    }
}

// ---------------------------------------------------------------------
// HTTP provider
// ---------------------------------------------------------------------

/// statsapi.mlb.com client. No retries; one request per call.
pub struct StatsApiFeed {
    http: reqwest::Client,
    base_url: String,
    sport_id: u32,
}

impl StatsApiFeed {
    pub fn new(base_url: &str, sport_id: u32, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("highlight-watcher/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4).min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sport_id,
        })
    }

    pub fn schedule_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/api/v1/schedule?sportId={}&date={}",
            self.base_url,
            self.sport_id,
            date.format("%Y-%m-%d")
        )
    }

    pub fn live_url(&self, game_id: u64) -> String {
        format!("{}/api/v1.1/game/{game_id}/feed/live", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let t0 = std::time::Instant::now();
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.map_err(|source| FeedError::Http {
            url: url.to_string(),
            source,
        })?;
        histogram!("feed_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(body)
    }
}

#[async_trait]
impl GameFeed for StatsApiFeed {
    async fn list_games(&self, date: NaiveDate) -> Result<Vec<GameSummary>, FeedError> {
        let url = self.schedule_url(date);
        let body = self.get_text(&url).await?;
        parse_schedule(&body)
    }

    async fn live_game(&self, game_id: u64) -> Result<GameDocument, FeedError> {
        let url = self.live_url(game_id);
        let body = self.get_text(&url).await?;
        parse_live_game(game_id, &body)
    }

    fn name(&self) -> &'static str {
        "statsapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dates_is_empty_slate() {
        let games = parse_schedule(r#"{"dates": []}"#).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn schedule_game_without_pk_is_shape_error() {
        let body = r#"{"dates":[{"games":[{"gameType":"R"}]}]}"#;
        assert!(matches!(parse_schedule(body), Err(FeedError::Shape(_))));
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            parse_schedule("<html>"),
            Err(FeedError::Decode { .. })
        ));
        assert!(matches!(
            parse_live_game(1, "nope"),
            Err(FeedError::Decode { .. })
        ));
    }

    #[test]
    fn live_without_live_data_is_shape_error() {
        assert!(matches!(
            parse_live_game(7, r#"{"gameData":{}}"#),
            Err(FeedError::Shape(_))
        ));
    }

    #[test]
    fn missing_fields_default() {
        let body = r#"{"liveData":{"plays":{"allPlays":[{}]}}}"#;
        let doc = parse_live_game(9, body).unwrap();
        assert_eq!(doc.context.score_diff, 0);
        assert!(!doc.context.is_final);
        let p = &doc.plays[0];
        assert_eq!(p.index, 0);
        assert_eq!(p.inning, 0);
        assert_eq!(p.half, Half::Top);
        assert!(p.description.is_empty());
        assert!(p.batter_id.is_none());
        assert!(p.runner_origins.is_empty());
        assert!(p.is_complete);
        assert_eq!(doc.decisions, GameDecisions::default());
    }

    #[test]
    fn linescore_final_and_runner_origins() {
        let body = r#"{
            "liveData": {
                "plays": {"allPlays": [{
                    "result": {"event": "Double", "description": "X doubles."},
                    "about": {"atBatIndex": 12, "halfInning": "bottom", "inning": 9},
                    "matchup": {"batter": {"id": 1}, "pitcher": {"id": 2}},
                    "runners": [
                        {"movement": {"originBase": null}},
                        {"movement": {"originBase": "3B"}},
                        {"movement": {"originBase": "1B"}}
                    ]
                }]},
                "linescore": {"inningState": "Final", "teams": {"home": {"runs": 3}, "away": {"runs": 5}}},
                "decisions": {"winner": {"id": 10}, "save": {"id": 11}}
            }
        }"#;
        let doc = parse_live_game(3, body).unwrap();
        assert!(doc.context.is_final);
        assert_eq!(doc.context.score_diff, 2);
        assert_eq!(doc.context.away_score, 5);
        let p = &doc.plays[0];
        assert_eq!(p.index, 12);
        assert_eq!(p.half, Half::Bottom);
        assert!(p.has_runner_in_scoring_position());
        assert_eq!(p.runner_origins.len(), 2);
        assert_eq!(doc.decisions.winner, Some(10));
        assert_eq!(doc.decisions.save, Some(11));
    }

    #[test]
    fn in_progress_at_bat_is_flagged() {
        let body = r#"{
            "liveData": {"plays": {"allPlays": [
                {
                    "result": {"event": "Single", "description": "A singles."},
                    "about": {"atBatIndex": 0, "halfInning": "top", "inning": 1, "isComplete": true}
                },
                {
                    "result": {"type": "atBat"},
                    "about": {"atBatIndex": 1, "halfInning": "top", "inning": 1, "isComplete": false},
                    "matchup": {"batter": {"id": 660271}, "pitcher": {"id": 2}}
                }
            ]}}
        }"#;
        let doc = parse_live_game(4, body).unwrap();
        assert!(doc.plays[0].is_complete);
        let live = &doc.plays[1];
        assert!(!live.is_complete);
        assert_eq!(live.index, 1);
        assert!(live.event_name.is_empty());
    }
}
