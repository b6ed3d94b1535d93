// src/scanner.rs
//! One pass over a date: games in listing order, plays in feed order, then
//! the end-of-game winner/save pass. Strictly sequential; nothing here is
//! fatal except the initial schedule listing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::classify::PlayClassifier;
use crate::feed::{FeedError, GameContext, GameDocument, GameFeed, PlayEvent};
use crate::notify::{progress, DedupSet, Dispatcher, EventType, NotificationPayload, FINAL};
use crate::state::CursorStore;
use crate::synth::{ContentSynthesizer, SynthesisRequest};
use crate::watch::{WatchRegistry, WatchedPlayer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub date: NaiveDate,
    pub games_listed: usize,
    pub games_skipped: usize,
    pub plays_evaluated: usize,
    pub highlights: usize,
    pub victories: usize,
    pub dispatched: usize,
    pub dispatch_failures: usize,
    pub duplicates_skipped: usize,
}

impl ScanReport {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            games_listed: 0,
            games_skipped: 0,
            plays_evaluated: 0,
            highlights: 0,
            victories: 0,
            dispatched: 0,
            dispatch_failures: 0,
            duplicates_skipped: 0,
        }
    }
}

pub struct GameScanner {
    feed: Arc<dyn GameFeed>,
    registry: Arc<WatchRegistry>,
    classifier: PlayClassifier,
    synth: ContentSynthesizer,
    dispatcher: Dispatcher,
    dedup: Option<DedupSet>,
    cursors: Option<CursorStore>,
}

impl GameScanner {
    pub fn new(
        feed: Arc<dyn GameFeed>,
        registry: Arc<WatchRegistry>,
        classifier: PlayClassifier,
        synth: ContentSynthesizer,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            feed,
            registry,
            classifier,
            synth,
            dispatcher,
            dedup: None,
            cursors: None,
        }
    }

    /// One moment per (game, player, category) for the life of the process.
    pub fn with_dedup(mut self) -> Self {
        self.dedup = Some(DedupSet::new());
        self
    }

    /// Skip plays already processed by an earlier run.
    pub fn with_cursors(mut self, store: CursorStore) -> Self {
        self.cursors = Some(store);
        self
    }

    pub fn cursors(&self) -> Option<&CursorStore> {
        self.cursors.as_ref()
    }

    /// Same as [`scan_date`](Self::scan_date) but bounded by `deadline`.
    pub async fn run_pass(&mut self, date: NaiveDate, deadline: Duration) -> Result<ScanReport> {
        match tokio::time::timeout(deadline, self.scan_date(date)).await {
            Ok(res) => res.map_err(|e| anyhow!("schedule unavailable for {date}: {e}")),
            Err(_) => Err(anyhow!(
                "scan pass for {date} exceeded {}s deadline",
                deadline.as_secs()
            )),
        }
    }

    pub async fn scan_date(&mut self, date: NaiveDate) -> Result<ScanReport, FeedError> {
        let mut report = ScanReport::new(date);
        let games = self.feed.list_games(date).await?;
        report.games_listed = games.len();
        tracing::info!(%date, feed = self.feed.name(), games = games.len(), "scan pass started");

        for summary in &games {
            let mut doc = match self.feed.live_game(summary.game_id).await {
                Ok(doc) => doc,
                Err(e) => {
                    metrics::counter!("games_skipped_total").increment(1);
                    tracing::warn!(game_id = summary.game_id, "skipping game: {e}");
                    report.games_skipped += 1;
                    continue;
                }
            };
            doc.context.absorb_summary(summary);
            self.scan_game(&doc, &mut report).await;
        }

        if let Some(store) = &self.cursors {
            if let Err(e) = store.save().await {
                tracing::warn!("cursor save failed: {e:#}");
            }
        }
        metrics::gauge!("scan_last_run_ts").set(Utc::now().timestamp() as f64);
        tracing::info!(
            %date,
            games = report.games_listed,
            skipped = report.games_skipped,
            evaluated = report.plays_evaluated,
            highlights = report.highlights,
            victories = report.victories,
            dispatched = report.dispatched,
            failures = report.dispatch_failures,
            duplicates = report.duplicates_skipped,
            "scan pass finished"
        );
        Ok(report)
    }

    async fn scan_game(&mut self, doc: &GameDocument, report: &mut ScanReport) {
        let ctx = &doc.context;
        let registry = Arc::clone(&self.registry);
        tracing::debug!(
            game_id = ctx.game_id,
            game_type = %ctx.game_type_code,
            score = %ctx.score_line(),
            plays = doc.plays.len(),
            is_final = ctx.is_final,
            "scanning game"
        );

        for play in &doc.plays {
            // Only the last entry can be in progress; the next pass picks it up.
            if !play.is_complete {
                tracing::debug!(
                    game_id = ctx.game_id,
                    index = play.index,
                    "at-bat in progress, stopping here"
                );
                break;
            }
            if let Some(store) = &self.cursors {
                if !store.is_new(ctx.game_id, play.index) {
                    continue;
                }
            }

            // Batter first; the pitcher is only consulted when the batter is not watched.
            let watched = registry
                .lookup(play.batter_id)
                .or_else(|| registry.lookup(play.pitcher_id));
            if let Some(player) = watched {
                self.evaluate_play(ctx, play, player, report).await;
            }

            if let Some(store) = self.cursors.as_mut() {
                store.advance(ctx.game_id, play.index);
            }
        }

        if ctx.is_final {
            self.final_pass(doc, &registry, report).await;
        }
    }

    async fn evaluate_play(
        &mut self,
        ctx: &GameContext,
        play: &PlayEvent,
        player: &WatchedPlayer,
        report: &mut ScanReport,
    ) {
        report.plays_evaluated += 1;
        metrics::counter!("plays_evaluated_total").increment(1);

        let decision = self
            .classifier
            .classify(&player.display_name, play, ctx)
            .await;
        if !decision.is_worthy {
            return;
        }
        report.highlights += 1;
        metrics::counter!("highlights_total", "reason" => decision.reason.as_str()).increment(1);
        tracing::info!(
            game_id = ctx.game_id,
            player = %player.display_name,
            event = %play.event_name,
            reason = decision.reason.as_str(),
            "highlight"
        );

        let event_type = EventType::from_event_name(&play.event_name);
        self.emit(
            ctx,
            player,
            event_type,
            &play.description,
            progress(play.inning, play.half),
            report,
        )
        .await;
    }

    async fn final_pass(
        &mut self,
        doc: &GameDocument,
        registry: &WatchRegistry,
        report: &mut ScanReport,
    ) {
        let ctx = &doc.context;
        if self
            .cursors
            .as_ref()
            .is_some_and(|s| s.final_done(ctx.game_id))
        {
            return;
        }

        let roles = [
            (doc.decisions.winner, "earns the win!"),
            (doc.decisions.save, "records the save!"),
        ];
        for (id, phrase) in roles {
            let Some(player) = registry.lookup(id) else {
                continue;
            };
            report.victories += 1;
            tracing::info!(game_id = ctx.game_id, player = %player.display_name, phrase, "game-final decision");
            let description = format!("{} {phrase}", player.display_name);
            self.emit(
                ctx,
                player,
                EventType::Victory,
                &description,
                FINAL.to_string(),
                report,
            )
            .await;
        }

        if let Some(store) = self.cursors.as_mut() {
            store.mark_final(ctx.game_id);
        }
    }

    async fn emit(
        &mut self,
        ctx: &GameContext,
        player: &WatchedPlayer,
        event_type: EventType,
        description: &str,
        progress: String,
        report: &mut ScanReport,
    ) {
        if let Some(dedup) = self.dedup.as_mut() {
            if !dedup.first_time(ctx.game_id, player.id, event_type) {
                report.duplicates_skipped += 1;
                tracing::debug!(
                    game_id = ctx.game_id,
                    player = %player.display_name,
                    %event_type,
                    "duplicate moment skipped"
                );
                return;
            }
        }

        let score = ctx.score_line();
        let content = self
            .synth
            .synthesize(SynthesisRequest {
                player: &player.display_name,
                event_type: event_type.as_str(),
                description,
                score: &score,
            })
            .await;

        let payload =
            NotificationPayload::build(&player.display_name, event_type, content, ctx, progress);
        if self.dispatcher.dispatch(&payload).await {
            report.dispatched += 1;
        } else {
            report.dispatch_failures += 1;
        }
    }
}
