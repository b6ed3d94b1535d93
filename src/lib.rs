// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod ai;
pub mod classify;
pub mod config;
pub mod feed;
pub mod metrics;
pub mod notify;
pub mod scanner;
pub mod state;
pub mod synth;
pub mod watch;

// ---- Re-exports for stable public API ----
pub use crate::classify::{Decision, DecisionReason, PlayClassifier};
pub use crate::config::AppConfig;
pub use crate::notify::{Dispatcher, NotificationPayload, Notifier};
pub use crate::scanner::{GameScanner, ScanReport};
pub use crate::synth::{ContentPayload, ContentSynthesizer};
pub use crate::watch::{WatchRegistry, WatchedPlayer};

use std::sync::Arc;
use std::time::Duration;

use crate::feed::statsapi::StatsApiFeed;
use crate::state::CursorStore;
use crate::synth::SynthSettings;

/// Wire the production scanner from a loaded config.
/// `cfg.ai` is resolved here, so credentials only need to exist for the
/// selected provider.
pub async fn build_scanner(
    cfg: &AppConfig,
    registry: WatchRegistry,
    dry_run: bool,
) -> anyhow::Result<GameScanner> {
    let ai_cfg = cfg.ai.clone().resolved()?;
    let generator = ai::build_generator(&ai_cfg)?;

    let feed = StatsApiFeed::new(
        &cfg.feed.base_url,
        cfg.feed.sport_id,
        Duration::from_secs(cfg.feed.timeout_secs.max(1)),
    )?;

    let classifier = PlayClassifier::new(Arc::clone(&generator));
    let synth = ContentSynthesizer::new(
        generator,
        SynthSettings::from_config(&cfg.synth, &ai_cfg.language),
    );
    let dispatcher = Dispatcher::from_config(&cfg.admin, dry_run);

    let mut scanner = GameScanner::new(
        Arc::new(feed),
        Arc::new(registry),
        classifier,
        synth,
        dispatcher,
    );
    if cfg.scan.dedup_per_category {
        scanner = scanner.with_dedup();
    }
    if let Some(path) = &cfg.scan.state_path {
        scanner = scanner.with_cursors(CursorStore::load(path.clone()).await);
    }
    Ok(scanner)
}
