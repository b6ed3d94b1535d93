use std::net::SocketAddr;

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;

static DESCRIBED: OnceCell<()> = OnceCell::new();

/// Register metric descriptions once per process.
pub fn describe() {
    DESCRIBED.get_or_init(|| {
        describe_counter!("plays_evaluated_total", "Plays involving a watched player that were classified");
        describe_counter!("highlights_total", "Plays judged highlight-worthy, by reason");
        describe_counter!("ai_judgment_calls_total", "AI judgment calls made");
        describe_counter!("ai_judgment_failures_total", "AI judgment calls that errored (treated as NO)");
        describe_counter!("synth_attempts_total", "Content generation attempts");
        describe_counter!("synth_fallbacks_total", "Cards that fell back to feed text");
        describe_counter!("dispatch_total", "Dispatch attempts");
        describe_counter!("dispatch_errors_total", "Dispatch attempts that failed");
        describe_counter!("games_skipped_total", "Games skipped because the live feed was unavailable");
        describe_gauge!("scan_last_run_ts", "Unix timestamp of the last finished scan pass");
        describe_histogram!("feed_fetch_ms", "Feed request latency in milliseconds");
    });
}

/// Install the Prometheus recorder with its own HTTP listener.
/// Must be called from inside the tokio runtime.
pub fn install_exporter(listen: &str) -> Result<()> {
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid metrics listen address: {listen}"))?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("prometheus: install recorder")?;
    describe();
    tracing::info!(%addr, "metrics exporter listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_is_idempotent() {
        describe();
        describe();
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        assert!(install_exporter("not-an-addr").is_err());
    }
}
