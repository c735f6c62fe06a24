// =============================================================================
// Equity Screener — Main Entry Point
// =============================================================================
//
// Resolves the ticker universe, loads each ticker's daily price history,
// runs the indicator + screening pipeline, and prints the passing tickers.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod discovery;
mod error;
mod indicators;
mod market_data;
mod report;
mod runtime_config;
mod screener;
mod screening;
mod types;

#[cfg(test)]
mod fixtures;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::market_data::JsonDirectorySource;
use crate::report::ScreenReport;
use crate::runtime_config::ScreenerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("SCREENER_CONFIG").unwrap_or_else(|_| "screener_config.json".into());

    let mut config = ScreenerConfig::load_or_default(&config_path)
        .with_context(|| format!("cannot use screener config {config_path}"))?;

    // Override tickers and data directory from env if available.
    if let Ok(syms) = std::env::var("SCREENER_TICKERS") {
        config.tickers = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(dir) = std::env::var("SCREENER_DATA_DIR") {
        config.data_dir = dir.into();
    }

    config.validate().context("invalid screener configuration")?;

    // ── 2. Ticker universe ───────────────────────────────────────────────
    let tickers = config.resolve_tickers();
    if tickers.is_empty() {
        warn!("No tickers to screen; set `tickers` or `universe.categories` in the config");
        return Ok(());
    }
    info!(count = tickers.len(), tickers = ?tickers, "Screening universe resolved");

    // ── 3. Price history ─────────────────────────────────────────────────
    let source = JsonDirectorySource::new(&config.data_dir);
    let series_by_ticker = source.fetch_all(&tickers, config.window()).await;

    // ── 4. Screen (CPU-bound, off the async runtime) ─────────────────────
    let params = config.indicators.clone();
    let rules = config.rules.rules();
    let outcome = tokio::task::spawn_blocking(move || {
        screener::screen(series_by_ticker, &params, &rules)
    })
    .await
    .context("screening task failed")??;

    // ── 5. Report ────────────────────────────────────────────────────────
    let report = ScreenReport::from_outcome(&outcome, config.rules.to_string());
    report.print_summary();

    if let Some(path) = &config.report_path {
        if let Err(e) = report.save(path) {
            error!(error = %e, "Failed to save screen report");
        }
    }

    info!(run_id = %report.run_id, "Screening run complete");
    Ok(())
}
