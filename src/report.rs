// =============================================================================
// Screening Report — auditable record of one run
// =============================================================================
//
// Captures every ticker's fate (passing / rejected / skipped) together with
// the metric snapshot that decided it, stamped with a run id and timestamp.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::error::SkipReason;
use crate::indicators::rsi::rsi_zone;
use crate::screener::ScreenOutcome;
use crate::screening::ScreeningResult;

#[derive(Debug, Clone, Serialize)]
pub struct TickerEntry {
    pub ticker: String,
    #[serde(flatten)]
    pub result: ScreeningResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    pub ticker: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Serializable summary of a screening run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    /// Unique identifier for this run (UUID v4).
    pub run_id: String,

    /// ISO 8601 timestamp of when the report was built.
    pub generated_at: String,

    /// Rule profile label ("strict", "trend", "custom").
    pub rules: String,

    pub passing: Vec<TickerEntry>,
    pub rejected: Vec<TickerEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl ScreenReport {
    /// Build a report; entries are sorted by ticker.
    pub fn from_outcome(outcome: &ScreenOutcome, rules: impl Into<String>) -> Self {
        let entries = |map: &std::collections::BTreeMap<String, ScreeningResult>| {
            map.iter()
                .map(|(ticker, result)| TickerEntry {
                    ticker: ticker.clone(),
                    result: result.clone(),
                })
                .collect::<Vec<_>>()
        };

        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            rules: rules.into(),
            passing: entries(&outcome.passing),
            rejected: entries(&outcome.rejected),
            skipped: outcome
                .skipped
                .iter()
                .map(|(ticker, reason)| SkippedEntry {
                    ticker: ticker.clone(),
                    reason: reason.clone(),
                })
                .collect(),
        }
    }

    /// Human-readable summary lines.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["Screened Stocks:".to_string()];
        for entry in &self.passing {
            let m = &entry.result.metrics;
            lines.push(format!(
                "{}: as_of={} avg_return={:.4} price={:.2} sma_long={:.2} volatility={:.4} rsi={:.2} ({}) macd={:.4} signal={:.4} golden_cross={}",
                entry.ticker,
                m.as_of,
                m.avg_return,
                m.current_price,
                m.long_sma,
                m.volatility,
                m.rsi,
                rsi_zone(m.rsi),
                m.macd,
                m.signal_line,
                m.golden_cross,
            ));
        }
        lines.push(format!(
            "{} passing, {} rejected, {} skipped",
            self.passing.len(),
            self.rejected.len(),
            self.skipped.len()
        ));
        for entry in &self.skipped {
            lines.push(format!("  skipped {}: {}", entry.ticker, entry.reason.detail));
        }
        lines
    }

    pub fn print_summary(&self) {
        for line in self.summary_lines() {
            println!("{line}");
        }
    }

    /// Write the report as pretty JSON using an atomic tmp + rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise screen report")?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp report to {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp report to {}", path.display()))?;

        info!(path = %path.display(), run_id = %self.run_id, "screen report saved");
        Ok(())
    }
}
