// =============================================================================
// Runtime Configuration — screener settings loaded from JSON
// =============================================================================
//
// Central configuration for a screening run: where prices come from, which
// tickers to screen, the indicator windows, and the rule set.
//
// All fields carry `#[serde(default)]` so that adding new fields never
// breaks loading an older config file.  A missing file means "use the
// defaults"; a broken one aborts the run.
//
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::discovery::{common_tickers, normalize_symbol};
use crate::error::ScreenError;
use crate::indicators::IndicatorParams;
use crate::market_data::DateWindow;
use crate::screening::RuleProfile;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn default_min_categories() -> usize {
    2
}

// =============================================================================
// UniverseConfig
// =============================================================================

/// Named ticker categories and how many of them a symbol must appear in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseConfig {
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    #[serde(default = "default_min_categories")]
    pub min_categories: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            min_categories: default_min_categories(),
        }
    }
}

// =============================================================================
// ScreenerConfig
// =============================================================================

/// Top-level configuration for a screening run.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    // --- Price source ------------------------------------------------------

    /// Directory holding one `<TICKER>.json` price file per symbol.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// First date (inclusive) of price history to load.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Last date (exclusive) of price history to load.
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    // --- Universe ----------------------------------------------------------

    /// Explicit tickers.  When non-empty, discovery is bypassed.
    #[serde(default)]
    pub tickers: Vec<String>,

    /// Category lists used for discovery when `tickers` is empty.
    #[serde(default)]
    pub universe: UniverseConfig,

    // --- Screen ------------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,

    /// `"strict"`, `"trend"`, or `{ "custom": { ... } }`.
    #[serde(default)]
    pub rules: RuleProfile,

    // --- Output ------------------------------------------------------------

    /// Where to write the JSON report; no file is written when unset.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            tickers: Vec::new(),
            universe: UniverseConfig::default(),
            indicators: IndicatorParams::default(),
            rules: RuleProfile::default(),
            report_path: None,
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read screener config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse screener config from {}", path.display()))?;

        info!(
            path = %path.display(),
            tickers = config.tickers.len(),
            rules = %config.rules,
            "screener config loaded"
        );

        Ok(config)
    }

    /// Load `path`, or the defaults when no file exists there.
    ///
    /// A file that exists but cannot be read or parsed is an error: falling
    /// back would run the screen with rules the user did not ask for.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound) =>
            {
                warn!(path = %path.display(), "no screener config found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Check windows, thresholds, and the date range for consistency.
    pub fn validate(&self) -> Result<(), ScreenError> {
        self.indicators.validate()?;
        self.rules.rules().validate()?;
        if self.start_date >= self.end_date {
            return Err(ScreenError::configuration(format!(
                "start_date {} must be before end_date {}",
                self.start_date, self.end_date
            )));
        }
        if self.tickers.is_empty() && self.universe.min_categories == 0 {
            return Err(ScreenError::configuration(
                "universe.min_categories must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }

    /// The tickers to screen: the explicit list if given, otherwise the
    /// symbols common to enough discovery categories.
    pub fn resolve_tickers(&self) -> BTreeSet<String> {
        if !self.tickers.is_empty() {
            return self.tickers.iter().filter_map(|t| normalize_symbol(t)).collect();
        }
        common_tickers(&self.universe.categories, self.universe.min_categories)
    }
}
