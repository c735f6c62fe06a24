use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::bar::{Bar, PriceSeries};

/// Half-open date range `[start, end)` used to select bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

// ---------------------------------------------------------------------------
// JsonDirectorySource -- one `<TICKER>.json` file per symbol
// ---------------------------------------------------------------------------

/// Price history read from a directory of JSON files, each holding an array
/// of bars for a single ticker.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{ticker}.json"))
    }

    /// Load the bars for `ticker` that fall inside `window`.
    ///
    /// An unknown ticker (no file) yields an empty series; the screen then
    /// reports it as an invalid series.  Unreadable or malformed files are
    /// errors.
    pub async fn fetch(&self, ticker: &str, window: DateWindow) -> Result<PriceSeries> {
        let path = self.path_for(ticker);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(ticker, path = %path.display(), "no price file, treating as delisted");
                return Ok(PriceSeries::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read prices from {}", path.display()))
            }
        };

        let bars: Vec<Bar> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse prices from {}", path.display()))?;
        let total = bars.len();

        let series: PriceSeries = bars
            .into_iter()
            .filter(|b| window.contains(b.date))
            .collect::<Vec<_>>()
            .into();

        debug!(ticker, total, kept = series.len(), "price history loaded");
        Ok(series)
    }

    /// Load every ticker concurrently.
    ///
    /// Every requested ticker is present in the returned map.  Load failures
    /// are logged and mapped to an empty series.
    pub async fn fetch_all(
        &self,
        tickers: &BTreeSet<String>,
        window: DateWindow,
    ) -> HashMap<String, PriceSeries> {
        let mut tasks = JoinSet::new();
        for ticker in tickers {
            let source = self.clone();
            let ticker = ticker.clone();
            tasks.spawn(async move {
                let result = source.fetch(&ticker, window).await;
                (ticker, result)
            });
        }

        let mut out = HashMap::with_capacity(tickers.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((ticker, Ok(series))) => {
                    out.insert(ticker, series);
                }
                Ok((ticker, Err(e))) => {
                    error!(ticker = %ticker, error = %format!("{e:#}"), "price load failed");
                    out.insert(ticker, PriceSeries::default());
                }
                Err(e) => {
                    error!(error = %e, "price load task aborted");
                }
            }
        }

        // An aborted task loses its ticker; keep it in the map regardless.
        for ticker in tickers {
            out.entry(ticker.clone()).or_default();
        }

        let without_history = out.values().filter(|s| s.is_empty()).count();
        if without_history > 0 {
            warn!(without_history, "tickers have no price history in the window");
        }

        info!(count = out.len(), "price histories loaded");
        out
    }
}
