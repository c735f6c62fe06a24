// =============================================================================
// Screener — per-ticker indicator + screening pipeline over a batch
// =============================================================================
//
// Every ticker is independent: compute its frame, evaluate it, and record it
// in exactly one of passing / rejected / skipped.  Tickers run in parallel on
// the rayon pool and their results are merged after all of them complete.
// =============================================================================

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ScreenError, SeriesDefect, SkipReason};
use crate::indicators::{compute, IndicatorParams};
use crate::market_data::PriceSeries;
use crate::screening::{RuleSet, ScreeningEngine, ScreeningResult};

/// Everything one screening run produced, keyed by ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreenOutcome {
    pub passing: BTreeMap<String, ScreeningResult>,
    /// Evaluated and failed at least one rule.
    pub rejected: BTreeMap<String, ScreeningResult>,
    /// Could not be evaluated.
    pub skipped: BTreeMap<String, SkipReason>,
}

impl ScreenOutcome {
    pub fn total(&self) -> usize {
        self.passing.len() + self.rejected.len() + self.skipped.len()
    }
}

/// Screen a single series.
pub fn screen_one(
    series: &PriceSeries,
    params: &IndicatorParams,
    engine: &ScreeningEngine,
) -> Result<ScreeningResult, ScreenError> {
    let frame = compute(series, params)?;
    engine.evaluate(&frame)
}

/// Screen every ticker in `series_by_ticker`.
///
/// Fails only on an inconsistent configuration; per-ticker data problems land
/// in `skipped`.
pub fn screen(
    series_by_ticker: HashMap<String, PriceSeries>,
    params: &IndicatorParams,
    rules: &RuleSet,
) -> Result<ScreenOutcome, ScreenError> {
    params.validate()?;
    rules.validate()?;

    let engine = ScreeningEngine::new(rules.clone());
    let input_count = series_by_ticker.len();

    let results: Vec<(String, Result<ScreeningResult, ScreenError>)> = series_by_ticker
        .into_par_iter()
        .map(|(ticker, series)| {
            let result = if ticker.trim().is_empty() {
                Err(SeriesDefect::BlankTicker.into())
            } else {
                screen_one(&series, params, &engine)
            };
            (ticker, result)
        })
        .collect();

    let mut outcome = ScreenOutcome::default();
    for (ticker, result) in results {
        match result {
            Ok(result) if result.passed() => {
                debug!(ticker = %ticker, "passed screen");
                outcome.passing.insert(ticker, result);
            }
            Ok(result) => {
                debug!(ticker = %ticker, failures = ?result.failures, "rejected by screen");
                outcome.rejected.insert(ticker, result);
            }
            Err(err) => match SkipReason::from_error(&err) {
                Some(reason) => {
                    debug!(ticker = %ticker, error = %err, "skipped");
                    outcome.skipped.insert(ticker, reason);
                }
                // Parameters were validated up front, so no per-ticker
                // evaluation can raise a configuration error.
                None => return Err(err),
            },
        }
    }

    debug_assert_eq!(outcome.total(), input_count);
    info!(
        tickers = outcome.total(),
        passing = outcome.passing.len(),
        rejected = outcome.rejected.len(),
        skipped = outcome.skipped.len(),
        "screen complete"
    );

    Ok(outcome)
}
