use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SeriesDefect;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading day's observation.
///
/// Only `adj_close` feeds the indicators; the raw OHLCV fields are carried
/// through from the price feed and default to zero when the feed omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub close: f64,
    pub adj_close: f64,
    #[serde(default)]
    pub volume: f64,
}

// ---------------------------------------------------------------------------
// PriceSeries
// ---------------------------------------------------------------------------

/// Daily bars for one ticker, oldest first.
///
/// Construction does not validate; `validate` is run by the indicator engine
/// so that a malformed feed surfaces as an `InvalidSeries` skip instead of
/// being rejected before the screen sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Adjusted closes in date order.
    pub fn adj_closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.adj_close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Check the structural invariants: at least one bar, strictly
    /// increasing dates, positive finite adjusted closes.
    pub fn validate(&self) -> Result<(), SeriesDefect> {
        if self.bars.is_empty() {
            return Err(SeriesDefect::Empty);
        }

        for (index, bar) in self.bars.iter().enumerate() {
            if !bar.adj_close.is_finite() || bar.adj_close <= 0.0 {
                return Err(SeriesDefect::NonPositivePrice {
                    index,
                    price: bar.adj_close,
                });
            }
            if index > 0 {
                let previous = self.bars[index - 1].date;
                if bar.date <= previous {
                    return Err(SeriesDefect::NonIncreasingDate {
                        index,
                        previous,
                        date: bar.date,
                    });
                }
            }
        }

        Ok(())
    }
}

impl From<Vec<Bar>> for PriceSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}
