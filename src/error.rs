// =============================================================================
// Screening errors
// =============================================================================
//
// Every failure the core can raise is a property of the input data or the
// configuration, never a transient fault.  Only the orchestrator catches
// `InvalidSeries` / `InsufficientHistory` and turns them into skip entries.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Metric;

/// Structural defect in a price series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesDefect {
    #[error("series is empty")]
    Empty,

    #[error("ticker symbol is blank")]
    BlankTicker,

    #[error("adjusted close {price} at index {index} is not a positive finite number")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("date {date} at index {index} does not follow {previous}")]
    NonIncreasingDate {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },
}

/// Unified error type for indicator computation and screening.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// Malformed or empty input series.
    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesDefect),

    /// Valid series that is too short for one of the required windows.
    #[error("insufficient history for {metric}: need {required} bars, have {available}")]
    InsufficientHistory {
        metric: Metric,
        required: usize,
        available: usize,
    },

    /// Internally inconsistent indicator parameters or rule thresholds.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ScreenError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ScreenError::Configuration(msg.into())
    }
}

/// Category of a per-ticker failure, as recorded in the skipped map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipKind {
    InvalidSeries,
    InsufficientHistory,
}

impl std::fmt::Display for SkipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSeries => write!(f, "InvalidSeries"),
            Self::InsufficientHistory => write!(f, "InsufficientHistory"),
        }
    }
}

/// Why a ticker could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipReason {
    pub kind: SkipKind,
    /// The metric whose window was not satisfied (insufficient history only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    pub detail: String,
}

impl SkipReason {
    /// Convert a per-ticker error into a skip entry.
    ///
    /// Returns `None` for `Configuration`, which is never a per-ticker fact.
    pub fn from_error(err: &ScreenError) -> Option<Self> {
        match err {
            ScreenError::InvalidSeries(_) => Some(Self {
                kind: SkipKind::InvalidSeries,
                metric: None,
                detail: err.to_string(),
            }),
            ScreenError::InsufficientHistory { metric, .. } => Some(Self {
                kind: SkipKind::InsufficientHistory,
                metric: Some(*metric),
                detail: err.to_string(),
            }),
            ScreenError::Configuration(_) => None,
        }
    }
}
