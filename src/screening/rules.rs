// =============================================================================
// Rule sets — swappable screening thresholds
// =============================================================================
//
// A rule set is plain configuration.  Two named sets ship with the screener:
//
//   strict:  avg_return >= 3%, volatility < 2%, RSI < 70, MACD > signal,
//            golden cross
//   trend:   avg_return > 0
//
// Both always require current price > long SMA.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ScreenError;

/// Lower bound on the trailing average daily return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnFloor {
    /// `avg_return >= value`
    AtLeast(f64),
    /// `avg_return > value`
    Above(f64),
}

impl ReturnFloor {
    pub fn value(&self) -> f64 {
        match self {
            Self::AtLeast(v) | Self::Above(v) => *v,
        }
    }

    pub fn admits(&self, avg_return: f64) -> bool {
        match self {
            Self::AtLeast(v) => avg_return >= *v,
            Self::Above(v) => avg_return > *v,
        }
    }
}

impl std::fmt::Display for ReturnFloor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtLeast(v) => write!(f, ">= {v:.4}"),
            Self::Above(v) => write!(f, "> {v:.4}"),
        }
    }
}

/// Thresholds applied to the last row of an indicator frame.
///
/// `None` caps and `false` requirements disable that check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub min_avg_return: ReturnFloor,
    #[serde(default)]
    pub max_volatility: Option<f64>,
    #[serde(default)]
    pub max_rsi: Option<f64>,
    #[serde(default)]
    pub require_macd_cross: bool,
    #[serde(default)]
    pub require_golden_cross: bool,
}

impl RuleSet {
    /// Full multi-signal screen.
    pub fn strict() -> Self {
        Self {
            min_avg_return: ReturnFloor::AtLeast(0.03),
            max_volatility: Some(0.02),
            max_rsi: Some(70.0),
            require_macd_cross: true,
            require_golden_cross: true,
        }
    }

    /// Positive drift above the long average, nothing else.
    pub fn trend() -> Self {
        Self {
            min_avg_return: ReturnFloor::Above(0.0),
            max_volatility: None,
            max_rsi: None,
            require_macd_cross: false,
            require_golden_cross: false,
        }
    }

    pub fn validate(&self) -> Result<(), ScreenError> {
        if !self.min_avg_return.value().is_finite() {
            return Err(ScreenError::configuration("min_avg_return must be finite"));
        }
        if let Some(cap) = self.max_volatility {
            if !cap.is_finite() || cap < 0.0 {
                return Err(ScreenError::configuration(format!(
                    "max_volatility must be a non-negative number, got {cap}"
                )));
            }
        }
        if let Some(cap) = self.max_rsi {
            if !(cap > 0.0 && cap <= 100.0) {
                return Err(ScreenError::configuration(format!(
                    "max_rsi must be in (0, 100], got {cap}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::strict()
    }
}

/// Which rule set a run uses, as written in the config file:
/// `"strict"`, `"trend"`, or `{ "custom": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleProfile {
    Strict,
    Trend,
    Custom(RuleSet),
}

impl Default for RuleProfile {
    fn default() -> Self {
        Self::Strict
    }
}

impl RuleProfile {
    pub fn rules(&self) -> RuleSet {
        match self {
            Self::Strict => RuleSet::strict(),
            Self::Trend => RuleSet::trend(),
            Self::Custom(rules) => rules.clone(),
        }
    }
}

impl std::fmt::Display for RuleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Trend => write!(f, "trend"),
            Self::Custom(_) => write!(f, "custom"),
        }
    }
}
