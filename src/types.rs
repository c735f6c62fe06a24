// =============================================================================
// Shared types used across the screener
// =============================================================================

use serde::{Deserialize, Serialize};

/// Outcome of applying a rule set to one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Named indicator or screening statistic, used to report which window was
/// not satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    DailyReturn,
    ShortSma,
    LongSma,
    Rsi,
    FastEma,
    SlowEma,
    Macd,
    SignalLine,
    GoldenCross,
    AverageReturn,
    Volatility,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DailyReturn => "daily_return",
            Self::ShortSma => "short_sma",
            Self::LongSma => "long_sma",
            Self::Rsi => "rsi",
            Self::FastEma => "fast_ema",
            Self::SlowEma => "slow_ema",
            Self::Macd => "macd",
            Self::SignalLine => "signal_line",
            Self::GoldenCross => "golden_cross",
            Self::AverageReturn => "average_return",
            Self::Volatility => "volatility",
        };
        f.write_str(name)
    }
}
