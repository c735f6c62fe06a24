// =============================================================================
// Indicator Frame — every derived series for one ticker, built once
// =============================================================================
//
// `compute` validates a PriceSeries and returns an immutable frame whose
// sequences are all index-aligned with the input dates.  `None` marks a
// position whose defining window is not yet full; it is never a stand-in for
// zero.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::macd::calculate_macd;
use super::returns::calculate_daily_returns;
use super::rsi::calculate_rsi;
use super::sma::calculate_sma;
use crate::error::ScreenError;
use crate::market_data::PriceSeries;
use crate::types::Metric;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_short_sma() -> usize {
    50
}

fn default_long_sma() -> usize {
    200
}

fn default_rsi_period() -> usize {
    14
}

fn default_fast_ema() -> usize {
    12
}

fn default_slow_ema() -> usize {
    26
}

fn default_signal_ema() -> usize {
    9
}

fn default_return_lookback() -> usize {
    60
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Window lengths for every indicator in the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_short_sma")]
    pub short_sma: usize,

    #[serde(default = "default_long_sma")]
    pub long_sma: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_fast_ema")]
    pub fast_ema: usize,

    #[serde(default = "default_slow_ema")]
    pub slow_ema: usize,

    #[serde(default = "default_signal_ema")]
    pub signal_ema: usize,

    /// Number of trailing daily returns used for the average-return and
    /// volatility statistics.
    #[serde(default = "default_return_lookback")]
    pub return_lookback: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            short_sma: default_short_sma(),
            long_sma: default_long_sma(),
            rsi_period: default_rsi_period(),
            fast_ema: default_fast_ema(),
            slow_ema: default_slow_ema(),
            signal_ema: default_signal_ema(),
            return_lookback: default_return_lookback(),
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), ScreenError> {
        let windows = [
            ("short_sma", self.short_sma),
            ("long_sma", self.long_sma),
            ("rsi_period", self.rsi_period),
            ("fast_ema", self.fast_ema),
            ("slow_ema", self.slow_ema),
            ("signal_ema", self.signal_ema),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ScreenError::configuration(format!("{name} must be at least 1")));
        }
        if self.short_sma >= self.long_sma {
            return Err(ScreenError::configuration(format!(
                "short_sma ({}) must be shorter than long_sma ({})",
                self.short_sma, self.long_sma
            )));
        }
        if self.fast_ema >= self.slow_ema {
            return Err(ScreenError::configuration(format!(
                "fast_ema ({}) must be shorter than slow_ema ({})",
                self.fast_ema, self.slow_ema
            )));
        }
        if self.return_lookback < 2 {
            return Err(ScreenError::configuration(
                "return_lookback must be at least 2 for a standard deviation",
            ));
        }
        Ok(())
    }

    /// Number of bars needed before `metric` is defined at the last position.
    pub fn required_bars(&self, metric: Metric) -> usize {
        match metric {
            Metric::DailyReturn => 2,
            Metric::ShortSma => self.short_sma,
            Metric::LongSma => self.long_sma,
            Metric::Rsi => self.rsi_period,
            Metric::FastEma => self.fast_ema,
            Metric::SlowEma | Metric::Macd => self.slow_ema,
            Metric::SignalLine => self.slow_ema + self.signal_ema,
            Metric::GoldenCross => self.short_sma.max(self.long_sma),
            Metric::AverageReturn | Metric::Volatility => self.return_lookback + 1,
        }
    }
}

// =============================================================================
// IndicatorFrame
// =============================================================================

/// Price series extended with index-aligned derived sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    params: IndicatorParams,
    dates: Vec<NaiveDate>,
    adj_close: Vec<f64>,
    daily_return: Vec<Option<f64>>,
    short_sma: Vec<Option<f64>>,
    long_sma: Vec<Option<f64>>,
    rsi: Vec<Option<f64>>,
    fast_ema: Vec<Option<f64>>,
    slow_ema: Vec<Option<f64>>,
    macd: Vec<Option<f64>>,
    signal_line: Vec<Option<f64>>,
    golden_cross: Vec<Option<bool>>,
}

/// Compute every indicator for `series`.
///
/// Fails with `InvalidSeries` if the series is empty, has a non-positive or
/// non-finite adjusted close, or dates that are not strictly increasing.
pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Result<IndicatorFrame, ScreenError> {
    series.validate()?;

    let closes = series.adj_closes();
    let short_sma = calculate_sma(&closes, params.short_sma);
    let long_sma = calculate_sma(&closes, params.long_sma);
    let macd = calculate_macd(&closes, params.fast_ema, params.slow_ema, params.signal_ema);

    let golden_cross = short_sma
        .iter()
        .zip(&long_sma)
        .map(|(short, long)| match (short, long) {
            (Some(s), Some(l)) => Some(s > l),
            _ => None,
        })
        .collect();

    let frame = IndicatorFrame {
        params: params.clone(),
        dates: series.dates(),
        daily_return: calculate_daily_returns(&closes),
        rsi: calculate_rsi(&closes, params.rsi_period),
        short_sma,
        long_sma,
        fast_ema: macd.fast_ema,
        slow_ema: macd.slow_ema,
        macd: macd.macd,
        signal_line: macd.signal,
        golden_cross,
        adj_close: closes,
    };

    debug!(bars = frame.bar_count(), "indicator frame computed");
    Ok(frame)
}

impl IndicatorFrame {
    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Number of bars; every sequence has this length.
    pub fn bar_count(&self) -> usize {
        self.dates.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn adj_close(&self) -> &[f64] {
        &self.adj_close
    }

    pub fn daily_return(&self) -> &[Option<f64>] {
        &self.daily_return
    }

    pub fn golden_cross(&self) -> &[Option<bool>] {
        &self.golden_cross
    }

    /// The numeric series behind `metric` at every position, or `None` for
    /// metrics that are not stored as a numeric column.
    pub fn column(&self, metric: Metric) -> Option<&[Option<f64>]> {
        match metric {
            Metric::DailyReturn => Some(&self.daily_return),
            Metric::ShortSma => Some(&self.short_sma),
            Metric::LongSma => Some(&self.long_sma),
            Metric::Rsi => Some(&self.rsi),
            Metric::FastEma => Some(&self.fast_ema),
            Metric::SlowEma => Some(&self.slow_ema),
            Metric::Macd => Some(&self.macd),
            Metric::SignalLine => Some(&self.signal_line),
            Metric::GoldenCross | Metric::AverageReturn | Metric::Volatility => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeriesDefect;
    use crate::fixtures::{bars_from, random_walk, series_from};

    fn col(frame: &IndicatorFrame, metric: Metric) -> &[Option<f64>] {
        frame.column(metric).unwrap()
    }

    #[test]
    fn every_sequence_matches_input_length() {
        for n in [200, 201, 317] {
            let frame = compute(&series_from(&random_walk(n, 7)), &IndicatorParams::default())
                .unwrap();
            assert_eq!(frame.bar_count(), n);
            assert_eq!(frame.adj_close().len(), n);
            assert_eq!(frame.daily_return().len(), n);
            assert_eq!(col(&frame, Metric::ShortSma).len(), n);
            assert_eq!(col(&frame, Metric::LongSma).len(), n);
            assert_eq!(col(&frame, Metric::Rsi).len(), n);
            assert_eq!(col(&frame, Metric::FastEma).len(), n);
            assert_eq!(col(&frame, Metric::SlowEma).len(), n);
            assert_eq!(col(&frame, Metric::Macd).len(), n);
            assert_eq!(col(&frame, Metric::SignalLine).len(), n);
            assert_eq!(frame.golden_cross().len(), n);
        }
    }

    #[test]
    fn single_bar_is_valid() {
        let frame = compute(&series_from(&[10.0]), &IndicatorParams::default()).unwrap();
        assert_eq!(frame.bar_count(), 1);
        assert_eq!(frame.daily_return(), &[None]);
        assert_eq!(frame.golden_cross(), &[None]);
    }

    #[test]
    fn constant_series() {
        let frame = compute(&series_from(&vec![100.0; 250]), &IndicatorParams::default())
            .unwrap();

        assert!(frame.daily_return()[0].is_none());
        assert!(frame.daily_return()[1..].iter().all(|r| *r == Some(0.0)));

        // Equal averages are not a cross: never true, undefined before the
        // long window fills.
        assert!(frame.golden_cross().iter().all(|g| *g != Some(true)));
        assert!(frame.golden_cross()[..199].iter().all(Option::is_none));

        assert!(col(&frame, Metric::Rsi).iter().flatten().all(|&v| v == 50.0));
    }

    #[test]
    fn compute_is_deterministic() {
        let series = series_from(&random_walk(300, 99));
        let params = IndicatorParams::default();
        let a = compute(&series, &params).unwrap();
        let b = compute(&series, &params).unwrap();

        let bits = |s: &[Option<f64>]| -> Vec<Option<u64>> {
            s.iter().map(|v| v.map(f64::to_bits)).collect()
        };
        assert_eq!(bits(col(&a, Metric::FastEma)), bits(col(&b, Metric::FastEma)));
        assert_eq!(bits(col(&a, Metric::SlowEma)), bits(col(&b, Metric::SlowEma)));
        assert_eq!(bits(col(&a, Metric::Macd)), bits(col(&b, Metric::Macd)));
        assert_eq!(bits(col(&a, Metric::SignalLine)), bits(col(&b, Metric::SignalLine)));
        assert_eq!(a, b);
    }

    #[test]
    fn rsi_stays_in_bounds() {
        for seed in 1..20 {
            let frame =
                compute(&series_from(&random_walk(260, seed)), &IndicatorParams::default())
                    .unwrap();
            for &v in col(&frame, Metric::Rsi).iter().flatten() {
                assert!((0.0..=100.0).contains(&v), "RSI {v} out of range (seed {seed})");
            }
        }
    }

    #[test]
    fn strictly_rising_series_has_rsi_100() {
        let closes: Vec<f64> = (0..120).map(|i| 20.0 + i as f64 * 0.25).collect();
        let frame = compute(&series_from(&closes), &IndicatorParams::default()).unwrap();
        let defined: Vec<f64> = col(&frame, Metric::Rsi).iter().flatten().copied().collect();
        assert_eq!(defined.len(), 120 - 13);
        assert!(defined.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn duplicate_date_is_invalid_series() {
        let mut bars = bars_from(&random_walk(260, 3));
        bars[130].date = bars[129].date;
        let err = compute(&PriceSeries::new(bars), &IndicatorParams::default()).unwrap_err();
        assert!(matches!(
            err,
            ScreenError::InvalidSeries(SeriesDefect::NonIncreasingDate { index: 130, .. })
        ));
    }

    #[test]
    fn empty_and_non_positive_series_are_invalid() {
        let params = IndicatorParams::default();
        assert_eq!(
            compute(&PriceSeries::default(), &params).unwrap_err(),
            ScreenError::InvalidSeries(SeriesDefect::Empty)
        );
        assert!(matches!(
            compute(&series_from(&[10.0, -1.0]), &params).unwrap_err(),
            ScreenError::InvalidSeries(SeriesDefect::NonPositivePrice { index: 1, .. })
        ));
    }

    #[test]
    fn warmups_follow_required_bars() {
        let params = IndicatorParams::default();
        let frame = compute(&series_from(&random_walk(260, 11)), &params).unwrap();
        for metric in [
            Metric::DailyReturn,
            Metric::ShortSma,
            Metric::LongSma,
            Metric::Rsi,
            Metric::FastEma,
            Metric::SlowEma,
            Metric::Macd,
            Metric::SignalLine,
        ] {
            let column = frame.column(metric).unwrap();
            let first = column.iter().position(Option::is_some).unwrap();
            assert_eq!(first + 1, params.required_bars(metric), "{metric}");
        }
        let first_cross = frame.golden_cross().iter().position(Option::is_some).unwrap();
        assert_eq!(first_cross + 1, params.required_bars(Metric::GoldenCross));
    }

    #[test]
    fn params_validation() {
        assert!(IndicatorParams::default().validate().is_ok());

        let zero = IndicatorParams { rsi_period: 0, ..IndicatorParams::default() };
        assert!(matches!(zero.validate(), Err(ScreenError::Configuration(_))));

        let inverted = IndicatorParams { fast_ema: 30, ..IndicatorParams::default() };
        assert!(inverted.validate().is_err());

        let inverted = IndicatorParams { short_sma: 200, ..IndicatorParams::default() };
        assert!(inverted.validate().is_err());

        let short = IndicatorParams { return_lookback: 1, ..IndicatorParams::default() };
        assert!(short.validate().is_err());
    }

    #[test]
    fn params_from_partial_json() {
        let params: IndicatorParams = serde_json::from_str(r#"{ "rsi_period": 21 }"#).unwrap();
        assert_eq!(params.rsi_period, 21);
        assert_eq!(params.long_sma, 200);
        assert_eq!(params.return_lookback, 60);
    }
}
