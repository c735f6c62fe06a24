// =============================================================================
// Screening Engine — last-row verdict for one indicator frame
// =============================================================================
//
// Pipeline:
//   1. Require every indicator at the last row (first gap => InsufficientHistory)
//   2. Average return and volatility over the trailing return window
//   3. Apply every rule; all failures are collected, not short-circuited
//   4. Emit the verdict with the metric snapshot that decided it
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::RuleSet;
use crate::error::ScreenError;
use crate::indicators::returns::{mean, sample_std_dev, trailing_defined};
use crate::indicators::IndicatorFrame;
use crate::types::{Metric, Verdict};

/// Values at the last bar that the verdict was decided on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Date of the last bar.
    pub as_of: NaiveDate,
    pub avg_return: f64,
    pub current_price: f64,
    pub short_sma: f64,
    pub long_sma: f64,
    pub volatility: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal_line: f64,
    pub golden_cross: bool,
}

/// Verdict for one ticker plus the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub verdict: Verdict,
    pub metrics: MetricSnapshot,
    /// One line per failed rule; empty when the verdict is `Pass`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl ScreeningResult {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

pub struct ScreeningEngine {
    rules: RuleSet,
}

impl ScreeningEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Evaluate the last row of `frame` against the rule set.
    ///
    /// Fails with `InsufficientHistory` naming the first indicator (or the
    /// trailing return window) that is undefined at the last position.  A
    /// rejected ticker is an `Ok` result with a `Fail` verdict.
    pub fn evaluate(&self, frame: &IndicatorFrame) -> Result<ScreeningResult, ScreenError> {
        let params = frame.params();
        let available = frame.bar_count();
        let insufficient = |metric: Metric| ScreenError::InsufficientHistory {
            metric,
            required: params.required_bars(metric),
            available,
        };
        let latest = |metric: Metric| -> Result<f64, ScreenError> {
            frame
                .column(metric)
                .and_then(|column| column.last().copied().flatten())
                .ok_or_else(|| insufficient(metric))
        };

        // ── 1. Last-row indicators ───────────────────────────────────────
        let short_sma = latest(Metric::ShortSma)?;
        let long_sma = latest(Metric::LongSma)?;
        let rsi = latest(Metric::Rsi)?;
        // The EMAs are only required, not reported.
        latest(Metric::FastEma)?;
        latest(Metric::SlowEma)?;
        let macd = latest(Metric::Macd)?;
        let signal_line = latest(Metric::SignalLine)?;
        let golden_cross = frame
            .golden_cross()
            .last()
            .copied()
            .flatten()
            .ok_or_else(|| insufficient(Metric::GoldenCross))?;

        // ── 2. Trailing return statistics ────────────────────────────────
        let window = trailing_defined(frame.daily_return(), params.return_lookback)
            .ok_or_else(|| insufficient(Metric::AverageReturn))?;
        let avg_return = mean(&window).ok_or_else(|| insufficient(Metric::AverageReturn))?;
        let volatility =
            sample_std_dev(&window).ok_or_else(|| insufficient(Metric::Volatility))?;

        let current_price = frame
            .adj_close()
            .last()
            .copied()
            .ok_or_else(|| insufficient(Metric::DailyReturn))?;
        let as_of = frame
            .dates()
            .last()
            .copied()
            .ok_or_else(|| insufficient(Metric::DailyReturn))?;

        let metrics = MetricSnapshot {
            as_of,
            avg_return,
            current_price,
            short_sma,
            long_sma,
            volatility,
            rsi,
            macd,
            signal_line,
            golden_cross,
        };

        // ── 3. Rules ─────────────────────────────────────────────────────
        let failures = failed_rules(&self.rules, &metrics);

        // ── 4. Verdict ───────────────────────────────────────────────────
        let verdict = if failures.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        debug!(
            %verdict,
            avg_return,
            volatility,
            rsi,
            failed_rules = failures.len(),
            "screen evaluated"
        );

        Ok(ScreeningResult {
            verdict,
            metrics,
            failures,
        })
    }
}

/// Every rule `m` breaks, in rule order.  The caps and the price and MACD
/// comparisons are strict, so a value equal to its threshold fails.
fn failed_rules(rules: &RuleSet, m: &MetricSnapshot) -> Vec<String> {
    let mut failures = Vec::new();

    if !rules.min_avg_return.admits(m.avg_return) {
        failures.push(format!(
            "average return {:.4} is not {}",
            m.avg_return, rules.min_avg_return
        ));
    }
    if m.current_price <= m.long_sma {
        failures.push(format!(
            "price {:.2} is not above long SMA {:.2}",
            m.current_price, m.long_sma
        ));
    }
    if let Some(cap) = rules.max_volatility {
        if m.volatility >= cap {
            failures.push(format!("volatility {:.4} is not below {cap:.4}", m.volatility));
        }
    }
    if let Some(cap) = rules.max_rsi {
        if m.rsi >= cap {
            failures.push(format!("RSI {:.2} is not below {cap:.2}", m.rsi));
        }
    }
    if rules.require_macd_cross && m.macd <= m.signal_line {
        failures.push(format!(
            "MACD {:.4} is not above signal line {:.4}",
            m.macd, m.signal_line
        ));
    }
    if rules.require_golden_cross && !m.golden_cross {
        failures.push("no golden cross".to_string());
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{declining_series, rising_series, series_from};
    use crate::indicators::{compute, IndicatorParams};
    use crate::screening::rules::ReturnFloor;

    fn frame_of(series: &crate::market_data::PriceSeries) -> IndicatorFrame {
        compute(series, &IndicatorParams::default()).unwrap()
    }

    #[test]
    fn rising_series_indicators() {
        let frame = frame_of(&rising_series(260));
        let result = ScreeningEngine::new(RuleSet::trend()).evaluate(&frame).unwrap();
        let m = &result.metrics;

        assert!(m.golden_cross);
        assert!(m.rsi > 80.0 && m.rsi < 100.0, "rsi {}", m.rsi);
        assert!(m.macd > m.signal_line, "macd {} signal {}", m.macd, m.signal_line);
        assert!(m.current_price > m.long_sma);
        assert!(m.avg_return > 0.0 && m.avg_return < 0.003);
        assert!(m.volatility < 0.01);
        assert_eq!(result.verdict, Verdict::Pass);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn rising_series_passes_every_gate_with_matching_thresholds() {
        let rules = RuleSet {
            min_avg_return: ReturnFloor::AtLeast(0.001),
            max_rsi: Some(95.0),
            ..RuleSet::strict()
        };
        let result = ScreeningEngine::new(rules)
            .evaluate(&frame_of(&rising_series(260)))
            .unwrap();
        assert!(result.passed(), "failures: {:?}", result.failures);
    }

    #[test]
    fn strict_defaults_reject_a_gentle_rise() {
        // 50% over a year is ~0.16% a day, far below the 3% daily floor, and
        // the near-monotonic climb reads as overbought.
        let result = ScreeningEngine::new(RuleSet::strict())
            .evaluate(&frame_of(&rising_series(260)))
            .unwrap();
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(result.failures.len(), 2, "{:?}", result.failures);
        assert!(result.failures[0].starts_with("average return"));
        assert!(result.failures[1].starts_with("RSI"));
    }

    #[test]
    fn thresholds_are_exclusive_at_equality() {
        let base = MetricSnapshot {
            as_of: NaiveDate::from_ymd_opt(2022, 12, 30).unwrap(),
            avg_return: 0.05,
            current_price: 110.0,
            short_sma: 105.0,
            long_sma: 100.0,
            volatility: 0.01,
            rsi: 50.0,
            macd: 1.0,
            signal_line: 0.5,
            golden_cross: true,
        };
        assert!(failed_rules(&RuleSet::strict(), &base).is_empty());

        let cases: [(&str, MetricSnapshot, Option<&str>); 7] = [
            ("volatility at cap", MetricSnapshot { volatility: 0.02, ..base.clone() }, Some("volatility")),
            ("rsi at cap", MetricSnapshot { rsi: 70.0, ..base.clone() }, Some("RSI")),
            ("macd on signal", MetricSnapshot { macd: 0.5, ..base.clone() }, Some("MACD")),
            ("price on long sma", MetricSnapshot { current_price: 100.0, ..base.clone() }, Some("price")),
            ("no golden cross", MetricSnapshot { golden_cross: false, ..base.clone() }, Some("no golden cross")),
            ("return at inclusive floor", MetricSnapshot { avg_return: 0.03, ..base.clone() }, None),
            ("just under rsi cap", MetricSnapshot { rsi: 69.99, ..base.clone() }, None),
        ];

        for (name, metrics, expected) in cases {
            let failures = failed_rules(&RuleSet::strict(), &metrics);
            match expected {
                Some(prefix) => {
                    assert_eq!(failures.len(), 1, "{name}: {failures:?}");
                    assert!(failures[0].starts_with(prefix), "{name}: {failures:?}");
                }
                None => assert!(failures.is_empty(), "{name}: {failures:?}"),
            }
        }

        // The trend floor is strict: a zero average return fails.
        let flat = MetricSnapshot { avg_return: 0.0, ..base };
        let failures = failed_rules(&RuleSet::trend(), &flat);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].starts_with("average return"));
    }

    #[test]
    fn snapshot_dated_at_last_bar() {
        let series = rising_series(260);
        let frame = frame_of(&series);
        let result = ScreeningEngine::new(RuleSet::trend()).evaluate(&frame).unwrap();
        assert_eq!(Some(&result.metrics.as_of), series.dates().last());
    }

    #[test]
    fn declining_series_fails_trend() {
        let result = ScreeningEngine::new(RuleSet::trend())
            .evaluate(&frame_of(&declining_series(260)))
            .unwrap();
        assert_eq!(result.verdict, Verdict::Fail);
        assert!(result.metrics.avg_return < 0.0);
        assert!(!result.metrics.golden_cross);
        assert_eq!(result.failures.len(), 2);
    }

    #[test]
    fn flat_return_fails_strictly_positive_floor() {
        let frame = frame_of(&series_from(&vec![100.0; 260]));
        let result = ScreeningEngine::new(RuleSet::trend()).evaluate(&frame).unwrap();
        assert_eq!(result.metrics.avg_return, 0.0);
        assert_eq!(result.metrics.volatility, 0.0);
        assert!(!result.passed());
    }

    #[test]
    fn long_sma_window_boundary() {
        let engine = ScreeningEngine::new(RuleSet::trend());

        let err = engine.evaluate(&frame_of(&rising_series(199))).unwrap_err();
        assert_eq!(
            err,
            ScreenError::InsufficientHistory {
                metric: Metric::LongSma,
                required: 200,
                available: 199,
            }
        );

        assert!(engine.evaluate(&frame_of(&rising_series(200))).is_ok());
    }

    #[test]
    fn short_history_names_first_missing_indicator() {
        let engine = ScreeningEngine::new(RuleSet::strict());
        let err = engine.evaluate(&frame_of(&rising_series(20))).unwrap_err();
        assert!(matches!(
            err,
            ScreenError::InsufficientHistory { metric: Metric::ShortSma, .. }
        ));
    }

    #[test]
    fn return_window_longer_than_history() {
        let params = IndicatorParams {
            return_lookback: 250,
            ..IndicatorParams::default()
        };
        let frame = compute(&rising_series(220), &params).unwrap();
        let err = ScreeningEngine::new(RuleSet::trend()).evaluate(&frame).unwrap_err();
        assert_eq!(
            err,
            ScreenError::InsufficientHistory {
                metric: Metric::AverageReturn,
                required: 251,
                available: 220,
            }
        );
    }
}
