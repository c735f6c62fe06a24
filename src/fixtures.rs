// =============================================================================
// Test fixtures — deterministic price series
// =============================================================================

use chrono::NaiveDate;

use crate::market_data::bar::Bar;
use crate::market_data::PriceSeries;

/// A bar whose OHLC fields all equal the adjusted close.
pub fn bar(date: NaiveDate, adj_close: f64) -> Bar {
    Bar {
        date,
        open: adj_close,
        high: adj_close,
        low: adj_close,
        close: adj_close,
        adj_close,
        volume: 0.0,
    }
}

/// One bar per close on consecutive calendar days starting 2021-01-01.
pub fn bars_from(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| bar(start + chrono::Days::new(i as u64), c))
        .collect()
}

pub fn series_from(closes: &[f64]) -> PriceSeries {
    bars_from(closes).into()
}

/// Geometric path from `from` to `to` over `n` bars.
pub fn geometric_closes(n: usize, from: f64, to: f64) -> Vec<f64> {
    let steps = (n.max(2) - 1) as f64;
    (0..n)
        .map(|i| from * (to / from).powf(i as f64 / steps))
        .collect()
}

/// Steady rise from 100 to 150 with ±0.1% alternating noise.  The noise
/// makes every other day a small down day, and the last bar is an up day.
pub fn rising_closes(n: usize) -> Vec<f64> {
    geometric_closes(n, 100.0, 150.0)
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let sign = if (n - 1 - i) % 2 == 0 { 1.0 } else { -1.0 };
            p * (1.0 + 0.001 * sign)
        })
        .collect()
}

pub fn rising_series(n: usize) -> PriceSeries {
    series_from(&rising_closes(n))
}

/// Smooth decline from 100 to 80.
pub fn declining_series(n: usize) -> PriceSeries {
    series_from(&geometric_closes(n, 100.0, 80.0))
}

/// Multiplicative random walk with steps of up to ±3%.
pub fn random_walk(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut price = 50.0;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let step = ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0;
            price *= 1.0 + 0.03 * step;
            price
        })
        .collect()
}
