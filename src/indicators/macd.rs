// =============================================================================
// MACD (Moving Average Convergence / Divergence)
// =============================================================================
//
//   MACD_t   = EMA(fast)_t - EMA(slow)_t
//   Signal_t = EMA(signal) of the MACD series
//
// All three EMAs use the first-value seed from `ema::ema_recurrence`.  The
// signal EMA runs over the raw MACD recurrence from the first bar, so it is
// seeded with MACD_0 = 0.
//
// Visibility: MACD once the slow EMA has `slow` bars, the signal line once
// `slow + signal` bars exist.
// =============================================================================

use super::ema::{ema_recurrence, mask_warmup};

/// Dense MACD output, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub fast_ema: Vec<Option<f64>>,
    pub slow_ema: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// Compute fast/slow EMAs, MACD, and the signal line for `closes`.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_raw = ema_recurrence(closes, fast);
    let slow_raw = ema_recurrence(closes, slow);
    let macd_raw: Vec<f64> = fast_raw
        .iter()
        .zip(&slow_raw)
        .map(|(f, s)| f - s)
        .collect();
    let signal_raw = ema_recurrence(&macd_raw, signal);

    MacdSeries {
        fast_ema: mask_warmup(&fast_raw, fast),
        slow_ema: mask_warmup(&slow_raw, slow),
        macd: mask_warmup(&macd_raw, slow.max(fast)),
        signal: mask_warmup(&signal_raw, slow.max(fast) + signal),
    }
}
