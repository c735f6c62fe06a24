// =============================================================================
// Relative Strength Index (RSI) — simple-average variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: delta_t = close_t - close_{t-1}; the first bar has no predecessor
//          and counts as zero movement.
// Step 2: gain_t = max(delta_t, 0), loss_t = max(-delta_t, 0).
// Step 3: avg_gain / avg_loss are plain means over the trailing `period`
//          bars (no Wilder smoothing).
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Because the first bar contributes a zero delta, the first RSI value is
// available once `period` bars exist.
// =============================================================================

/// Compute the dense RSI series for `closes` over `period`.
///
/// Positions before the first full window are `None`.
///
/// # Edge cases
/// - `period == 0` => every position `None`
/// - Average loss zero with some gain => 100.0
/// - No movement at all in the window => 50.0
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return result;
    }

    // --- Gains and losses, index-aligned with closes -------------------------
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    // Window sums are taken directly so that a window of non-negative terms
    // never goes negative through cancellation.
    let period_f = period as f64;
    for end in period - 1..closes.len() {
        let start = end + 1 - period;
        let avg_gain = gains[start..=end].iter().sum::<f64>() / period_f;
        let avg_loss = losses[start..=end].iter().sum::<f64>() / period_f;
        result[end] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

/// Human-readable zone for an RSI reading.
pub fn rsi_zone(value: f64) -> &'static str {
    if value >= 70.0 {
        "OVERBOUGHT"
    } else if value <= 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement).
/// - If average loss is zero (only gains), RSI is 100.0.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
