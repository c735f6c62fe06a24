// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_t = (close_t + close_{t-1} + ... + close_{t-period+1}) / period
//
// Each window is summed directly rather than with a running sum, so a flat
// series yields exactly the flat price (no add/subtract drift).
// =============================================================================

/// Compute the SMA of `values` over `period`, one output per input.
///
/// Positions before the first full window are `None`.
///
/// # Edge cases
/// - `period == 0` => every position `None`
/// - `values.len() < period` => every position `None`
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let period_f = period as f64;
    for (offset, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period_f;
        result[offset + period - 1] = Some(mean);
    }

    result
}
