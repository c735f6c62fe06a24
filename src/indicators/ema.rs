// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = value_0
//   EMA_t  = alpha * value_t + (1 - alpha) * EMA_{t-1}
//
// The recurrence is seeded with the first observed value, not with an SMA of
// a warm-up window.  EMA has infinite memory, so the seed fixes every later
// value (and with it every MACD / signal value downstream).
// =============================================================================

/// Run the EMA recurrence over `values`, seeded with `values[0]`.
///
/// Returns one value per input; empty input gives an empty vec.
/// `span == 0` is treated as `alpha = 2`, so callers validate the span first.
pub fn ema_recurrence(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    result.push(seed);

    let mut prev = seed;
    for &value in &values[1..] {
        let ema = alpha * value + (1.0 - alpha) * prev;
        result.push(ema);
        prev = ema;
    }

    result
}

/// Hide the first `required_bars - 1` positions of a fully computed series.
pub(crate) fn mask_warmup(values: &[f64], required_bars: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i + 1 >= required_bars).then_some(v))
        .collect()
}
