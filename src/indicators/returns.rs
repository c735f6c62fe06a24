// =============================================================================
// Daily returns and trailing return statistics
// =============================================================================
//
//   return_t     = (close_t - close_{t-1}) / close_{t-1}
//   average      = mean of the trailing N returns
//   volatility   = sample standard deviation (n - 1) of the trailing N returns
// =============================================================================

/// Percentage change between consecutive closes, one output per input.
///
/// The first position has no predecessor and is `None`.  A zero previous
/// close also yields `None` (validated series never contain one).
pub fn calculate_daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return result;
    }

    result.push(None);
    for w in closes.windows(2) {
        let prev = w[0];
        let ret = (prev != 0.0).then(|| (w[1] - prev) / prev);
        result.push(ret);
    }

    result
}

/// The last `n` values of `series`, or `None` if there are fewer than `n`
/// positions or any of them is undefined.
pub fn trailing_defined(series: &[Option<f64>], n: usize) -> Option<Vec<f64>> {
    if n == 0 || series.len() < n {
        return None;
    }
    series[series.len() - n..].iter().copied().collect()
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (Bessel-corrected); `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    let std_dev = variance.sqrt();
    std_dev.is_finite().then_some(std_dev)
}
