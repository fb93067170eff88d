//! Series math shared by the indicators.
//!
//! Every function takes an oldest-first slice and returns a series aligned to
//! the *end* of the input, or `None` when the input is shorter than the
//! warm-up (or the period is zero). A returned series is never partial.

/// Simple rolling mean. Output length is `values.len() - period + 1`.
pub fn sma_series(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }

    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    out.push(sum / period as f64);

    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out.push(sum / period as f64);
    }

    Some(out)
}

/// Mean of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Multiplier applied to the newest value: `2 / (period + 1)`.
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    (value - previous) * ema_multiplier(period) + previous
}

/// Exponential moving average seeded with the SMA of the first `period`
/// values. Output length is `values.len() - period + 1`.
pub fn ema_series(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        prev = ema_from_previous(value, prev, period);
        out.push(prev);
    }

    Some(out)
}

/// Latest EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period)?.last().copied()
}

/// Wilder smoothing step: `(prev * (period - 1) + value) / period`.
pub fn wilder_step(previous: f64, value: f64, period: usize) -> f64 {
    (previous * (period as f64 - 1.0) + value) / period as f64
}

/// Wilder-smoothed series seeded with the mean of the first `period` values.
/// Output length is `values.len() - period + 1`.
pub fn wilder_series(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        prev = wilder_step(prev, value, period);
        out.push(prev);
    }

    Some(out)
}

/// TR = max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// True range per bar. The first bar has no prior close and uses its own
/// high - low. Output length equals the input length.
pub fn true_range_series(high: &[f64], low: &[f64], close: &[f64]) -> Option<Vec<f64>> {
    let len = high.len();
    if len == 0 || low.len() != len || close.len() != len {
        return None;
    }

    let mut out = Vec::with_capacity(len);
    out.push(high[0] - low[0]);
    for i in 1..len {
        out.push(true_range(high[i], low[i], close[i - 1]));
    }
    Some(out)
}

/// Trailing maximum per window end. Output length is `values.len() - period + 1`.
pub fn rolling_max(values: &[f64], period: usize) -> Option<Vec<f64>> {
    rolling_fold(values, period, f64::max)
}

/// Trailing minimum per window end. Output length is `values.len() - period + 1`.
pub fn rolling_min(values: &[f64], period: usize) -> Option<Vec<f64>> {
    rolling_fold(values, period, f64::min)
}

fn rolling_fold(values: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }

    Some(
        values
            .windows(period)
            .map(|window| window.iter().copied().fold(window[0], pick))
            .collect(),
    )
}
