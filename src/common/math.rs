//! Series math shared by the indicators.
//!
//! Series helpers return a vector aligned with the input: positions before the
//! warm-up are `NaN`. Non-finite inputs are never filtered, so a zero
//! denominator surfaces as `NaN`/`inf` in the output.

/// Arithmetic mean. `NaN` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Population standard deviation (divides by `n`).
pub fn population_std(values: impl IntoIterator<Item = f64> + Clone) -> f64 {
    let m = mean(values.clone());
    let variance = mean(values.into_iter().map(|v| (v - m).powi(2)));
    variance.sqrt()
}

/// Sample standard deviation (divides by `n - 1`). `NaN` below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values.iter().copied());
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Linearly weighted mean of a window, the newest value weighing `len`.
pub fn weighted_mean(window: &[f64]) -> f64 {
    if window.is_empty() {
        return f64::NAN;
    }
    let n = window.len() as f64;
    let denominator = n * (n + 1.0) / 2.0;
    window
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum::<f64>()
        / denominator
}

/// Rolling simple moving average.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| mean(w.iter().copied()))
}

/// Rolling weighted moving average.
pub fn wma_series(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, weighted_mean)
}

/// Rolling sample standard deviation.
pub fn rolling_std_series(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, sample_std)
}

/// Span-based EMA (`alpha = 2 / (period + 1)`), seeded with the first
/// non-`NaN` value.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev: Option<f64> = None;
    for (i, &v) in values.iter().enumerate() {
        let next = match prev {
            None if v.is_nan() => continue,
            None => v,
            Some(p) => ema_step(v, p, alpha),
        };
        out[i] = next;
        prev = Some(next);
    }
    out
}

/// One EMA update.
pub fn ema_step(value: f64, previous: f64, alpha: f64) -> f64 {
    alpha * value + (1.0 - alpha) * previous
}

/// Relative Strength Index from rolling means of gains and losses.
///
/// The first delta counts as zero movement. A window without losses yields
/// `100` when it has gains and `NaN` when it is flat.
pub fn rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let delta = if i == 0 { 0.0 } else { values[i] - values[i - 1] };
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }
    let avg_gain = sma_series(&gains, period);
    let avg_loss = sma_series(&losses, period);
    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| 100.0 - 100.0 / (1.0 + g / l))
        .collect()
}

/// Period-over-period percentage change; the first entry is `NaN`.
pub fn pct_returns(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 {
            out.push(f64::NAN);
        } else {
            out.push(values[i] / values[i - 1] - 1.0);
        }
    }
    out
}

/// Pearson correlation of two equally long samples, clamped to `[-1, 1]`.
///
/// `NaN` when either side has zero variance, contains `NaN`, or the inputs
/// differ in length.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let mx = mean(xs.iter().copied());
    let my = mean(ys.iter().copied());
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// True range of a bar against the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Last value of a series, `NaN` when empty.
pub fn last(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or(f64::NAN)
}

fn rolling(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for end in period..=values.len() {
        out[end - 1] = f(&values[end - period..end]);
    }
    out
}
