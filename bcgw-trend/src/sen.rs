//! Sen's slope estimator with its rank-based confidence interval.

use bcgw_utils::stats::median;

/// Two-sided 95% standard normal quantile.
pub const Z_975: f64 = 1.959_963_984_540_054;

/// Slopes between every pair of points with distinct times, sorted.
pub fn pairwise_slopes(times: &[f64], values: &[f64]) -> Vec<f64> {
    let mut slopes = Vec::new();
    for i in 0..times.len() {
        for j in i + 1..times.len() {
            let dt = times[j] - times[i];
            if dt != 0.0 {
                slopes.push((values[j] - values[i]) / dt);
            }
        }
    }
    slopes.sort_by(|a, b| a.total_cmp(b));
    slopes
}

/// Median of the pairwise slopes.
pub fn sen_slope(times: &[f64], values: &[f64]) -> Option<f64> {
    median(&pairwise_slopes(times, values))
}

/// Median of `value - slope * time`, the line through the centre of the data.
pub fn sen_intercept(times: &[f64], values: &[f64], slope: f64) -> Option<f64> {
    let residuals: Vec<f64> = times
        .iter()
        .zip(values)
        .map(|(t, y)| y - slope * t)
        .collect();
    median(&residuals)
}

/// 95% confidence bounds on the slope from sorted pairwise slopes and the
/// Mann-Kendall variance of the same series.
pub fn confidence_bounds(sorted_slopes: &[f64], var_s: f64) -> Option<(f64, f64)> {
    let n = sorted_slopes.len();
    if n == 0 || var_s <= 0.0 {
        return None;
    }
    let c = Z_975 * var_s.sqrt();
    let lower = ((n as f64 - c) / 2.0).round();
    let upper = ((n as f64 + c) / 2.0).round() + 1.0;
    let index = |rank: f64| (rank.clamp(1.0, n as f64) as usize) - 1;
    Some((sorted_slopes[index(lower)], sorted_slopes[index(upper)]))
}

/// Ordinary least squares slope.
pub fn linear_slope(times: &[f64], values: &[f64]) -> Option<f64> {
    let n = times.len();
    if n < 2 {
        return None;
    }
    let t_mean = times.iter().sum::<f64>() / n as f64;
    let y_mean = values.iter().sum::<f64>() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (t, y) in times.iter().zip(values) {
        sxy += (t - t_mean) * (y - y_mean);
        sxx += (t - t_mean).powi(2);
    }
    (sxx > 0.0).then(|| sxy / sxx)
}

/// Lag-1 sample autocorrelation. A constant series has none.
pub fn lag1_autocorrelation(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let denominator: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    if denominator <= f64::EPSILON {
        return 0.0;
    }
    let numerator: f64 = values
        .windows(2)
        .map(|w| (w[0] - mean) * (w[1] - mean))
        .sum();
    numerator / denominator
}
