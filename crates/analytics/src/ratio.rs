//! Guarded arithmetic
//!
//! Every rate in the reports goes through these helpers. A zero (or
//! non-finite) denominator yields `None`, never a fault and never zero.

/// Divide, or `None` when the denominator is zero or the result non-finite
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

/// `round(100 * numerator / denominator, places)`, guarded
pub fn pct(numerator: f64, denominator: f64, places: u32) -> Option<f64> {
    safe_div(numerator, denominator).map(|r| round_to(100.0 * r, places))
}

/// Guarded mean of the present values
pub fn mean(values: &[f64]) -> Option<f64> {
    safe_div(values.iter().sum(), values.len() as f64)
}

/// Sample standard deviation (n - 1); `None` for fewer than two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    safe_div(ss, (values.len() - 1) as f64).map(f64::sqrt)
}
