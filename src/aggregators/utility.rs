/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let total = values.iter().sum::<f64>();
    if total.is_finite() {
        return Some(total / n);
    }
    // The plain sum overflowed; scaling first keeps it within f64 range.
    Some(values.iter().map(|v| v / n).sum())
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` at `x`.
///
/// The result is clamped to the closed interval spanned by `y0` and `y1`.
/// A non-finite endpoint yields the other endpoint, or 0.0 if neither is finite.
pub fn lerp(x0: i32, y0: f64, x1: i32, y1: f64, x: i32) -> f64 {
    match (y0.is_finite(), y1.is_finite()) {
        (true, true) => {}
        (true, false) => return y0,
        (false, true) => return y1,
        (false, false) => return 0.0,
    }

    let t = f64::from(x - x0) / f64::from(x1 - x0);
    let mut value = y0 + (y1 - y0) * t;
    if !value.is_finite() {
        // `y1 - y0` overflowed; the weighted form stays within the endpoints.
        value = y0 * (1.0 - t) + y1 * t;
    }
    value.clamp(y0.min(y1), y0.max(y1))
}
