//! Descriptive statistics over plain slices.
//!
//! Conventions follow the usual dataframe defaults:
//! - standard deviation is the sample estimate (`n - 1` denominator)
//! - correlation is Pearson's r
//!
//! Degenerate inputs (too few points, constant data) return `None` rather than
//! `NaN` so callers can keep "missing" distinct from a numeric result.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    Some(x.iter().sum::<f64>() / x.len() as f64)
}

/// Sample standard deviation (`n - 1`), `None` for fewer than two points.
pub fn sample_std(x: &[f64]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let m = mean(x)?;
    let var = x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (x.len() as f64 - 1.0);
    Some(var.sqrt())
}

/// True when every value equals the first one.
///
/// Checked explicitly because the floating-point mean of identical values is
/// not always bit-identical to them, which would leave tiny nonzero deviations.
pub fn is_constant(x: &[f64]) -> bool {
    match x.first() {
        Some(first) => x.iter().all(|v| v == first),
        None => true,
    }
}

/// Pearson correlation of two equally long slices.
///
/// Returns `None` when lengths differ, fewer than two pairs exist, or either
/// side is constant. The result is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    if is_constant(x) || is_constant(y) {
        return None;
    }

    let mx = mean(x)?;
    let my = mean(y)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = sxx.sqrt() * syy.sqrt();
    if !(denom.is_finite() && denom > 0.0) {
        return None;
    }
    let r = sxy / denom;
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
