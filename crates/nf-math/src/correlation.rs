//! Pearson product-moment correlation.

/// Pearson correlation over `(x, y)` pairs.
///
/// Uses population moments: covariance over the product of standard
/// deviations. Returns `None` for fewer than two pairs, when either side has
/// zero variance, or when the inputs produce a non-finite result. The
/// coefficient is clamped to `[-1, 1]` to absorb rounding.
///
/// Zero variance is decided on the samples themselves: a side whose values
/// are all equal is constant even when its rounded mean is not exact.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let (x0, y0) = pairs[0];
    if pairs.iter().all(|p| p.0 == x0) || pairs.iter().all(|p| p.1 == y0) {
        return None;
    }

    let nf = n as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if !r.is_finite() {
        return None;
    }
    Some(r.clamp(-1.0, 1.0))
}
