//! Finite-difference differentiation on a (possibly uneven) time base.

/// Differentiate `values` with respect to `time` using central differences.
///
/// Endpoints use one-sided differences so the output has the same length as
/// the input. Returns an empty vector when fewer than two samples exist.
pub fn differentiate(time: &[f64], values: &[f64]) -> Vec<f64> {
    let n = time.len().min(values.len());
    if n < 2 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let (j0, j1) = if i == 0 {
            (0, 1)
        } else if i == n - 1 {
            (n - 2, n - 1)
        } else {
            (i - 1, i + 1)
        };

        let dt = time[j1] - time[j0];
        if dt.abs() < 1e-15 {
            out.push(0.0);
        } else {
            out.push((values[j1] - values[j0]) / dt);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_of_linear_series_is_constant() {
        let time: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let values: Vec<f64> = time.iter().map(|&t| 3.0 * t + 1.0).collect();

        let v = differentiate(&time, &values);
        assert_eq!(v.len(), 10);
        for d in v {
            assert!((d - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn derivative_of_quadratic_is_exact_with_central_differences() {
        // Central differences are exact for quadratics on a uniform grid.
        let time: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
        let values: Vec<f64> = time.iter().map(|&t| t * t).collect();

        let v = differentiate(&time, &values);
        for (i, &t) in time.iter().enumerate().skip(1).take(18) {
            assert!((v[i] - 2.0 * t).abs() < 1e-10);
        }
    }

    #[test]
    fn too_short_series_yields_empty() {
        assert!(differentiate(&[0.0], &[1.0]).is_empty());
    }
}
