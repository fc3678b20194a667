use crate::PmError;

/// Floating point type used throughout system
pub type Real = f64;

/// Smallest site fraction a sampled or gridded point may carry.
///
/// Exact zeros put `x ln x` terms and facet solves on the simplex edge, so
/// grids clamp below this value.
pub const MIN_SITE_FRACTION: Real = 1e-12;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PmError::NonFinite { what, value: v })
    }
}

/// Accept `v` only if it is a valid mole or site fraction.
pub fn ensure_fraction(v: Real, what: &'static str) -> Result<Real, PmError> {
    ensure_finite(v, what)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(PmError::NotAFraction { what, value: v })
    }
}

/// `n` evenly spaced values from `start` to `stop`, both included.
pub fn linspace(start: Real, stop: Real, n: usize) -> Result<Vec<Real>, PmError> {
    ensure_finite(start, "linspace start")?;
    ensure_finite(stop, "linspace stop")?;
    match n {
        0 => Err(PmError::InvalidArg {
            what: "linspace needs at least one point",
        }),
        1 => Ok(vec![start]),
        _ => {
            let delta = (stop - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            // Ensure exact endpoint
            points[n - 1] = stop;
            Ok(points)
        }
    }
}

/// Largest element-wise absolute difference over the common prefix of two slices.
pub fn max_abs_diff(a: &[Real], b: &[Real]) -> Real {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, Real::max)
}

/// Scale `values` in place so they sum to one.
pub fn normalize(values: &mut [Real]) -> Result<(), PmError> {
    let sum: Real = values.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(PmError::Invariant {
            what: "cannot normalize values with a non-positive sum",
        });
    }
    values.iter_mut().for_each(|v| *v /= sum);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("not finite"));
    }

    #[test]
    fn ensure_fraction_bounds() {
        assert_eq!(ensure_fraction(0.0, "x").unwrap(), 0.0);
        assert_eq!(ensure_fraction(1.0, "x").unwrap(), 1.0);
        assert!(matches!(
            ensure_fraction(1.01, "x"),
            Err(PmError::NotAFraction { .. })
        ));
        assert!(matches!(
            ensure_fraction(Real::NAN, "x"),
            Err(PmError::NonFinite { .. })
        ));
    }

    #[test]
    fn linspace_hits_both_ends() {
        let points = linspace(0.0, 1.0, 5).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], 0.0);
        assert!((points[2] - 0.5).abs() < 1e-15);
        assert_eq!(points[4], 1.0);
        assert_eq!(linspace(0.3, 0.7, 1).unwrap(), vec![0.3]);
        assert!(linspace(0.0, 1.0, 0).is_err());
    }

    #[test]
    fn max_abs_diff_uses_common_prefix() {
        assert!((max_abs_diff(&[0.1, 0.9], &[0.4, 0.8, 7.0]) - 0.3).abs() < 1e-12);
        assert_eq!(max_abs_diff(&[], &[1.0]), 0.0);
    }

    #[test]
    fn normalize_rejects_zero_sum() {
        let mut v = [2.0, 6.0];
        normalize(&mut v).unwrap();
        assert_eq!(v, [0.25, 0.75]);
        assert!(normalize(&mut [0.0, 0.0]).is_err());
    }
}
