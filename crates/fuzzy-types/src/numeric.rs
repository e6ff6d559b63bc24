// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Scalar Comparison and Parsing Helpers
// ─────────────────────────────────────────────────────────────────────
//! Epsilon-tolerant scalar comparisons used by the membership math.
//!
//! Boundary tests on membership vertices run on values produced by
//! scaling factors, so exact float comparison would flicker between
//! neighbouring branches. Every ordering here treats values closer than
//! [`EPS`] as equal. NaN never compares equal to anything, itself
//! included.

use crate::error::{FuzzyError, FuzzyResult};

/// Comparison tolerance.
pub const EPS: f64 = 1e-7;

#[inline]
pub fn is_equal(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() < EPS
}

#[inline]
pub fn is_greater_than(a: f64, b: f64) -> bool {
    !is_equal(a, b) && a > b
}

#[inline]
pub fn is_less_than(a: f64, b: f64) -> bool {
    !is_equal(a, b) && a < b
}

#[inline]
pub fn is_less_or_equal(a: f64, b: f64) -> bool {
    is_equal(a, b) || a < b
}

/// Minimum that ignores a NaN operand.
#[inline]
pub fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        return b;
    }
    if b.is_nan() {
        return a;
    }
    if a < b {
        a
    } else {
        b
    }
}

/// Maximum that ignores a NaN operand.
#[inline]
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        return b;
    }
    if b.is_nan() {
        return a;
    }
    if a > b {
        a
    } else {
        b
    }
}

/// Sign with an [`EPS`] dead-band around zero.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x >= EPS {
        1.0
    } else if x <= -EPS {
        -1.0
    } else {
        0.0
    }
}

/// Clamp into `[-bound, bound]`, mapping NaN to 0.
#[inline]
pub fn clamp_symmetric(value: f64, bound: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_symmetric: NaN detected, clamping to 0");
        return 0.0;
    }
    let bound = bound.abs();
    if bound.is_nan() {
        return value;
    }
    value.clamp(-bound, bound)
}

/// Parse a scalar, accepting `nan`, `inf`, `+inf` and `-inf`.
pub fn to_scalar(text: &str) -> FuzzyResult<f64> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "nan" => return Ok(f64::NAN),
        "inf" | "+inf" => return Ok(f64::INFINITY),
        "-inf" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FuzzyError::Parse(format!("'{text}' is not a scalar")))
}

/// Inverse of [`to_scalar`] for the non-finite spellings.
pub fn scalar_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_within_eps() {
        assert!(is_equal(1.0, 1.0 + 1e-8));
        assert!(!is_equal(1.0, 1.0 + 1e-6));
    }

    #[test]
    fn test_nan_never_equal() {
        assert!(!is_equal(f64::NAN, f64::NAN));
        assert!(!is_equal(f64::NAN, 0.0));
        assert!(!is_less_or_equal(f64::NAN, 1.0));
    }

    #[test]
    fn test_infinities_equal_themselves() {
        assert!(is_equal(f64::INFINITY, f64::INFINITY));
        assert!(is_less_than(f64::NEG_INFINITY, -3.0));
        assert!(is_greater_than(f64::INFINITY, 3.0));
    }

    #[test]
    fn test_strict_orderings_exclude_near_values() {
        assert!(!is_less_than(2.0 - 1e-9, 2.0));
        assert!(!is_greater_than(2.0 + 1e-9, 2.0));
        assert!(is_less_or_equal(2.0 + 1e-9, 2.0));
    }

    #[test]
    fn test_nan_min_max() {
        assert_eq!(nan_min(f64::NAN, 2.0), 2.0);
        assert_eq!(nan_max(3.0, f64::NAN), 3.0);
        assert_eq!(nan_min(1.0, 2.0), 1.0);
        assert_eq!(nan_max(1.0, 2.0), 2.0);
    }

    #[test]
    fn test_sign_dead_band() {
        assert_eq!(sign(5.0), 1.0);
        assert_eq!(sign(-0.5), -1.0);
        assert_eq!(sign(1e-9), 0.0);
    }

    #[test]
    fn test_clamp_symmetric() {
        assert_eq!(clamp_symmetric(80.0, 60.0), 60.0);
        assert_eq!(clamp_symmetric(-80.0, 60.0), -60.0);
        assert_eq!(clamp_symmetric(12.0, -60.0), 12.0);
        assert_eq!(clamp_symmetric(f64::NAN, 60.0), 0.0);
    }

    #[test]
    fn test_to_scalar() {
        assert_eq!(to_scalar(" -2.5 ").unwrap(), -2.5);
        assert_eq!(to_scalar("inf").unwrap(), f64::INFINITY);
        assert_eq!(to_scalar("-INF").unwrap(), f64::NEG_INFINITY);
        assert!(to_scalar("nan").unwrap().is_nan());
        assert!(matches!(to_scalar("1.0x"), Err(FuzzyError::Parse(_))));
        assert!(to_scalar("").is_err());
    }

    #[test]
    fn test_scalar_text_round_trip() {
        for v in [f64::INFINITY, f64::NEG_INFINITY] {
            let text = scalar_text(v).unwrap();
            assert_eq!(to_scalar(text).unwrap(), v);
        }
        assert_eq!(scalar_text(1.5), None);
    }
}
