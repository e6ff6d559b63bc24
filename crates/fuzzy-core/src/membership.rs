// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Membership Functions
// ─────────────────────────────────────────────────────────────────────
//! Parametric membership functions and per-term range bookkeeping.
//!
//! One `Membership` describes every linguistic term of a single control
//! variable. All terms share a shape; the flat parameter array is cut
//! into groups of `shape.arity()` values, lowest term first.
//!
//! - Triangle `(a, b, c)`: support `[a, c]`, peak at `b`.
//! - Trapezoid `(a, b, c, d)`: support `[a, d]`, plateau on `[b, c]`.
//! - Gaussian `(mean, sd)`: unbounded, bookkept over `mean ± 3sd`.
//!
//! An infinite outer vertex (`a = -inf` or `c`/`d = +inf`) turns the
//! term into an open shoulder that saturates at `height`.

use serde::{Deserialize, Serialize};

use fuzzy_types::numeric::{
    is_equal, is_greater_than, is_less_or_equal, is_less_than, nan_max, nan_min, EPS,
};
use fuzzy_types::{FuzzyError, FuzzyResult, MembershipType};

/// Support interval of one term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub minimum: f64,
    pub maximum: f64,
}

impl Range {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    pub fn width(&self) -> f64 {
        self.maximum - self.minimum
    }

    pub fn is_finite(&self) -> bool {
        self.minimum.is_finite() && self.maximum.is_finite()
    }
}

#[inline]
fn ramp(ratio: f64) -> f64 {
    ratio.clamp(0.0, 1.0)
}

/// Membership functions of one control variable.
#[derive(Debug, Clone)]
pub struct Membership {
    height: f64,
    shape: MembershipType,
    params: Vec<Vec<f64>>,
    ranges: Vec<Range>,
    minimum: f64,
    maximum: f64,
    // Extent of the finite vertices; bounds integration of open shoulders.
    extent: Range,
}

impl Default for Membership {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Membership {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            shape: MembershipType::None,
            params: Vec::new(),
            ranges: Vec::new(),
            minimum: f64::MAX,
            maximum: f64::MIN,
            extent: Range::new(0.0, 0.0),
        }
    }

    /// Replace all terms with the groups of `params`.
    ///
    /// On error the previous terms are kept.
    pub fn set_params(&mut self, shape: MembershipType, params: &[f64]) -> FuzzyResult<()> {
        if !shape.is_set() {
            return Err(FuzzyError::UnsetMembership);
        }
        let arity = shape.arity();
        if params.is_empty() {
            return Err(FuzzyError::Config(
                "membership needs at least one term".to_string(),
            ));
        }
        if params.len() % arity != 0 {
            return Err(FuzzyError::ParamCount {
                shape,
                count: params.len(),
                arity,
            });
        }

        let groups: Vec<Vec<f64>> = params.chunks(arity).map(<[f64]>::to_vec).collect();
        for (term, group) in groups.iter().enumerate() {
            validate_term(shape, term, group)?;
        }
        let ranges: Vec<Range> = groups.iter().map(|g| term_range(shape, g)).collect();

        let minimum = ranges.iter().map(|r| r.minimum).fold(f64::MAX, nan_min);
        let maximum = ranges.iter().map(|r| r.maximum).fold(f64::MIN, nan_max);

        let (lo, hi) = groups
            .iter()
            .zip(&ranges)
            .flat_map(|(g, r)| match shape {
                MembershipType::Gaussian => vec![r.minimum, r.maximum],
                _ => g.clone(),
            })
            .filter(|v| v.is_finite())
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (nan_min(lo, v), nan_max(hi, v)));

        for (term, group) in groups.iter().enumerate() {
            log::debug!("[membership {shape}] term {term}: {group:?}");
        }

        self.shape = shape;
        self.params = groups;
        self.ranges = ranges;
        self.minimum = minimum;
        self.maximum = maximum;
        self.extent = Range::new(lo, hi);
        Ok(())
    }

    /// Evaluate the membership degree of `x` for one term's parameters.
    ///
    /// Returns `Ok(None)` when `x` is NaN or the value is not finite.
    pub fn calculate(&self, x: f64, term: &[f64]) -> FuzzyResult<Option<f64>> {
        if !self.shape.is_set() {
            return Err(FuzzyError::UnsetMembership);
        }
        let arity = self.shape.arity();
        if term.len() < arity {
            return Err(FuzzyError::Config(format!(
                "{} term needs {arity} parameters, got {}",
                self.shape,
                term.len()
            )));
        }
        let value = self.evaluate(x, term);
        Ok(Some(value).filter(|v| v.is_finite()))
    }

    /// Evaluate `x` against the stored term `index`.
    pub fn calculate_term(&self, x: f64, index: usize) -> FuzzyResult<Option<f64>> {
        let term = self.params.get(index).ok_or_else(|| FuzzyError::InvalidTerm {
            term: index,
            reason: format!("only {} terms defined", self.params.len()),
        })?;
        self.calculate(x, term)
    }

    // Caller guarantees a set shape and a full parameter group.
    fn evaluate(&self, x: f64, p: &[f64]) -> f64 {
        match self.shape {
            MembershipType::Triangle => self.triangle(x, p[0], p[1], p[2]),
            MembershipType::Trapezoid => self.trapezoid(x, p[0], p[1], p[2], p[3]),
            MembershipType::Gaussian => self.gaussian(x, p[0], p[1]),
            MembershipType::None => f64::NAN,
        }
    }

    fn triangle(&self, x: f64, a: f64, b: f64, c: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if is_less_than(x, a) || is_greater_than(x, c) {
            return 0.0;
        }
        if is_equal(x, b) {
            return self.height;
        }
        if x < b {
            if a == f64::NEG_INFINITY {
                return self.height;
            }
            return self.height * ramp((x - a) / (b - a));
        }
        if c == f64::INFINITY {
            return self.height;
        }
        self.height * ramp((c - x) / (c - b))
    }

    fn trapezoid(&self, x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if is_less_than(x, a) || is_greater_than(x, d) {
            return 0.0;
        }
        if is_less_than(x, b) {
            if a == f64::NEG_INFINITY {
                return self.height;
            }
            return self.height * ramp((x - a) / (b - a));
        }
        if is_less_or_equal(x, c) {
            return self.height;
        }
        if d == f64::INFINITY {
            return self.height;
        }
        if is_less_than(x, d) {
            return self.height * ramp((d - x) / (d - c));
        }
        0.0
    }

    fn gaussian(&self, x: f64, mean: f64, sd: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        self.height * (-(x - mean) * (x - mean) / (2.0 * sd * sd)).exp()
    }

    /// Term range with infinite ends clipped to the finite vertex extent.
    pub fn integration_span(&self, index: usize) -> Option<Range> {
        let range = self.ranges.get(index)?;
        let minimum = if range.minimum.is_finite() {
            range.minimum
        } else {
            self.extent.minimum
        };
        let maximum = if range.maximum.is_finite() {
            range.maximum
        } else {
            self.extent.maximum
        };
        Some(Range::new(minimum, maximum))
    }

    /// First of `samples + 1` evenly spaced points over the finite extent
    /// where no term reaches [`EPS`].
    pub fn coverage_gap(&self, samples: usize) -> Option<f64> {
        if self.params.is_empty() || samples == 0 {
            return None;
        }
        let Range { minimum, maximum } = self.extent;
        (0..=samples)
            .map(|i| minimum + (maximum - minimum) * i as f64 / samples as f64)
            .find(|&x| {
                self.params
                    .iter()
                    .all(|term| !(self.evaluate(x, term).abs() >= EPS))
            })
    }

    pub fn set_height(&mut self, height: f64) {
        if !height.is_finite() || height <= 0.0 {
            log::warn!("[membership] height must be finite and > 0, got {height}");
            return;
        }
        self.height = height;
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn shape(&self) -> MembershipType {
        self.shape
    }

    pub fn discourse_size(&self) -> usize {
        self.params.len()
    }

    pub fn param_set(&self, index: usize) -> Option<&[f64]> {
        self.params.get(index).map(Vec::as_slice)
    }

    pub fn range(&self, index: usize) -> Option<Range> {
        self.ranges.get(index).copied()
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }
}

fn validate_term(shape: MembershipType, term: usize, p: &[f64]) -> FuzzyResult<()> {
    let invalid = |reason: &str| {
        Err(FuzzyError::InvalidTerm {
            term,
            reason: reason.to_string(),
        })
    };
    if p.iter().any(|v| v.is_nan()) {
        return invalid("NaN parameter");
    }
    match shape {
        MembershipType::Triangle => {
            if !(p[0] <= p[1] && p[1] <= p[2]) {
                return invalid("triangle vertices must satisfy a <= b <= c");
            }
            if !p[1].is_finite() {
                return invalid("triangle peak must be finite");
            }
        }
        MembershipType::Trapezoid => {
            if !(p[0] <= p[1] && p[1] <= p[2] && p[2] <= p[3]) {
                return invalid("trapezoid vertices must satisfy a <= b <= c <= d");
            }
            if p[1] == f64::INFINITY || p[2] == f64::NEG_INFINITY {
                return invalid("trapezoid plateau must touch the finite axis");
            }
        }
        MembershipType::Gaussian => {
            if !p[0].is_finite() {
                return invalid("gaussian mean must be finite");
            }
            if !(p[1].is_finite() && p[1] > 0.0) {
                return invalid("gaussian standard deviation must be finite and > 0");
            }
        }
        MembershipType::None => return Err(FuzzyError::UnsetMembership),
    }
    Ok(())
}

fn term_range(shape: MembershipType, p: &[f64]) -> Range {
    match shape {
        MembershipType::Triangle => Range::new(p[0], p[2]),
        MembershipType::Trapezoid => Range::new(p[0], p[3]),
        MembershipType::Gaussian => Range::new(p[0] - 3.0 * p[1], p[0] + 3.0 * p[1]),
        MembershipType::None => Range::new(f64::NAN, f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLES: [f64; 21] = [
        -3.0, -3.0, -2.0, -3.0, -2.0, -1.0, -2.0, -1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 2.0, 1.0,
        2.0, 3.0, 2.0, 3.0, 3.0,
    ];

    fn membership(shape: MembershipType, params: &[f64]) -> Membership {
        let mut m = Membership::default();
        m.set_params(shape, params).unwrap();
        m
    }

    fn degree(m: &Membership, x: f64, term: usize) -> f64 {
        m.calculate_term(x, term).unwrap().unwrap()
    }

    #[test]
    fn test_triangle_vertices() {
        let m = membership(MembershipType::Triangle, &[-1.0, 0.0, 2.0]);
        assert_eq!(degree(&m, -1.0, 0), 0.0);
        assert_eq!(degree(&m, 0.0, 0), 1.0);
        assert_eq!(degree(&m, 2.0, 0), 0.0);
        assert!((degree(&m, -0.5, 0) - 0.5).abs() < 1e-12);
        assert!((degree(&m, 1.5, 0) - 0.25).abs() < 1e-12);
        assert_eq!(degree(&m, 3.0, 0), 0.0);
    }

    #[test]
    fn test_triangle_epsilon_snaps_to_peak() {
        let m = membership(MembershipType::Triangle, &[-1.0, 0.0, 1.0]);
        assert_eq!(degree(&m, 1e-9, 0), 1.0);
    }

    #[test]
    fn test_triangle_open_shoulders() {
        let m = membership(
            MembershipType::Triangle,
            &[f64::NEG_INFINITY, -1.0, 0.0, 0.0, 1.0, f64::INFINITY],
        );
        assert_eq!(degree(&m, -50.0, 0), 1.0);
        assert_eq!(degree(&m, 50.0, 1), 1.0);
        assert_eq!(degree(&m, 50.0, 0), 0.0);
        assert!((degree(&m, -0.5, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_trapezoid_plateau_and_ramps() {
        let m = membership(MembershipType::Trapezoid, &[-2.0, -1.0, 1.0, 2.0]);
        assert_eq!(degree(&m, -3.0, 0), 0.0);
        assert_eq!(degree(&m, -2.0, 0), 0.0);
        assert!((degree(&m, -1.5, 0) - 0.5).abs() < 1e-12);
        for x in [-1.0, -0.3, 0.0, 0.9, 1.0] {
            assert_eq!(degree(&m, x, 0), 1.0, "plateau at x={x}");
        }
        assert!((degree(&m, 1.75, 0) - 0.25).abs() < 1e-12);
        assert_eq!(degree(&m, 2.0, 0), 0.0);
        assert_eq!(degree(&m, 2.5, 0), 0.0);
    }

    #[test]
    fn test_trapezoid_closed_right_shoulder() {
        // c == d: the plateau reaches the outer edge
        let m = membership(MembershipType::Trapezoid, &[2.0, 2.5, 3.0, 3.0]);
        assert_eq!(degree(&m, 3.0, 0), 1.0);
        assert_eq!(degree(&m, 3.1, 0), 0.0);
    }

    #[test]
    fn test_trapezoid_open_shoulders() {
        let m = membership(
            MembershipType::Trapezoid,
            &[
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
                -1.0,
                0.0,
                0.0,
                1.0,
                f64::INFINITY,
                f64::INFINITY,
            ],
        );
        assert_eq!(degree(&m, -1e6, 0), 1.0);
        assert_eq!(degree(&m, 1e6, 1), 1.0);
        assert!((degree(&m, -0.5, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_peak_and_symmetry() {
        let m = membership(MembershipType::Gaussian, &[1.0, 0.5]);
        assert_eq!(degree(&m, 1.0, 0), 1.0);
        let left = degree(&m, 0.3, 0);
        let right = degree(&m, 1.7, 0);
        assert!((left - right).abs() < 1e-12);
        let expected = (-0.5f64).exp();
        assert!((degree(&m, 1.5, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_height_scales_degrees() {
        let mut m = membership(MembershipType::Triangle, &[-1.0, 0.0, 1.0]);
        m.set_height(0.8);
        assert!((degree(&m, 0.0, 0) - 0.8).abs() < 1e-12);
        assert!((degree(&m, 0.5, 0) - 0.4).abs() < 1e-12);
        m.set_height(-1.0);
        assert_eq!(m.height(), 0.8);
    }

    #[test]
    fn test_ranges_and_bounds() {
        let m = membership(MembershipType::Triangle, &TRIANGLES);
        assert_eq!(m.discourse_size(), 7);
        assert_eq!(m.range(0), Some(Range::new(-3.0, -2.0)));
        assert_eq!(m.range(3), Some(Range::new(-1.0, 1.0)));
        assert_eq!(m.minimum(), -3.0);
        assert_eq!(m.maximum(), 3.0);

        let g = membership(MembershipType::Gaussian, &[-1.0, 0.5, 2.0, 0.2]);
        assert_eq!(g.range(0), Some(Range::new(-2.5, 0.5)));
        let r = g.range(1).unwrap();
        assert!((r.minimum - 1.4).abs() < 1e-12 && (r.maximum - 2.6).abs() < 1e-12);
        assert_eq!(g.minimum(), -2.5);
        assert!((g.maximum() - 2.6).abs() < 1e-12);
    }

    #[test]
    fn test_param_count_mismatch() {
        let mut m = Membership::default();
        let err = m
            .set_params(MembershipType::Triangle, &TRIANGLES[..20])
            .unwrap_err();
        assert_eq!(
            err,
            FuzzyError::ParamCount {
                shape: MembershipType::Triangle,
                count: 20,
                arity: 3
            }
        );
        assert_eq!(m.discourse_size(), 0);
    }

    #[test]
    fn test_unset_shape_rejected() {
        let mut m = Membership::default();
        assert_eq!(
            m.set_params(MembershipType::None, &[0.0]),
            Err(FuzzyError::UnsetMembership)
        );
        assert_eq!(
            m.calculate(0.0, &[-1.0, 0.0, 1.0]),
            Err(FuzzyError::UnsetMembership)
        );
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut m = Membership::default();
        let err = m
            .set_params(MembershipType::Triangle, &[0.0, 1.0, 2.0, 1.0, 0.5, 2.0])
            .unwrap_err();
        assert!(matches!(err, FuzzyError::InvalidTerm { term: 1, .. }), "{err}");
        assert!(m
            .set_params(MembershipType::Gaussian, &[0.0, 0.0])
            .is_err());
        assert!(m
            .set_params(MembershipType::Trapezoid, &[0.0, f64::NAN, 1.0, 2.0])
            .is_err());
    }

    #[test]
    fn test_set_params_replaces_terms() {
        let mut m = membership(MembershipType::Triangle, &TRIANGLES);
        m.set_params(MembershipType::Gaussian, &[0.0, 1.0]).unwrap();
        assert_eq!(m.discourse_size(), 1);
        assert_eq!(m.shape(), MembershipType::Gaussian);
        assert_eq!(m.minimum(), -3.0);
        assert_eq!(m.maximum(), 3.0);
    }

    #[test]
    fn test_nan_is_not_evaluable() {
        let m = membership(MembershipType::Triangle, &TRIANGLES);
        assert_eq!(m.calculate_term(f64::NAN, 3).unwrap(), None);
        let g = membership(MembershipType::Gaussian, &[0.0, 1.0]);
        assert_eq!(g.calculate_term(f64::NAN, 0).unwrap(), None);
    }

    #[test]
    fn test_unknown_term_index() {
        let m = membership(MembershipType::Triangle, &TRIANGLES);
        assert!(matches!(
            m.calculate_term(0.0, 7),
            Err(FuzzyError::InvalidTerm { term: 7, .. })
        ));
        assert!(m.param_set(7).is_none());
    }

    #[test]
    fn test_short_parameter_slice_rejected() {
        let m = membership(MembershipType::Trapezoid, &[0.0, 1.0, 2.0, 3.0]);
        assert!(matches!(
            m.calculate(1.0, &[0.0, 1.0]),
            Err(FuzzyError::Config(_))
        ));
    }

    #[test]
    fn test_integration_span_clips_open_shoulders() {
        let m = membership(
            MembershipType::Triangle,
            &[f64::NEG_INFINITY, -1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, f64::INFINITY],
        );
        assert_eq!(m.minimum(), f64::NEG_INFINITY);
        assert_eq!(m.integration_span(0), Some(Range::new(-1.0, 0.0)));
        assert_eq!(m.integration_span(1), Some(Range::new(-1.0, 1.0)));
        assert_eq!(m.integration_span(2), Some(Range::new(0.0, 1.0)));
        assert!(m.integration_span(3).is_none());
    }

    #[test]
    fn test_coverage_gap() {
        let full = membership(MembershipType::Triangle, &TRIANGLES);
        assert_eq!(full.coverage_gap(600), None);

        let holed = membership(MembershipType::Triangle, &[-3.0, -3.0, -1.0, 1.0, 3.0, 3.0]);
        let gap = holed.coverage_gap(60).expect("gap between -1 and 1");
        assert!(gap > -1.0 - 1e-9 && gap < 1.0 + 1e-9, "gap at {gap}");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn triangle_is_monotonic_on_each_side(
            a in -100.0f64..0.0,
            left in 0.01f64..50.0,
            right in 0.01f64..50.0,
            t1 in 0.0f64..1.0,
            t2 in 0.0f64..1.0,
        ) {
            let b = a + left;
            let c = b + right;
            let m = {
                let mut m = Membership::default();
                m.set_params(MembershipType::Triangle, &[a, b, c]).unwrap();
                m
            };
            let (lo, hi) = (t1.min(t2), t1.max(t2));
            let rise_lo = m.calculate_term(a + lo * left, 0).unwrap().unwrap();
            let rise_hi = m.calculate_term(a + hi * left, 0).unwrap().unwrap();
            prop_assert!(rise_lo <= rise_hi + 1e-12);
            let fall_lo = m.calculate_term(b + lo * right, 0).unwrap().unwrap();
            let fall_hi = m.calculate_term(b + hi * right, 0).unwrap().unwrap();
            prop_assert!(fall_lo + 1e-12 >= fall_hi);
            prop_assert_eq!(m.calculate_term(a, 0).unwrap().unwrap(), 0.0);
            prop_assert_eq!(m.calculate_term(b, 0).unwrap().unwrap(), 1.0);
            prop_assert_eq!(m.calculate_term(c, 0).unwrap().unwrap(), 0.0);
        }

        #[test]
        fn trapezoid_plateau_and_outside(
            a in -100.0f64..0.0,
            w1 in 0.01f64..10.0,
            w2 in 0.0f64..10.0,
            w3 in 0.01f64..10.0,
            t in 0.0f64..1.0,
            outside in 0.01f64..100.0,
        ) {
            let (b, c) = (a + w1, a + w1 + w2);
            let d = c + w3;
            let mut m = Membership::new(0.7);
            m.set_params(MembershipType::Trapezoid, &[a, b, c, d]).unwrap();
            let plateau = m.calculate_term(b + t * w2, 0).unwrap().unwrap();
            prop_assert!((plateau - 0.7).abs() < 1e-12);
            prop_assert_eq!(m.calculate_term(a - outside, 0).unwrap().unwrap(), 0.0);
            prop_assert_eq!(m.calculate_term(d + outside, 0).unwrap().unwrap(), 0.0);
        }

        #[test]
        fn gaussian_symmetric_and_bounded(
            mean in -50.0f64..50.0,
            sd in 0.05f64..10.0,
            offset in 0.0f64..30.0,
        ) {
            let mut m = Membership::default();
            m.set_params(MembershipType::Gaussian, &[mean, sd]).unwrap();
            let l = m.calculate_term(mean - offset, 0).unwrap().unwrap();
            let r = m.calculate_term(mean + offset, 0).unwrap().unwrap();
            prop_assert!((l - r).abs() < 1e-12);
            prop_assert!(l <= 1.0);
            prop_assert_eq!(m.calculate_term(mean, 0).unwrap().unwrap(), 1.0);
        }
    }
}
