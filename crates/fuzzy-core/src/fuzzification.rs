// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Fuzzification
// ─────────────────────────────────────────────────────────────────────
//! Maps a physical variable onto its normalized discourse.
//!
//! The scaling factor is `ratio * (n / 2) / bound` for inputs and the
//! reciprocal for the output variable (`reverse`), so an input at
//! `±bound` lands on the outermost term centre and an outermost output
//! centre maps back to `±bound`.

use serde::Serialize;

use fuzzy_types::numeric::{is_equal, EPS};
use fuzzy_types::{FuzzyError, FuzzyResult, MembershipType, VariableConfig};

use crate::membership::Membership;

/// Ratio used when a caller passes a ratio at or below [`EPS`].
const FALLBACK_RATIO: f64 = 0.1;

/// Sample count of the coverage check run by [`Fuzzification::init`].
const COVERAGE_SAMPLES: usize = 1000;

/// Degree of one activated term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PremisePair {
    pub degree: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninit,
    Init,
}

/// One named control variable: its terms, range and scaling.
#[derive(Debug, Clone)]
pub struct Fuzzification {
    name: String,
    membership: Membership,
    bound: f64,
    factor: f64,
    ratio: f64,
    reverse: bool,
    state: State,
    premises: Vec<PremisePair>,
}

impl Fuzzification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            membership: Membership::default(),
            bound: 0.0,
            factor: 0.0,
            ratio: 1.0,
            reverse: false,
            state: State::Uninit,
            premises: Vec::new(),
        }
    }

    /// Build and initialize a variable from its configuration block.
    pub fn from_config(name: impl Into<String>, config: &VariableConfig) -> FuzzyResult<Self> {
        let mut var = Self::new(name);
        var.init(config.bound, config.reverse, config.shape, &config.params)?;
        if !is_equal(config.factor_ratio, 1.0) {
            var.set_factor(config.factor_ratio, config.reverse);
        }
        Ok(var)
    }

    pub fn init(
        &mut self,
        bound: f64,
        reverse: bool,
        shape: MembershipType,
        params: &[f64],
    ) -> FuzzyResult<()> {
        if !bound.is_finite() || bound <= 0.0 {
            return Err(FuzzyError::Config(format!(
                "{}: bound must be finite and > 0, got {bound}",
                self.name
            )));
        }
        self.membership.set_params(shape, params)?;

        self.bound = bound;
        self.ratio = 1.0;
        self.reverse = reverse;
        self.state = State::Init;
        self.premises.clear();
        self.apply_factor();

        if let Some(x) = self.membership.coverage_gap(COVERAGE_SAMPLES) {
            log::warn!(
                "[{}] discourse not fully covered: no term active at x={x:.4}",
                self.name
            );
        }
        log::debug!(
            "[{}] init: {} {shape} terms, bound={bound}, factor={:.6}",
            self.name,
            self.membership.discourse_size(),
            self.factor
        );
        Ok(())
    }

    /// Degrees of every term activated by a normalized `input`.
    ///
    /// An uninitialized variable yields no premises.
    pub fn fuzzify(&mut self, input: f64) -> FuzzyResult<()> {
        self.premises.clear();
        if self.state != State::Init {
            log::warn!("[{}] fuzzify() before init(), no premises", self.name);
            return Ok(());
        }
        for index in 0..self.membership.discourse_size() {
            if let Some(degree) = self.membership.calculate_term(input, index)? {
                if degree.abs() >= EPS {
                    self.premises.push(PremisePair { degree, index });
                }
            }
        }
        log::debug!("[{}] fuzzify({input:.4}) -> {:?}", self.name, self.premises);
        Ok(())
    }

    pub fn set_factor(&mut self, ratio: f64, reverse: bool) {
        if self.state != State::Init {
            log::warn!("[{}] set_factor() before init(), ignored", self.name);
            return;
        }
        let ratio = if !ratio.is_finite() || ratio <= EPS {
            log::warn!(
                "[{}] factor ratio {ratio} too small, using {FALLBACK_RATIO}",
                self.name
            );
            FALLBACK_RATIO
        } else {
            ratio
        };
        self.ratio = ratio;
        self.reverse = reverse;
        self.apply_factor();
    }

    pub fn set_bound(&mut self, bound: f64) {
        if self.state != State::Init {
            log::warn!("[{}] set_bound() before init(), ignored", self.name);
            return;
        }
        if !bound.is_finite() || bound < 0.0 || is_equal(bound, 0.0) {
            log::warn!("[{}] bound must be finite and > 0, got {bound}", self.name);
            return;
        }
        self.bound = bound;
        self.apply_factor();
    }

    fn apply_factor(&mut self) {
        // A single term still scales as if it had one neighbour per side.
        let half = (self.membership.discourse_size() / 2).max(1) as f64;
        let factor = self.ratio * half / self.bound;
        self.factor = if self.reverse { 1.0 / factor } else { factor };
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub fn is_initialized(&self) -> bool {
        self.state == State::Init
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn premises(&self) -> &[PremisePair] {
        &self.premises
    }
}
