// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Hybrid Fuzzy / Proportional Controller
// ─────────────────────────────────────────────────────────────────────
//! Two-input (error, error change) fuzzy controller with a proportional
//! fallback for large errors and back-calculation anti-windup.
//!
//! One control step:
//!
//! 1. `err = target - actual`, `d_err = err - prev_err`.
//! 2. Both are clamped to their variable's bound and scaled onto the
//!    normalized discourse.
//! 3. With the hybrid switch on and `|err|` or `|d_err|` beyond
//!    `bound * switch_ratio`, the P controller answers, clamped to
//!    `±u.bound * proportional_u_ratio`.
//! 4. Otherwise: fuzzify, infer (product AND, max merge per level),
//!    defuzzify by centroid, shape, add the integral term, clamp to
//!    `±u.bound`.

use std::collections::BTreeMap;

use serde::Serialize;

use fuzzy_pid::PController;
use fuzzy_types::numeric::{clamp_symmetric, sign, EPS};
use fuzzy_types::{ControllerConfig, FuzzyError, FuzzyResult, MembershipType};

use crate::fuzzification::Fuzzification;
use crate::rules::{label, RuleTable};
use crate::trace::{Branch, ControlRecord, ControlTrace};

/// Hybrid fuzzy controller.
#[derive(Debug, Clone)]
pub struct FuzzyLogic {
    e: Fuzzification,
    ec: Fuzzification,
    u: Fuzzification,
    rules: Option<RuleTable>,
    resolution: usize,
    switch_ratio: f64,
    proportional_u_ratio: f64,
    output_exp_scale: f64,
    use_hybrid: bool,
    p_ctrl: PController,
    ki_e: f64,
    k_sat: f64,
    err: f64,
    prev_err: f64,
    d_err: f64,
    err_int: f64,
    fb_u: f64,
    last_output: f64,
    step_count: u64,
    weights: BTreeMap<i8, f64>,
    trace: Option<ControlTrace>,
}

/// Serializable snapshot of one control variable.
#[derive(Debug, Clone, Serialize)]
pub struct VariableInfo {
    pub name: String,
    pub initialized: bool,
    pub shape: MembershipType,
    pub terms: usize,
    pub bound: f64,
    pub factor: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl VariableInfo {
    fn of(var: &Fuzzification) -> Self {
        let m = var.membership();
        Self {
            name: var.name().to_string(),
            initialized: var.is_initialized(),
            shape: m.shape(),
            terms: m.discourse_size(),
            bound: var.bound(),
            factor: var.factor(),
            minimum: m.minimum(),
            maximum: m.maximum(),
        }
    }
}

/// Serializable controller summary.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerInfo {
    pub error: VariableInfo,
    pub error_derivative: VariableInfo,
    pub output: VariableInfo,
    pub rule_table: Option<Vec<Vec<i8>>>,
    pub resolution: usize,
    pub switch_ratio: f64,
    pub proportional_u_ratio: f64,
    pub output_exp_scale: f64,
    pub use_hybrid: bool,
    pub kp: f64,
    pub ki_e: f64,
    pub k_sat: f64,
    pub step_count: u64,
}

impl FuzzyLogic {
    /// Uninitialized controller. Scalar settings take the values of
    /// [`ControllerConfig::default`].
    pub fn new(resolution: usize) -> Self {
        let defaults = ControllerConfig::default();
        let resolution = if resolution == 0 {
            log::warn!("resolution must be >= 1, using {}", defaults.resolution);
            defaults.resolution
        } else {
            resolution
        };
        Self {
            e: Fuzzification::new("e"),
            ec: Fuzzification::new("ec"),
            u: Fuzzification::new("u"),
            rules: None,
            resolution,
            switch_ratio: defaults.switch_ratio,
            proportional_u_ratio: defaults.proportional_u_ratio,
            output_exp_scale: defaults.output_exp_scale,
            use_hybrid: defaults.use_hybrid,
            p_ctrl: PController::new(defaults.kp),
            ki_e: defaults.ki_e,
            k_sat: defaults.k_sat,
            err: 0.0,
            prev_err: 0.0,
            d_err: 0.0,
            err_int: 0.0,
            fb_u: 0.0,
            last_output: 0.0,
            step_count: 0,
            weights: BTreeMap::new(),
            trace: None,
        }
    }

    /// Fully initialized controller from a validated configuration.
    pub fn from_config(config: &ControllerConfig) -> FuzzyResult<Self> {
        config.validate()?;

        let mut logic = Self::new(config.resolution);
        logic.e = Fuzzification::from_config("e", &config.error)?;
        logic.ec = Fuzzification::from_config("ec", &config.error_derivative)?;
        logic.u = Fuzzification::from_config("u", &config.output)?;
        logic.set_fuzzy_rules(RuleTable::new(config.rule_table.clone())?)?;

        logic.switch_ratio = config.switch_ratio;
        logic.proportional_u_ratio = config.proportional_u_ratio;
        logic.output_exp_scale = config.output_exp_scale;
        logic.use_hybrid = config.use_hybrid;
        logic.p_ctrl = PController::new(config.kp);
        logic.ki_e = config.ki_e;
        logic.k_sat = config.k_sat;
        Ok(logic)
    }

    /// Install a rule table sized `e terms × ec terms`.
    ///
    /// When `u` is already initialized every level must select one of
    /// its terms.
    pub fn set_fuzzy_rules(&mut self, table: RuleTable) -> FuzzyResult<()> {
        if !(self.e.is_initialized() && self.ec.is_initialized()) {
            return Err(FuzzyError::NotInitialized("error and error-derivative variables"));
        }
        self.check_rules(&table)?;
        self.rules = Some(table);
        Ok(())
    }

    // Table must match the current discourses; variables can be
    // re-initialized through the mutable handles after installation.
    fn check_rules(&self, table: &RuleTable) -> FuzzyResult<()> {
        let expected_rows = self.e.membership().discourse_size();
        let expected_cols = self.ec.membership().discourse_size();
        if table.rows() != expected_rows || table.cols() != expected_cols {
            return Err(FuzzyError::RuleTableShape {
                rows: table.rows(),
                cols: table.cols(),
                expected_rows,
                expected_cols,
            });
        }
        if self.u.is_initialized() {
            let (min, max) = self.output_levels();
            let (lo, hi) = table.levels();
            for level in [lo, hi] {
                if i64::from(level) < min || i64::from(level) > max {
                    return Err(FuzzyError::RuleLevel { level, min, max });
                }
            }
        }
        Ok(())
    }

    // Levels addressable in the output discourse.
    fn output_levels(&self) -> (i64, i64) {
        let n_u = self.u.membership().discourse_size() as i64;
        let half = n_u / 2;
        (-half, n_u - 1 - half)
    }

    fn ensure_ready(&self) -> FuzzyResult<()> {
        if !self.e.is_initialized() {
            return Err(FuzzyError::NotInitialized("error variable"));
        }
        if !self.ec.is_initialized() {
            return Err(FuzzyError::NotInitialized("error-derivative variable"));
        }
        if !self.u.is_initialized() {
            return Err(FuzzyError::NotInitialized("output variable"));
        }
        match self.rules.as_ref() {
            Some(table) => self.check_rules(table),
            None => Err(FuzzyError::NotInitialized("rule table")),
        }
    }

    /// One control step with the stored hybrid and shaping settings.
    pub fn step(&mut self, target: f64, actual: f64) -> FuzzyResult<f64> {
        self.algo(target, actual, self.use_hybrid, self.output_exp_scale)
    }

    /// One control step.
    pub fn algo(
        &mut self,
        target: f64,
        actual: f64,
        use_hybrid: bool,
        output_exp_scale: f64,
    ) -> FuzzyResult<f64> {
        self.ensure_ready()?;
        let step = self.step_count;

        let err = target - actual;
        let d_err = err - self.prev_err;

        let e_bound = self.e.bound();
        let ec_bound = self.ec.bound();
        let clamped_err = clamp_symmetric(err, e_bound);
        let norm_err = self.e.factor() * clamped_err;
        let norm_d_err = self.ec.factor() * clamp_symmetric(d_err, ec_bound);

        if err * self.prev_err < 0.0 {
            log::debug!("[fuzzy #{step}] error changed sign, integral cleared");
            self.err_int = 0.0;
        }
        self.prev_err = clamped_err;
        self.err = err;
        self.d_err = d_err;

        let switch = use_hybrid
            && (err.abs() > e_bound * self.switch_ratio || d_err.abs() > ec_bound * self.switch_ratio);

        let (raw, output, branch) = if switch {
            let raw = self.p_ctrl.algo(err);
            let output = clamp_symmetric(raw, self.u.bound() * self.proportional_u_ratio);
            log::debug!(
                "[proportional #{step}] target={target:.3} actual={actual:.3} err={err:.3} u={output:.3}"
            );
            (None, output, Branch::Proportional)
        } else {
            let raw = self.fuzzy_output(step, norm_err, norm_d_err, output_exp_scale)?;
            let output = clamp_symmetric(raw, self.u.bound());
            log::debug!(
                "[fuzzy #{step}] target={target:.3} actual={actual:.3} e={norm_err:.3} ec={norm_d_err:.3} integral={:.3} u={output:.3}",
                self.err_int
            );
            (Some(raw), output, Branch::Fuzzy)
        };

        // Only the integral-carrying fuzzy output feeds back into `err_int`.
        self.fb_u = match raw {
            Some(raw) if raw.is_finite() => (raw - output) * self.k_sat,
            _ => 0.0,
        };
        self.last_output = output;
        if let Some(trace) = self.trace.as_mut() {
            trace.push(ControlRecord {
                step,
                target,
                actual,
                err,
                d_err,
                output,
                branch,
            });
        }
        self.step_count += 1;
        Ok(output)
    }

    // Unclamped fuzzy-branch output, integral term included.
    fn fuzzy_output(
        &mut self,
        step: u64,
        norm_err: f64,
        norm_d_err: f64,
        output_exp_scale: f64,
    ) -> FuzzyResult<f64> {
        let e_in = clamp_into(norm_err, self.e.membership().minimum(), self.e.membership().maximum());
        let ec_in = clamp_into(
            norm_d_err,
            self.ec.membership().minimum(),
            self.ec.membership().maximum(),
        );
        self.e.fuzzify(e_in)?;
        self.ec.fuzzify(ec_in)?;
        self.inference()?;

        let r = self.defuzzify().unwrap_or_else(|| {
            log::warn!("[fuzzy #{step}] no rule activated, fuzzy term set to 0");
            0.0
        });

        let shaped = if output_exp_scale > EPS && output_exp_scale < 1.0 && r.abs() > 0.5 {
            sign(r) * r.abs().powf(output_exp_scale.exp()) * self.u.factor()
        } else {
            r * self.u.factor()
        };

        self.err_int += self.ki_e * norm_err - self.fb_u;
        Ok(shaped + self.err_int)
    }

    /// Fire every rule addressed by the current premises.
    ///
    /// The activation of a rule is `e_degree * ec_degree`; rules that
    /// share a level keep the largest activation.
    pub fn inference(&mut self) -> FuzzyResult<()> {
        self.ensure_ready()?;
        let rules = self
            .rules
            .as_ref()
            .ok_or(FuzzyError::NotInitialized("rule table"))?;
        self.weights.clear();

        let n_e = self.e.membership().discourse_size();
        let n_ec = self.ec.membership().discourse_size();
        for ep in self.e.premises() {
            for ecp in self.ec.premises() {
                let (row, col) = (n_e - 1 - ep.index, n_ec - 1 - ecp.index);
                let Some(level) = rules.get(row, col) else {
                    continue;
                };
                let weight = ep.degree * ecp.degree;
                let slot = self.weights.entry(level).or_insert(0.0);
                *slot = slot.max(weight);
                log::trace!("rule [{row}][{col}] -> {} weight={weight:.4}", label(level));
            }
        }
        log::debug!("inference -> {:?}", self.weights);
        Ok(())
    }

    /// Centroid of the activated output terms, each truncated at its
    /// activation. Consumes the inference weights.
    ///
    /// `None` when nothing contributes.
    pub fn defuzzify(&mut self) -> Option<f64> {
        let membership = self.u.membership();
        let n_u = membership.discourse_size() as i64;
        let half = n_u / 2;
        let steps = self.resolution;

        let mut moment = 0.0;
        let mut area = 0.0;
        for (&level, &weight) in &self.weights {
            let index = i64::from(level) + half;
            if index < 0 || index >= n_u {
                log::warn!("rule level {level} has no output term, skipped");
                continue;
            }
            let index = index as usize;
            let Some(span) = membership.integration_span(index) else {
                continue;
            };
            let dx = span.width() / steps as f64;
            for j in 0..steps {
                let x = span.minimum + (j as f64 + 0.5) * dx;
                let mu = membership
                    .calculate_term(x, index)
                    .ok()
                    .flatten()
                    .unwrap_or(0.0);
                let y = mu.min(weight);
                moment += x * y;
                area += y;
            }
        }
        self.weights.clear();

        if area < EPS {
            return None;
        }
        Some(moment / area)
    }

    pub fn inference_weights(&self) -> &BTreeMap<i8, f64> {
        &self.weights
    }

    /// Clear error history, integral state and inference scratch.
    /// The step counter and the trace are kept.
    pub fn reset(&mut self) {
        self.err = 0.0;
        self.prev_err = 0.0;
        self.d_err = 0.0;
        self.err_int = 0.0;
        self.fb_u = 0.0;
        self.last_output = 0.0;
        self.weights.clear();
    }

    pub fn enable_trace(&mut self, capacity: usize) {
        self.trace = Some(ControlTrace::new(capacity));
    }

    pub fn disable_trace(&mut self) {
        self.trace = None;
    }

    pub fn set_switch_ratio(&mut self, ratio: f64) {
        if !(ratio.is_finite() && ratio > 0.0) {
            log::warn!("switch ratio must be finite and > 0, got {ratio}");
            return;
        }
        self.switch_ratio = ratio;
    }

    pub fn set_proportional_u_ratio(&mut self, ratio: f64) {
        if !(ratio.is_finite() && ratio > 0.0) {
            log::warn!("proportional output ratio must be finite and > 0, got {ratio}");
            return;
        }
        self.proportional_u_ratio = ratio;
    }

    pub fn set_output_exp_scale(&mut self, scale: f64) {
        if !(0.0..1.0).contains(&scale) {
            log::warn!("output exp scale must be in [0, 1), got {scale}");
            return;
        }
        self.output_exp_scale = scale;
    }

    pub fn set_use_hybrid(&mut self, use_hybrid: bool) {
        self.use_hybrid = use_hybrid;
    }

    pub fn set_resolution(&mut self, resolution: usize) {
        if resolution == 0 {
            log::warn!("resolution must be >= 1, keeping {}", self.resolution);
            return;
        }
        self.resolution = resolution;
    }

    pub fn set_integral_gain(&mut self, ki_e: f64) {
        if !(ki_e.is_finite() && ki_e >= 0.0) {
            log::warn!("integral gain must be finite and >= 0, got {ki_e}");
            return;
        }
        self.ki_e = ki_e;
    }

    pub fn set_saturation_gain(&mut self, k_sat: f64) {
        if !(k_sat.is_finite() && k_sat >= 0.0) {
            log::warn!("saturation gain must be finite and >= 0, got {k_sat}");
            return;
        }
        self.k_sat = k_sat;
    }

    pub fn e(&self) -> &Fuzzification {
        &self.e
    }

    pub fn e_mut(&mut self) -> &mut Fuzzification {
        &mut self.e
    }

    pub fn ec(&self) -> &Fuzzification {
        &self.ec
    }

    pub fn ec_mut(&mut self) -> &mut Fuzzification {
        &mut self.ec
    }

    pub fn u(&self) -> &Fuzzification {
        &self.u
    }

    pub fn u_mut(&mut self) -> &mut Fuzzification {
        &mut self.u
    }

    pub fn p_ctrl(&self) -> &PController {
        &self.p_ctrl
    }

    pub fn p_ctrl_mut(&mut self) -> &mut PController {
        &mut self.p_ctrl
    }

    pub fn rule_table(&self) -> Option<&RuleTable> {
        self.rules.as_ref()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn switch_ratio(&self) -> f64 {
        self.switch_ratio
    }

    pub fn proportional_u_ratio(&self) -> f64 {
        self.proportional_u_ratio
    }

    pub fn output_exp_scale(&self) -> f64 {
        self.output_exp_scale
    }

    pub fn use_hybrid(&self) -> bool {
        self.use_hybrid
    }

    /// Raw error of the last step.
    pub fn err(&self) -> f64 {
        self.err
    }

    /// Bound-clamped error carried into the next step.
    pub fn prev_err(&self) -> f64 {
        self.prev_err
    }

    pub fn d_err(&self) -> f64 {
        self.d_err
    }

    pub fn integral(&self) -> f64 {
        self.err_int
    }

    /// Anti-windup feedback `(raw - saturated) * k_sat` of the last step.
    pub fn feedback(&self) -> f64 {
        self.fb_u
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    pub fn trace(&self) -> Option<&ControlTrace> {
        self.trace.as_ref()
    }

    pub fn info(&self) -> ControllerInfo {
        ControllerInfo {
            error: VariableInfo::of(&self.e),
            error_derivative: VariableInfo::of(&self.ec),
            output: VariableInfo::of(&self.u),
            rule_table: self.rules.as_ref().map(RuleTable::to_rows),
            resolution: self.resolution,
            switch_ratio: self.switch_ratio,
            proportional_u_ratio: self.proportional_u_ratio,
            output_exp_scale: self.output_exp_scale,
            use_hybrid: self.use_hybrid,
            kp: self.p_ctrl.proportional(),
            ki_e: self.ki_e,
            k_sat: self.k_sat,
            step_count: self.step_count,
        }
    }

    pub fn log_info(&self) {
        let info = self.info();
        for var in [&info.error, &info.error_derivative, &info.output] {
            log::info!(
                "[{}] {} {} terms, bound={}, factor={:.6}, range=[{}, {}]",
                var.name,
                var.shape,
                var.terms,
                var.bound,
                var.factor,
                var.minimum,
                var.maximum
            );
        }
        log::info!(
            "resolution={} hybrid={} switch_ratio={} p_u_ratio={} exp_scale={} kp={} ki_e={} k_sat={}",
            info.resolution,
            info.use_hybrid,
            info.switch_ratio,
            info.proportional_u_ratio,
            info.output_exp_scale,
            info.kp,
            info.ki_e,
            info.k_sat
        );
    }
}

// Clamp that tolerates infinite limits and never panics.
fn clamp_into(x: f64, minimum: f64, maximum: f64) -> f64 {
    x.max(minimum).min(maximum)
}
