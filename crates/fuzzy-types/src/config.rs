// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Fuzzy Controller Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, FuzzyResult};
use crate::level::{NB, NM, NS, PB, PM, PS, ZO};
use crate::shape::MembershipType;

/// Setup of one control variable (error, error derivative or output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    /// Physical half-range of the variable.
    pub bound: f64,

    /// Use the reciprocal scaling factor (output variable).
    #[serde(default)]
    pub reverse: bool,

    /// Membership shape shared by every term of the variable.
    pub shape: MembershipType,

    /// Flat term parameters, lowest term first.
    /// Accepts numbers or the strings "inf", "-inf", "nan".
    #[serde(with = "scalar_list")]
    pub params: Vec<f64>,

    /// Multiplier applied on top of the nominal discourse/bound factor.
    #[serde(default = "default_factor_ratio")]
    pub factor_ratio: f64,
}

fn default_factor_ratio() -> f64 {
    1.0
}

impl VariableConfig {
    pub fn new(bound: f64, reverse: bool, shape: MembershipType, params: Vec<f64>) -> Self {
        Self {
            bound,
            reverse,
            shape,
            params,
            factor_ratio: 1.0,
        }
    }

    fn validate(&self, name: &str) -> FuzzyResult<()> {
        if !self.bound.is_finite() || self.bound <= 0.0 {
            return Err(FuzzyError::Config(format!(
                "{name}.bound must be finite and > 0, got {}",
                self.bound
            )));
        }
        if !self.factor_ratio.is_finite() || self.factor_ratio <= 0.0 {
            return Err(FuzzyError::Config(format!(
                "{name}.factor_ratio must be finite and > 0, got {}",
                self.factor_ratio
            )));
        }
        if self.params.is_empty() {
            return Err(FuzzyError::Config(format!("{name}.params must not be empty")));
        }
        Ok(())
    }
}

/// Seven triangular terms at -3..=3, spacing 1, closed shoulders.
pub const TRIANGLE_7: [f64; 21] = [
    -3.0, -3.0, -2.0, //
    -3.0, -2.0, -1.0, //
    -2.0, -1.0, 0.0, //
    -1.0, 0.0, 1.0, //
    0.0, 1.0, 2.0, //
    1.0, 2.0, 3.0, //
    2.0, 3.0, 3.0,
];

/// Runtime configuration for one hybrid fuzzy controller.
///
/// Missing fields in serialized form take the values of
/// [`ControllerConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Error `e = target - actual`.
    pub error: VariableConfig,

    /// Error change per step `ec = e - e_prev`.
    pub error_derivative: VariableConfig,

    /// Controller output `u`.
    pub output: VariableConfig,

    /// Rows follow error terms, columns derivative terms, both authored
    /// high-to-low.
    pub rule_table: Vec<Vec<i8>>,

    /// Samples per activated output term in centroid integration.
    /// Default: 100.
    pub resolution: usize,

    /// Fall back to the P controller beyond `bound * switch_ratio`.
    /// Default: 1.5.
    pub switch_ratio: f64,

    /// P fallback output ceiling as a multiple of the output bound.
    /// Default: 3.0.
    pub proportional_u_ratio: f64,

    /// Power-law output expansion, 0 disables. Must be in [0, 1).
    /// Default: 0.2.
    pub output_exp_scale: f64,

    /// Enable the proportional fallback.
    /// Default: true.
    pub use_hybrid: bool,

    /// Proportional gain of the fallback controller.
    /// Default: 2.0.
    pub kp: f64,

    /// Integral gain on the normalized error. 0 keeps a pure PD law.
    /// Default: 0.0.
    pub ki_e: f64,

    /// Back-calculation anti-windup gain.
    /// Default: 0.0.
    pub k_sat: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            error: VariableConfig::new(60.0, false, MembershipType::Triangle, TRIANGLE_7.to_vec()),
            error_derivative: VariableConfig::new(
                30.0,
                false,
                MembershipType::Triangle,
                TRIANGLE_7.to_vec(),
            ),
            output: VariableConfig::new(15.0, true, MembershipType::Triangle, TRIANGLE_7.to_vec()),
            rule_table: vec![
                vec![PB, PB, PM, PM, PS, ZO, ZO],
                vec![PB, PM, PM, PS, PS, ZO, NS],
                vec![PM, PM, PS, PS, ZO, NS, NS],
                vec![PM, PM, PS, ZO, NS, NM, NM],
                vec![PS, PS, ZO, NS, NS, NM, NM],
                vec![PS, ZO, NS, NM, NM, NB, NB],
                vec![ZO, ZO, NM, NM, NM, NB, NB],
            ],
            resolution: 100,
            switch_ratio: 1.5,
            proportional_u_ratio: 3.0,
            output_exp_scale: 0.2,
            use_hybrid: true,
            kp: 2.0,
            ki_e: 0.0,
            k_sat: 0.0,
        }
    }
}

impl ControllerConfig {
    /// Validate scalar parameters and the rule table layout.
    ///
    /// Shape arity and rule/discourse agreement are checked when the
    /// controller is built, because they depend on the parsed terms.
    pub fn validate(&self) -> FuzzyResult<()> {
        self.error.validate("error")?;
        self.error_derivative.validate("error_derivative")?;
        self.output.validate("output")?;

        if self.resolution == 0 {
            return Err(FuzzyError::Config("resolution must be >= 1".to_string()));
        }
        if !(self.switch_ratio.is_finite() && self.switch_ratio > 0.0) {
            return Err(FuzzyError::Config(format!(
                "switch_ratio must be finite and > 0, got {}",
                self.switch_ratio
            )));
        }
        if !(self.proportional_u_ratio.is_finite() && self.proportional_u_ratio > 0.0) {
            return Err(FuzzyError::Config(format!(
                "proportional_u_ratio must be finite and > 0, got {}",
                self.proportional_u_ratio
            )));
        }
        if !(0.0..1.0).contains(&self.output_exp_scale) {
            return Err(FuzzyError::Config(format!(
                "output_exp_scale must be in [0, 1), got {}",
                self.output_exp_scale
            )));
        }
        for (name, gain) in [("kp", self.kp), ("ki_e", self.ki_e), ("k_sat", self.k_sat)] {
            if !(gain.is_finite() && gain >= 0.0) {
                return Err(FuzzyError::Config(format!(
                    "{name} must be finite and >= 0, got {gain}"
                )));
            }
        }

        let cols = self.rule_table.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(FuzzyError::Config("rule_table must not be empty".to_string()));
        }
        if let Some(row) = self.rule_table.iter().position(|r| r.len() != cols) {
            return Err(FuzzyError::Config(format!(
                "rule_table row {row} has {} entries, expected {cols}",
                self.rule_table[row].len()
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> FuzzyResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FuzzyError::Config(format!("JSON parse error: {e}")))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> FuzzyResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FuzzyError::Config(format!("JSON encode error: {e}")))
    }
}

/// Serde adapter for parameter lists that may hold infinite shoulders.
mod scalar_list {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::numeric::{scalar_text, to_scalar};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum RawScalar {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let raw: Vec<RawScalar> = values
            .iter()
            .map(|&v| match scalar_text(v) {
                Some(text) => RawScalar::Text(text.to_string()),
                None => RawScalar::Number(v),
            })
            .collect();
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<RawScalar>::deserialize(deserializer)?
            .into_iter()
            .map(|raw| match raw {
                RawScalar::Number(v) => Ok(v),
                RawScalar::Text(text) => to_scalar(&text).map_err(D::Error::custom),
            })
            .collect()
    }
}
