// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Fuzzy Control Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

use crate::shape::MembershipType;

/// Root error type for all fuzzy control failures.
///
/// Variants report a bad setup or use before setup. Nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Flat parameter list does not split into whole terms.
    #[error("{shape} needs parameters in groups of {arity}, got {count}")]
    ParamCount {
        shape: MembershipType,
        count: usize,
        arity: usize,
    },

    /// Membership type was never set.
    #[error("membership type is not set")]
    UnsetMembership,

    /// A single term's parameters are malformed.
    #[error("term {term}: {reason}")]
    InvalidTerm { term: usize, reason: String },

    /// Rule table does not fit the error / error-derivative discourses.
    #[error(
        "rule table is {rows}x{cols}, discourse sizes require {expected_rows}x{expected_cols}"
    )]
    RuleTableShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// Rule names an output level the output variable does not have.
    #[error("rule level {level} outside output levels [{min}, {max}]")]
    RuleLevel { level: i8, min: i64, max: i64 },

    /// Operation requested before the named component was initialized.
    #[error("not initialized: {0}")]
    NotInitialized(&'static str),

    /// Scalar text could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type FuzzyResult<T> = Result<T, FuzzyError>;
