// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Membership Shape Tag
// ─────────────────────────────────────────────────────────────────────
//! Closed set of parametric membership shapes and their arities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parametric membership function family.
///
/// The arity is the number of scalars describing one linguistic term.
/// It is used both to validate a flat parameter array and to slice it
/// into per-term groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    #[default]
    None,
    /// `(mean, standard_deviation)`
    Gaussian,
    /// `(a, b, c)` with `a <= b <= c`
    Triangle,
    /// `(a, b, c, d)` with `a <= b <= c <= d`
    Trapezoid,
}

impl MembershipType {
    /// Parameters per term.
    pub const fn arity(self) -> usize {
        match self {
            MembershipType::None => 0,
            MembershipType::Gaussian => 2,
            MembershipType::Triangle => 3,
            MembershipType::Trapezoid => 4,
        }
    }

    pub fn is_set(self) -> bool {
        self != MembershipType::None
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MembershipType::None => "none",
            MembershipType::Gaussian => "gaussian",
            MembershipType::Triangle => "triangle",
            MembershipType::Trapezoid => "trapezoid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(MembershipType::None.arity(), 0);
        assert_eq!(MembershipType::Gaussian.arity(), 2);
        assert_eq!(MembershipType::Triangle.arity(), 3);
        assert_eq!(MembershipType::Trapezoid.arity(), 4);
    }

    #[test]
    fn test_default_is_unset() {
        assert!(!MembershipType::default().is_set());
        assert!(MembershipType::Triangle.is_set());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&MembershipType::Trapezoid).unwrap();
        assert_eq!(json, "\"trapezoid\"");
        let shape: MembershipType = serde_json::from_str("\"gaussian\"").unwrap();
        assert_eq!(shape, MembershipType::Gaussian);
    }
}
