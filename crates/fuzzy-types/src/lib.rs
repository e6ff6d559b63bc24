// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Fuzzy Control Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, numeric helpers and the error
//! hierarchy shared by the fuzzy control crates.

pub mod config;
pub mod error;
pub mod level;
pub mod numeric;
pub mod shape;

pub use config::{ControllerConfig, VariableConfig};
pub use error::{FuzzyError, FuzzyResult};
pub use numeric::EPS;
pub use shape::MembershipType;
