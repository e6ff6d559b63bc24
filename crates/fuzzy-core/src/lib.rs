// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Fuzzy Control Kernel Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Membership evaluation, fuzzification, rule inference and the hybrid
//! fuzzy/proportional controller for real-time control loops.
//!
//! # Control Invariants
//!
//! 1. **Output is bounded**: the fuzzy branch never leaves
//!    `[-u.bound, u.bound]` and the proportional branch never leaves
//!    `[-u.bound * proportional_u_ratio, u.bound * proportional_u_ratio]`.
//!    NaN inputs are mapped to 0 before they reach either law.
//!
//! 2. **Scratch state is per step**: the premise lists and the inference
//!    accumulator are cleared at the start of every step, and
//!    defuzzification consumes the accumulator. Nothing leaks between
//!    steps except `prev_err`, the integral and the anti-windup feedback.
//!
//! 3. **Deterministic**: identical configurations fed identical inputs
//!    produce bit-identical outputs. The accumulator is ordered by level
//!    so the centroid sums always run in the same order.
//!
//! 4. **Configuration errors are synchronous**: malformed terms, rule
//!    tables or bounds fail the setup call with a `FuzzyError`. Range
//!    problems at run time are logged and leave state unchanged.

pub mod fuzzification;
pub mod logic;
pub mod membership;
pub mod rules;
pub mod shared;
pub mod trace;

pub use fuzzification::{Fuzzification, PremisePair};
pub use logic::{ControllerInfo, FuzzyLogic, VariableInfo};
pub use membership::{Membership, Range};
pub use rules::RuleTable;
pub use shared::SharedController;
pub use trace::{Branch, ControlRecord, ControlTrace};
