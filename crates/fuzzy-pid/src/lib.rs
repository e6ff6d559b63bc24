// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Fuzzy Control Kernel Linear Controllers
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Proportional and discrete PID controllers.
//!
//! `PController` is the large-error fallback of the hybrid fuzzy
//! controller; `PIDController` is a standalone Tustin-integrated PID
//! with a clamped integral accumulator.

pub mod pid;

pub use pid::{PController, PIDController, PidGains};
