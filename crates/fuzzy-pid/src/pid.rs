// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — P and PID Controllers
// ─────────────────────────────────────────────────────────────────────
//! Discrete linear controllers operating on a pre-computed error.
//!
//! The PID integrates with Tustin's rule:
//!
//!   u_i(k) = u_i(k-1) + Ki * (e(k) + e(k-1)) / 2
//!
//! and clamps the accumulator to `±|integral_saturation|`.

use serde::{Deserialize, Serialize};

/// Replace a negative or non-finite gain with 0.
fn sanitize_gain(name: &str, gain: f64) -> f64 {
    if !gain.is_finite() || gain < 0.0 {
        log::warn!("{name}={gain} is negative or non-finite, setting it to zero");
        return 0.0;
    }
    gain
}

/// Proportional controller: `u = Kp * e`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PController {
    kp: f64,
}

impl PController {
    pub fn new(kp: f64) -> Self {
        let mut p = Self::default();
        p.set_proportional(kp);
        p
    }

    pub fn algo(&self, err: f64) -> f64 {
        self.kp * err
    }

    /// Negative gains are rejected and stored as 0.
    pub fn set_proportional(&mut self, kp: f64) {
        self.kp = sanitize_gain("Kp", kp);
    }

    pub fn proportional(&self) -> f64 {
        self.kp
    }
}

/// PID gain set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// Discrete PID with Tustin integration and integral clamping.
///
/// The saturation bound defaults to 0, which disables integral action
/// until [`PIDController::set_integral_saturation`] is called.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PIDController {
    gains: PidGains,
    prev_err: f64,
    integral_prev: f64,
    integral_saturation: f64,
}

impl PIDController {
    pub fn new(gains: PidGains, integral_saturation: f64) -> Self {
        let mut pid = Self::default();
        pid.set_pid_params(gains);
        pid.set_integral_saturation(integral_saturation);
        pid
    }

    /// Execute one control step on `err`.
    pub fn algo(&mut self, err: f64) -> f64 {
        let proportional = self.gains.kp * err;

        let limit = self.integral_saturation.abs();
        let integral =
            (self.integral_prev + self.gains.ki * (err + self.prev_err) * 0.5).clamp(-limit, limit);

        let derivative = self.gains.kd * (err - self.prev_err);

        self.integral_prev = integral;
        self.prev_err = err;

        proportional + integral + derivative
    }

    /// Each negative gain is replaced by 0 with a warning.
    pub fn set_pid_params(&mut self, gains: PidGains) {
        self.gains = PidGains {
            kp: sanitize_gain("Kp", gains.kp),
            ki: sanitize_gain("Ki", gains.ki),
            kd: sanitize_gain("Kd", gains.kd),
        };
    }

    pub fn set_integral_saturation(&mut self, saturation: f64) {
        if !saturation.is_finite() {
            log::warn!("integral saturation {saturation} is not finite, keeping previous value");
            return;
        }
        self.integral_saturation = saturation;
    }

    /// Drop accumulated integral action, e.g. after a setpoint jump.
    pub fn clear_integral(&mut self) {
        self.integral_prev = 0.0;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn prev_err(&self) -> f64 {
        self.prev_err
    }

    pub fn integral(&self) -> f64 {
        self.integral_prev
    }

    pub fn integral_saturation(&self) -> f64 {
        self.integral_saturation
    }
}
