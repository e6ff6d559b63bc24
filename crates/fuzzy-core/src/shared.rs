// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Shared Controller Handle
// ─────────────────────────────────────────────────────────────────────
//! Clonable handle that lets several threads drive one controller.
//!
//! Steps through a handle are serialized by a `parking_lot::Mutex`;
//! separate controllers keep separate locks and never contend.

use std::sync::Arc;

use parking_lot::Mutex;

use fuzzy_types::{ControllerConfig, FuzzyResult};

use crate::logic::FuzzyLogic;

#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<FuzzyLogic>>,
}

impl SharedController {
    pub fn new(logic: FuzzyLogic) -> Self {
        Self {
            inner: Arc::new(Mutex::new(logic)),
        }
    }

    pub fn from_config(config: &ControllerConfig) -> FuzzyResult<Self> {
        FuzzyLogic::from_config(config).map(Self::new)
    }

    pub fn step(&self, target: f64, actual: f64) -> FuzzyResult<f64> {
        self.inner.lock().step(target, actual)
    }

    pub fn algo(
        &self,
        target: f64,
        actual: f64,
        use_hybrid: bool,
        output_exp_scale: f64,
    ) -> FuzzyResult<f64> {
        self.inner
            .lock()
            .algo(target, actual, use_hybrid, output_exp_scale)
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut FuzzyLogic) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
