// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Control Trace
// ─────────────────────────────────────────────────────────────────────
//! Bounded per-step history of a controller, serializable for external
//! plotting tools.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use fuzzy_types::{FuzzyError, FuzzyResult};

/// Which law produced a step's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Fuzzy,
    Proportional,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub step: u64,
    pub target: f64,
    pub actual: f64,
    pub err: f64,
    pub d_err: f64,
    pub output: f64,
    pub branch: Branch,
}

/// Ring of the most recent records; the oldest is dropped when full.
#[derive(Debug, Clone, Serialize)]
pub struct ControlTrace {
    capacity: usize,
    records: VecDeque<ControlRecord>,
}

impl ControlTrace {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: ControlRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> &VecDeque<ControlRecord> {
        &self.records
    }

    pub fn last(&self) -> Option<&ControlRecord> {
        self.records.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records as a JSON array, oldest first.
    pub fn to_json(&self) -> FuzzyResult<String> {
        serde_json::to_string(&self.records)
            .map_err(|e| FuzzyError::Config(format!("trace serialization failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: u64) -> ControlRecord {
        ControlRecord {
            step,
            target: 10.0,
            actual: step as f64,
            err: 10.0 - step as f64,
            d_err: -1.0,
            output: 0.5,
            branch: Branch::Fuzzy,
        }
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut trace = ControlTrace::new(3);
        for i in 0..5 {
            trace.push(record(i));
        }
        assert_eq!(trace.len(), 3);
        let steps: Vec<u64> = trace.records().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![2, 3, 4]);
        assert_eq!(trace.last().map(|r| r.step), Some(4));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut trace = ControlTrace::new(0);
        trace.push(record(0));
        trace.push(record(1));
        assert_eq!(trace.capacity(), 1);
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut trace = ControlTrace::new(4);
        trace.push(record(0));
        trace.clear();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_to_json() {
        let mut trace = ControlTrace::new(4);
        trace.push(record(1));
        let mut p = record(2);
        p.branch = Branch::Proportional;
        trace.push(p);

        let json = trace.to_json().unwrap();
        let parsed: Vec<ControlRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].branch, Branch::Proportional);
        assert!(json.contains("\"proportional\""), "{json}");
    }
}
