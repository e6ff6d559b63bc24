// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Rule Table
// ─────────────────────────────────────────────────────────────────────
//! Rectangular table of output levels.
//!
//! Rows follow the error terms and columns the error-derivative terms,
//! both authored from the highest term to the lowest. Entry `(0, 0)`
//! therefore answers "large positive error, growing fast".

use serde::{Deserialize, Serialize};

use fuzzy_types::{FuzzyError, FuzzyResult};

pub use fuzzy_types::level::{label, NB, NL, NM, NS, PB, PL, PM, PS, ZO};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    rows: usize,
    cols: usize,
    cells: Vec<i8>,
}

impl RuleTable {
    pub fn new(table: Vec<Vec<i8>>) -> FuzzyResult<Self> {
        let rows = table.len();
        let cols = table.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(FuzzyError::Config("rule table must not be empty".to_string()));
        }
        if let Some(row) = table.iter().position(|r| r.len() != cols) {
            return Err(FuzzyError::Config(format!(
                "rule table row {row} has {} entries, expected {cols}",
                table[row].len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            cells: table.into_iter().flatten().collect(),
        })
    }

    /// Square anti-diagonal table: `ZO` on the anti-diagonal, one level
    /// per step away from it, saturating at `±size / 2`.
    pub fn mirrored(size: usize) -> FuzzyResult<Self> {
        if size == 0 || size % 2 == 0 || size > 255 {
            return Err(FuzzyError::Config(format!(
                "mirrored rule table needs an odd size in 1..=255, got {size}"
            )));
        }
        let half = (size / 2) as i64;
        let table = (0..size as i64)
            .map(|r| {
                (0..size as i64)
                    .map(|c| (2 * half - r - c).clamp(-half, half) as i8)
                    .collect()
            })
            .collect();
        Self::new(table)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Lowest and highest level in the table.
    pub fn levels(&self) -> (i8, i8) {
        let min = self.cells.iter().copied().min().unwrap_or(ZO);
        let max = self.cells.iter().copied().max().unwrap_or(ZO);
        (min, max)
    }

    pub fn to_rows(&self) -> Vec<Vec<i8>> {
        self.cells.chunks(self.cols).map(<[i8]>::to_vec).collect()
    }
}
