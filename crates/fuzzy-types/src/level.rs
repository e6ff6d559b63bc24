// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Linguistic Output Levels
// ─────────────────────────────────────────────────────────────────────
//! Signed linguistic levels used as rule-table entries.
//!
//! A level `l` selects output term `l + n_u / 2`, so a 7-term output
//! variable covers `NB..=PB` and a 9-term one `NL..=PL`.

pub const NL: i8 = -4;
pub const NB: i8 = -3;
pub const NM: i8 = -2;
pub const NS: i8 = -1;
pub const ZO: i8 = 0;
pub const PS: i8 = 1;
pub const PM: i8 = 2;
pub const PB: i8 = 3;
pub const PL: i8 = 4;

/// Short label for a level, `"?"` outside `NL..=PL`.
pub fn label(level: i8) -> &'static str {
    match level {
        NL => "NL",
        NB => "NB",
        NM => "NM",
        NS => "NS",
        ZO => "ZO",
        PS => "PS",
        PM => "PM",
        PB => "PB",
        PL => "PL",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(label(NB), "NB");
        assert_eq!(label(ZO), "ZO");
        assert_eq!(label(PL), "PL");
        assert_eq!(label(9), "?");
    }
}
