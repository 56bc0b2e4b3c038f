//! crates/logging/src/category.rs
//! Closed set of log categories used by the merge engine.

use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Category attached to every log message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogCategory {
    /// General progress (run start, filter counts, summaries).
    General,
    /// Per-entry comparison trace emitted while planning.
    Compare,
    /// Copy and directory-creation execution.
    Copy,
    /// File/directory name collisions.
    Conflict,
}

impl LogCategory {
    /// Every category in declaration order.
    pub const ALL: [Self; 4] = [Self::General, Self::Compare, Self::Copy, Self::Conflict];

    /// Returns the lowercase name used in settings files and preambles.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Compare => "compare",
            Self::Copy => "copy",
            Self::Conflict => "conflict",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogCategory {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for category in LogCategory::ALL {
            assert_eq!(category.as_str().parse::<LogCategory>().unwrap(), category);
        }
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(" Copy ".parse::<LogCategory>().unwrap(), LogCategory::Copy);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let error = "in_prompt".parse::<LogCategory>().unwrap_err();
        assert!(matches!(error, LogError::UnknownCategory(name) if name == "in_prompt"));
    }
}
