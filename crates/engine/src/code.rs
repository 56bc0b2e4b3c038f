use std::fmt;
use std::str::FromStr;

use crate::error::MergeError;

/// Classification of a planned [`Operation`](crate::Operation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationCode {
    /// Entry exists only under source A.
    CopyFromA,
    /// Entry exists only under source B.
    CopyFromB,
    /// Both sides hold a file; A's is strictly newer.
    NewestFromA,
    /// Both sides hold a file; B's is newer or equally old.
    NewestFromB,
    /// Destination directory for a directory present on both sides.
    MakeDir,
    /// A file on one side shares its name with a directory on the other.
    NameKindConflict,
}

impl OperationCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CopyFromA,
        Self::CopyFromB,
        Self::NewestFromA,
        Self::NewestFromB,
        Self::MakeDir,
        Self::NameKindConflict,
    ];

    /// Lowercase dashed name, e.g. `make-dir`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CopyFromA => "copy-from-a",
            Self::CopyFromB => "copy-from-b",
            Self::NewestFromA => "newest-from-a",
            Self::NewestFromB => "newest-from-b",
            Self::MakeDir => "make-dir",
            Self::NameKindConflict => "name-kind-conflict",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationCode {
    type Err = MergeError;

    /// Accepts the dashed name in any case; underscores may stand in for dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| MergeError::UnknownCode(s.to_owned()))
    }
}

/// Set of [`OperationCode`]s, used to exclude classes of operation from a plan.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CodeSet(u8);

impl CodeSet {
    /// The empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Set containing `codes`.
    pub const fn of(codes: &[OperationCode]) -> Self {
        let mut bits = 0;
        let mut index = 0;
        while index < codes.len() {
            bits |= codes[index].bit();
            index += 1;
        }
        Self(bits)
    }

    /// Adds `code`.
    pub const fn insert(&mut self, code: OperationCode) {
        self.0 |= code.bit();
    }

    /// Returns the set with `code` added.
    #[must_use]
    pub const fn with(mut self, code: OperationCode) -> Self {
        self.insert(code);
        self
    }

    /// Codes in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether `code` is in the set.
    pub const fn contains(self, code: OperationCode) -> bool {
        self.0 & code.bit() != 0
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of codes in the set.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Codes in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = OperationCode> {
        OperationCode::ALL
            .into_iter()
            .filter(move |code| self.contains(*code))
    }
}

impl fmt::Debug for CodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<OperationCode> for CodeSet {
    fn from_iter<I: IntoIterator<Item = OperationCode>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<OperationCode> for CodeSet {
    fn extend<I: IntoIterator<Item = OperationCode>>(&mut self, iter: I) {
        for code in iter {
            self.insert(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for code in OperationCode::ALL {
            assert_eq!(code.as_str().parse::<OperationCode>().unwrap(), code);
        }
    }

    #[test]
    fn parsing_accepts_constant_style_names() {
        assert_eq!(
            "MAKE_DIR".parse::<OperationCode>().unwrap(),
            OperationCode::MakeDir
        );
        assert_eq!(
            " Copy-From-B ".parse::<OperationCode>().unwrap(),
            OperationCode::CopyFromB
        );
    }

    #[test]
    fn unknown_code_is_rejected() {
        let error = "copy-from-c".parse::<OperationCode>().unwrap_err();
        assert_eq!(error.to_string(), "unknown operation code 'copy-from-c'");
    }

    #[test]
    fn code_set_membership() {
        let set = CodeSet::of(&[OperationCode::MakeDir, OperationCode::NewestFromA]);
        assert!(set.contains(OperationCode::MakeDir));
        assert!(set.contains(OperationCode::NewestFromA));
        assert!(!set.contains(OperationCode::CopyFromA));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![
            OperationCode::NewestFromA,
            OperationCode::MakeDir
        ]);
    }

    #[test]
    fn code_set_union_and_collect() {
        let left: CodeSet = [OperationCode::CopyFromA].into_iter().collect();
        let right = CodeSet::new().with(OperationCode::CopyFromB);
        let both = left.union(right);
        assert_eq!(both.len(), 2);
        assert!(CodeSet::new().is_empty());
        assert_eq!(format!("{both:?}"), "{CopyFromA, CopyFromB}");
    }
}
