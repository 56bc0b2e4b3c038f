use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// One entry addressed as a root (`base`) plus a position below it (`tail`).
///
/// Both parts are OS strings, so entry names that are not valid UTF-8 take
/// part in comparisons like any other name.
///
/// Equality and hashing consider the tail only: items at the same relative
/// position under two different roots compare equal even when one is a file
/// and the other a directory. Kind is never stored here; it is probed through
/// the [`FileSystem`](fsops::FileSystem) when needed.
#[derive(Clone, Debug)]
pub struct PathItem {
    base: OsString,
    tail: OsString,
}

impl PathItem {
    /// Creates an item at `tail` below `base`.
    pub fn new(base: impl Into<OsString>, tail: impl Into<OsString>) -> Self {
        Self {
            base: base.into(),
            tail: tail.into(),
        }
    }

    /// Creates the item for a tree root (empty tail).
    pub fn root(base: impl Into<OsString>) -> Self {
        Self::new(base, OsString::new())
    }

    /// Root the item is anchored to.
    pub fn base(&self) -> &OsStr {
        &self.base
    }

    /// Position relative to the root; empty for the root itself.
    pub fn tail(&self) -> &OsStr {
        &self.tail
    }

    /// `base` and `tail` joined by a single separator.
    pub fn full_path(&self) -> PathBuf {
        PathBuf::from(join_paths(&self.base, &self.tail))
    }

    /// The same relative position re-anchored under `base`.
    #[must_use]
    pub fn with_base(&self, base: impl Into<OsString>) -> Self {
        Self::new(base, self.tail.clone())
    }

    /// The entry called `name` directly below this one.
    #[must_use]
    pub fn child(&self, name: impl AsRef<OsStr>) -> Self {
        Self::new(self.base.clone(), join_paths(&self.tail, name))
    }
}

impl PartialEq for PathItem {
    fn eq(&self, other: &Self) -> bool {
        self.tail == other.tail
    }
}

impl Eq for PathItem {}

impl Hash for PathItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tail.hash(state);
    }
}

const fn is_separator(byte: u8) -> bool {
    byte == b'/' || byte == b'\\'
}

/// Joins two path fragments with exactly one separator at the seam.
///
/// An empty side contributes nothing, so no leading or trailing separator is
/// introduced. A separator already present on either side is reused.
pub fn join_paths(left: impl AsRef<OsStr>, right: impl AsRef<OsStr>) -> OsString {
    let (left, right) = (left.as_ref(), right.as_ref());
    if left.is_empty() {
        return right.to_owned();
    }
    if right.is_empty() {
        return left.to_owned();
    }

    let mut joined = left.to_owned();
    if left.as_encoded_bytes().last().copied().is_some_and(is_separator) {
        joined.push(trim_leading_separators(right));
    } else {
        if !right.as_encoded_bytes().first().copied().is_some_and(is_separator) {
            joined.push("/");
        }
        joined.push(right);
    }
    joined
}

fn trim_leading_separators(fragment: &OsStr) -> Cow<'_, OsStr> {
    let bytes = fragment.as_encoded_bytes();
    let skip = bytes.iter().take_while(|byte| is_separator(**byte)).count();
    if skip == 0 {
        return Cow::Borrowed(fragment);
    }
    if let Some(text) = fragment.to_str() {
        return Cow::Borrowed(OsStr::new(&text[skip..]));
    }
    trim_raw(bytes, skip)
}

#[cfg(unix)]
fn trim_raw(bytes: &[u8], skip: usize) -> Cow<'_, OsStr> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(OsStr::from_bytes(&bytes[skip..]))
}

#[cfg(not(unix))]
fn trim_raw(bytes: &[u8], skip: usize) -> Cow<'_, OsStr> {
    Cow::Owned(OsString::from(String::from_utf8_lossy(&bytes[skip..]).into_owned()))
}
