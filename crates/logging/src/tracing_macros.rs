//! crates/logging/src/tracing_macros.rs
//! Convenience macros for category-targeted tracing.
//!
//! These macros provide ergonomic wrappers around standard tracing macros
//! with the `dirmerge::<category>` targets used by [`TracingSink`](crate::TracingSink).

/// Emit a general progress trace.
///
/// # Example
/// ```ignore
/// trace_general!("planned {} operations", count);
/// ```
#[macro_export]
macro_rules! trace_general {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "dirmerge::general", $($arg)*);
    };
}

/// Emit a per-entry comparison trace.
///
/// # Example
/// ```ignore
/// trace_compare!("comparing {}", tail);
/// ```
#[macro_export]
macro_rules! trace_compare {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "dirmerge::compare", $($arg)*);
    };
}

/// Emit a copy operation trace.
///
/// # Example
/// ```ignore
/// trace_copy!("copying {}", path);
/// ```
#[macro_export]
macro_rules! trace_copy {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "dirmerge::copy", $($arg)*);
    };
}

/// Emit a name-collision warning.
///
/// # Example
/// ```ignore
/// trace_conflict!("file and directory share a name: {}", tail);
/// ```
#[macro_export]
macro_rules! trace_conflict {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "dirmerge::conflict", $($arg)*);
    };
}
