//! The [`LogSink`] capability and its trivial implementations.

use crate::category::LogCategory;
use crate::error::LogError;

/// Capability accepting `(category, message)` pairs.
pub trait LogSink {
    /// Whether the sink has a handler for `category`.
    fn supports(&self, category: LogCategory) -> bool;

    /// Records a message. Unsupported categories are handled per sink policy.
    fn log(&mut self, category: LogCategory, message: &str);
}

impl<S> LogSink for &mut S
where
    S: LogSink + ?Sized,
{
    fn supports(&self, category: LogCategory) -> bool {
        (**self).supports(category)
    }

    fn log(&mut self, category: LogCategory, message: &str) {
        (**self).log(category, message);
    }
}

impl<S> LogSink for Box<S>
where
    S: LogSink + ?Sized,
{
    fn supports(&self, category: LogCategory) -> bool {
        (**self).supports(category)
    }

    fn log(&mut self, category: LogCategory, message: &str) {
        (**self).log(category, message);
    }
}

/// Sink used when the caller supplies no logger: accepts everything, prints nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn supports(&self, _category: LogCategory) -> bool {
        true
    }

    fn log(&mut self, _category: LogCategory, _message: &str) {}
}

/// Verifies that `sink` handles every category in `required`.
///
/// All missing categories are reported together.
pub fn require_categories<S>(sink: &S, required: &[LogCategory]) -> Result<(), LogError>
where
    S: LogSink + ?Sized,
{
    let mut missing: Vec<LogCategory> = required
        .iter()
        .copied()
        .filter(|category| !sink.supports(*category))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort_unstable();
    missing.dedup();
    Err(LogError::MissingCategories { missing })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Partial;

    impl LogSink for Partial {
        fn supports(&self, category: LogCategory) -> bool {
            category == LogCategory::General
        }

        fn log(&mut self, _category: LogCategory, _message: &str) {}
    }

    #[test]
    fn noop_sink_satisfies_any_requirement() {
        assert!(require_categories(&NoopSink, &LogCategory::ALL).is_ok());
    }

    #[test]
    fn every_missing_category_is_reported() {
        let error = require_categories(
            &Partial,
            &[LogCategory::Copy, LogCategory::General, LogCategory::Conflict],
        )
        .unwrap_err();
        match error {
            LogError::MissingCategories { missing } => {
                assert_eq!(missing, vec![LogCategory::Copy, LogCategory::Conflict]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn trait_objects_are_accepted() {
        let sink: Box<dyn LogSink> = Box::new(Partial);
        assert!(require_categories(sink.as_ref(), &[LogCategory::General]).is_ok());
    }
}
