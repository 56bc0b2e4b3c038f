//! Category → handler routing with preamble rendering.

use std::collections::BTreeMap;
use std::fmt;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::category::LogCategory;
use crate::error::LogError;
use crate::printer::Printer;
use crate::sink::LogSink;

/// Behaviour when a message targets a category that was never registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingCategory {
    /// Drop the message.
    Silent,
    /// Print the message through the router's printer prefixed with `*`.
    #[default]
    Indicator,
    /// Reject the message; [`LogRouter::try_log`] returns
    /// [`LogError::Unregistered`].
    Error,
}

enum Handler {
    Print { enabled: bool },
    Custom(Box<dyn FnMut(&str) + Send>),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print { enabled } => f.debug_struct("Print").field("enabled", enabled).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Routes each category to an explicitly registered handler.
///
/// Printed lines take the form `(<category>) <timestamp>: <message>`, where the
/// category prefix and timestamp are each optional.
pub struct LogRouter {
    handlers: BTreeMap<LogCategory, Handler>,
    printer: Option<Box<dyn Printer>>,
    missing: MissingCategory,
    show_category: bool,
    show_timestamp: bool,
}

impl fmt::Debug for LogRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogRouter")
            .field("handlers", &self.handlers)
            .field("has_printer", &self.printer.is_some())
            .field("missing", &self.missing)
            .field("show_category", &self.show_category)
            .field("show_timestamp", &self.show_timestamp)
            .finish()
    }
}

impl Default for LogRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRouter {
    /// Creates a router with no printer and no registered categories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            printer: None,
            missing: MissingCategory::default(),
            show_category: false,
            show_timestamp: false,
        }
    }

    /// Creates a router for a CLI verbosity level.
    ///
    /// Every category is registered. Level `0` prints conflicts only, level `1`
    /// adds general progress and copies, level `2` and above also prints the
    /// per-entry comparison trace.
    #[must_use]
    pub fn for_verbosity(level: u8) -> Self {
        Self::new()
            .register(LogCategory::Conflict, true)
            .register(LogCategory::General, level >= 1)
            .register(LogCategory::Copy, level >= 1)
            .register(LogCategory::Compare, level >= 2)
    }

    /// Sets the printer used by printing handlers.
    #[must_use]
    pub fn with_printer(mut self, printer: impl Printer + 'static) -> Self {
        self.printer = Some(Box::new(printer));
        self
    }

    /// Sets the printer from an already boxed value.
    #[must_use]
    pub fn with_boxed_printer(mut self, printer: Option<Box<dyn Printer>>) -> Self {
        self.printer = printer;
        self
    }

    /// Registers `category` with a printing handler.
    #[must_use]
    pub fn register(mut self, category: LogCategory, enabled: bool) -> Self {
        self.handlers.insert(category, Handler::Print { enabled });
        self
    }

    /// Registers `category` with a custom handler receiving the bare message.
    #[must_use]
    pub fn register_with<F>(mut self, category: LogCategory, handler: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.handlers
            .insert(category, Handler::Custom(Box::new(handler)));
        self
    }

    /// Selects the [`MissingCategory`] policy.
    #[must_use]
    pub const fn on_missing(mut self, missing: MissingCategory) -> Self {
        self.missing = missing;
        self
    }

    /// Prefix each printed line with `(<category>) `.
    #[must_use]
    pub const fn show_category(mut self, show: bool) -> Self {
        self.show_category = show;
        self
    }

    /// Prefix each printed line with a local `YYYY-MM-DD HH:MM:SS: ` timestamp.
    #[must_use]
    pub const fn show_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    /// Returns whether `category` has a handler.
    #[must_use]
    pub fn is_registered(&self, category: LogCategory) -> bool {
        self.handlers.contains_key(&category)
    }

    /// Returns whether messages for `category` will reach a handler and be shown.
    #[must_use]
    pub fn is_enabled(&self, category: LogCategory) -> bool {
        match self.handlers.get(&category) {
            Some(Handler::Print { enabled }) => *enabled && self.printer.is_some(),
            Some(Handler::Custom(_)) => true,
            None => false,
        }
    }

    /// Logs `message`, reporting unregistered categories under
    /// [`MissingCategory::Error`].
    pub fn try_log(&mut self, category: LogCategory, message: &str) -> Result<(), LogError> {
        match self.handlers.get_mut(&category) {
            Some(Handler::Custom(handler)) => {
                handler(message);
                Ok(())
            }
            Some(Handler::Print { enabled }) => {
                let enabled = *enabled;
                if enabled {
                    let line = self.render(category, message);
                    self.print(&line);
                }
                Ok(())
            }
            None => match self.missing {
                MissingCategory::Silent => Ok(()),
                MissingCategory::Indicator => {
                    let line = format!("*{}", self.render(category, message));
                    self.print(&line);
                    Ok(())
                }
                MissingCategory::Error => Err(LogError::Unregistered(category)),
            },
        }
    }

    fn render(&self, category: LogCategory, message: &str) -> String {
        let mut line = String::new();
        if self.show_category {
            line.push('(');
            line.push_str(category.as_str());
            line.push_str(") ");
        }
        if self.show_timestamp {
            line.push_str(&timestamp());
            line.push_str(": ");
        }
        line.push_str(message);
        line
    }

    fn print(&mut self, line: &str) {
        if let Some(printer) = self.printer.as_mut()
            && let Err(error) = printer.print_line(line)
        {
            tracing::warn!(target: "dirmerge::logging", %error, "log printer failed");
        }
    }
}

impl LogSink for LogRouter {
    fn supports(&self, category: LogCategory) -> bool {
        self.is_registered(category)
    }

    fn log(&mut self, category: LogCategory, message: &str) {
        if let Err(error) = self.try_log(category, message) {
            tracing::warn!(target: "dirmerge::logging", %error, dropped = message, "dropped log message");
        }
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}
