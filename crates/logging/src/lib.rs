#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the category-based logging sink consumed by the merge
//! engine. Every message carries a [`LogCategory`] (general progress,
//! per-entry comparison trace, copy execution, or conflict warning) and is
//! routed through an explicit table of handlers instead of dynamically
//! synthesised logger methods.
//!
//! # Design
//!
//! - [`LogSink`] is the capability the engine receives. [`NoopSink`] stands in
//!   for an absent sink, [`TracingSink`] forwards to the `tracing` ecosystem,
//!   and [`LogRouter`] renders lines through a [`Printer`].
//! - [`LogRouter`] maps each registered category to a handler. Categories that
//!   were never registered follow the configured [`MissingCategory`] policy.
//! - [`require_categories`] validates a sink before any work starts so a
//!   misconfigured sink fails fast instead of being discovered mid-run.
//! - [`LoggingSettings`] loads router configuration from JSON.
//!
//! # Invariants
//!
//! - Logging never aborts the caller. Printer I/O failures are reported through
//!   `tracing` and otherwise ignored.
//! - A disabled category is still "supported": it validates, it just prints
//!   nothing.
//!
//! # Examples
//!
//! ```
//! use logging::{LogCategory, LogRouter, LogSink, MemoryPrinter, require_categories};
//!
//! let printer = MemoryPrinter::new();
//! let mut router = LogRouter::new()
//!     .with_printer(printer.clone())
//!     .register(LogCategory::General, true)
//!     .register(LogCategory::Copy, false);
//!
//! require_categories(&router, &[LogCategory::General, LogCategory::Copy]).unwrap();
//! assert!(require_categories(&router, &[LogCategory::Conflict]).is_err());
//!
//! router.log(LogCategory::General, "starting");
//! router.log(LogCategory::Copy, "hidden");
//! assert_eq!(printer.lines(), vec!["starting".to_string()]);
//! ```

mod category;
mod error;
mod line_mode;
mod printer;
mod router;
mod settings;
mod sink;
mod tracing_bridge;
mod tracing_macros;

pub use category::LogCategory;
pub use error::LogError;
pub use line_mode::LineMode;
pub use printer::{CombinedPrinter, LineSink, MemoryPrinter, Printer, RotatingFilePrinter};
pub use router::{LogRouter, MissingCategory};
pub use settings::{ConsoleSettings, FileSettings, LoggingSettings};
pub use sink::{LogSink, NoopSink, require_categories};
pub use tracing_bridge::{TracingSink, init_tracing};
