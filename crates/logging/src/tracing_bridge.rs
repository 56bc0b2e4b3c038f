//! crates/logging/src/tracing_bridge.rs
//! Bridge between the category sink and the tracing crate.
//!
//! [`TracingSink`] forwards category messages as tracing events whose target is
//! `dirmerge::<category>`, so standard `RUST_LOG` directives such as
//! `dirmerge::compare=debug` select categories. [`init_tracing`] installs the
//! subscriber used by the command-line front-end.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::category::LogCategory;
use crate::sink::LogSink;

/// Sink that emits each message as a tracing event.
///
/// Conflicts are emitted at `WARN`, the comparison trace at `DEBUG`, everything
/// else at `INFO`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn supports(&self, _category: LogCategory) -> bool {
        true
    }

    fn log(&mut self, category: LogCategory, message: &str) {
        match category {
            LogCategory::General => {
                crate::trace_general!("{message}");
            }
            LogCategory::Compare => {
                crate::trace_compare!("{message}");
            }
            LogCategory::Copy => {
                crate::trace_copy!("{message}");
            }
            LogCategory::Conflict => {
                crate::trace_conflict!("{message}");
            }
        }
    }
}

/// Maps a `-v` count onto a default filter directive.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a global fmt subscriber writing to standard error.
///
/// `RUST_LOG` overrides the verbosity-derived default. Returns `false` when a
/// global subscriber was already installed.
pub fn init_tracing(verbosity: u8) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
