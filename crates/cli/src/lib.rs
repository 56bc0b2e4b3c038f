#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of `dirmerge`. It parses
//! `dirmerge [OPTIONS] SOURCE_A SOURCE_B [DEST]`, wires the local filesystem
//! adapter and a log router into an [`engine::MergeEngine`], and prints one
//! report line per planned operation followed by a summary.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for standard
//! output and error, so tests drive it with in-memory buffers. A
//! [`clap`](https://docs.rs/clap/) builder definition recognises the options;
//! operand counts and option values are validated afterwards so `--help` and
//! `--version` work without operands. Log lines go through a
//! [`logging::LogRouter`] printing to the process's standard error, or to the
//! printers named by a `--log-settings` file.
//!
//! # Invariants
//!
//! - `run` never panics; failures surface as non-zero exit codes.
//! - The report on standard output lists every operation left after filtering,
//!   in plan order.
//!
//! # Errors
//!
//! Usage errors, unknown codes or modes, and unreadable log settings print a
//! diagnostic and return `1`. A run in which any operation failed returns
//! [`PARTIAL_FAILURE_EXIT_CODE`].
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["dirmerge", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("dirmerge "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use engine::{MergeEngine, MergeError, MergeMode, MergeRun};
use fsops::{DryRunFileSystem, FileSystem, LocalFileSystem};
use logging::{LineSink, LogRouter, LogSink, LoggingSettings, init_tracing};

mod command;
mod error;
mod invocation;

pub use error::CliError;

use command::{PROGRAM_NAME, ParsedArgs, help_text, parse_args};
use invocation::Invocation;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Exit code returned when at least one operation failed.
pub const PARTIAL_FAILURE_EXIT_CODE: i32 = 23;

/// Verbosity from which internal `tracing` events are printed as well.
const TRACING_VERBOSITY: u8 = 3;

/// Runs the command-line front-end with the provided arguments and handles.
///
/// The first argument is the program name, as with [`std::env::args_os`].
/// Returns the process exit code.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{}", error.render());
            1
        }
    }
}

/// Converts a numeric exit code into an [`ExitCode`], clamping to `0..=255`.
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return report_io(stdout.write_all(help_text().as_bytes()), stderr);
    }
    if parsed.show_version {
        return report_io(
            writeln!(stdout, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION")),
            stderr,
        );
    }

    let invocation = match Invocation::from_parsed(parsed) {
        Ok(invocation) => invocation,
        Err(error) => return report_error(&error, stderr),
    };
    let mut sink = match log_router(&invocation) {
        Ok(router) => router,
        Err(error) => return report_error(&error, stderr),
    };
    if invocation.verbosity >= TRACING_VERBOSITY {
        init_tracing(invocation.verbosity);
    }
    tracing::debug!(
        mode = %invocation.mode,
        dry_run = invocation.dry_run,
        max_free_fraction = invocation.max_free_fraction,
        "starting merge"
    );

    let fs = LocalFileSystem::new().with_max_use_of_free_space(invocation.max_free_fraction);
    let result = if invocation.dry_run {
        merge(DryRunFileSystem::new(fs), &invocation, &mut sink)
    } else {
        merge(fs, &invocation, &mut sink)
    };

    match result {
        Ok(run) => match write_report(&run, stdout) {
            Ok(()) => exit_status(&run),
            Err(error) => report_io(Err(error), stderr),
        },
        Err(error) => report_error(&CliError::from(error), stderr),
    }
}

fn log_router(invocation: &Invocation) -> Result<LogRouter, CliError> {
    match &invocation.log_settings {
        Some(path) => {
            let settings = LoggingSettings::load(path)?;
            Ok(LogRouter::from_settings(&settings)?)
        }
        None => Ok(LogRouter::for_verbosity(invocation.verbosity).with_printer(LineSink::stderr())),
    }
}

fn merge<F, S>(fs: F, invocation: &Invocation, sink: &mut S) -> Result<MergeRun, MergeError>
where
    F: FileSystem,
    S: LogSink + ?Sized,
{
    let engine = MergeEngine::new(fs).with_options(invocation.options);
    match invocation.mode {
        MergeMode::IntoDestination => {
            engine.merge_into(&invocation.source_a, &invocation.destination, sink)
        }
        MergeMode::Bidirectional | MergeMode::OneWayDiff => engine.run(
            &invocation.source_a,
            &invocation.source_b,
            &invocation.destination,
            sink,
        ),
    }
}

fn write_report<Out: Write>(run: &MergeRun, stdout: &mut Out) -> io::Result<()> {
    for line in run.plan().report_lines() {
        writeln!(stdout, "{line}")?;
    }
    match run.summary() {
        Some(summary) => writeln!(stdout, "{summary}")?,
        None => writeln!(
            stdout,
            "{} planned, {} excluded, none executed",
            run.planned(),
            run.excluded()
        )?,
    }
    stdout.flush()
}

fn exit_status(run: &MergeRun) -> i32 {
    if run.summary().is_some_and(|summary| summary.has_failures()) {
        PARTIAL_FAILURE_EXIT_CODE
    } else {
        0
    }
}

fn report_error<Err: Write>(error: &CliError, stderr: &mut Err) -> i32 {
    let _ = writeln!(stderr, "{PROGRAM_NAME}: error: {error}");
    1
}

fn report_io<Err: Write>(result: io::Result<()>, stderr: &mut Err) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: error: failed to write output: {error}");
            1
        }
    }
}
