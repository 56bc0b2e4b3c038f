//! Argument parsing with a `clap` builder definition.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};

/// Program name used in diagnostics and the version banner.
pub(crate) const PROGRAM_NAME: &str = "dirmerge";

const HELP_TEXT: &str = "\
dirmerge: compare two directory trees and merge or diff them

Usage: dirmerge [OPTIONS] SOURCE_A SOURCE_B [DEST]

Modes:
  merge   union of SOURCE_A and SOURCE_B into DEST, newer files win
  diff    entries of SOURCE_A and SOURCE_B that the other side lacks, into DEST
  into    merge SOURCE_A into SOURCE_B in place (no DEST operand)

Options:
  -m, --mode MODE              merge (default), diff or into
  -n, --dry-run                plan and report without touching the filesystem
      --plan-only              print the plan without executing it
  -x, --exclude CODE           drop operations with CODE from the plan (repeatable)
      --max-free-fraction F    copies may use at most F of free space (0 < F <= 1)
      --log-settings FILE      configure logging from a JSON settings file
  -v, --verbose                more logging; repeat for comparison traces
  -h, --help                   show this help
  -V, --version                show the version

Operation codes:
  copy-from-a, copy-from-b, newest-from-a, newest-from-b, make-dir, name-kind-conflict

Exit status is 0 on success, 1 on usage errors and 23 when any operation failed.
";

/// Returns the static help text.
pub(crate) const fn help_text() -> &'static str {
    HELP_TEXT
}

#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) dry_run: bool,
    pub(crate) plan_only: bool,
    pub(crate) verbosity: u8,
    pub(crate) mode: Option<OsString>,
    pub(crate) excludes: Vec<OsString>,
    pub(crate) max_free_fraction: Option<OsString>,
    pub(crate) log_settings: Option<PathBuf>,
    pub(crate) operands: Vec<OsString>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show help and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Show version and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .value_name("MODE")
                .help("Merge mode: merge, diff or into.")
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Record mutations instead of performing them.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("plan-only")
                .long("plan-only")
                .help("Print the plan without executing it.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .short('x')
                .value_name("CODE")
                .help("Drop operations with this code from the plan.")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("max-free-fraction")
                .long("max-free-fraction")
                .value_name("F")
                .help("Largest fraction of free space a single copy may use.")
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("log-settings")
                .long("log-settings")
                .value_name("FILE")
                .help("JSON logging settings.")
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase logging detail.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("operands")
                .value_name("PATH")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut arguments: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if arguments.is_empty() {
        arguments.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(arguments)?;

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        dry_run: matches.get_flag("dry-run"),
        plan_only: matches.get_flag("plan-only"),
        verbosity: matches.get_count("verbose"),
        mode: matches.remove_one::<OsString>("mode"),
        excludes: matches
            .remove_many::<OsString>("exclude")
            .map(Iterator::collect)
            .unwrap_or_default(),
        max_free_fraction: matches.remove_one::<OsString>("max-free-fraction"),
        log_settings: matches
            .remove_one::<OsString>("log-settings")
            .map(PathBuf::from),
        operands: matches
            .remove_many::<OsString>("operands")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}
