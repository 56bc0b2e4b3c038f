//! Validation of parsed arguments into a runnable [`Invocation`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use engine::{MergeMode, MergeOptions, OperationCode};

use crate::command::ParsedArgs;
use crate::error::CliError;

/// Verbosity at which the engine traces each comparison.
const COMPARE_TRACE_VERBOSITY: u8 = 2;

/// A fully validated merge request.
#[derive(Debug)]
pub(crate) struct Invocation {
    pub(crate) mode: MergeMode,
    pub(crate) source_a: String,
    pub(crate) source_b: String,
    pub(crate) destination: String,
    pub(crate) options: MergeOptions,
    pub(crate) dry_run: bool,
    pub(crate) max_free_fraction: f64,
    pub(crate) verbosity: u8,
    pub(crate) log_settings: Option<PathBuf>,
}

impl Invocation {
    pub(crate) fn from_parsed(parsed: ParsedArgs) -> Result<Self, CliError> {
        let mode = match parsed.mode {
            Some(raw) => MergeMode::from_str(&utf8("--mode", raw)?)?,
            None => MergeMode::default(),
        };

        let mut operands = parsed
            .operands
            .into_iter()
            .map(|operand| utf8("operand", operand));
        let (source_a, source_b, destination) = match mode {
            MergeMode::IntoDestination => {
                let (a, b) = two_operands(mode, "SOURCE_A SOURCE_B", &mut operands)?;
                (a, b.clone(), b)
            }
            MergeMode::Bidirectional | MergeMode::OneWayDiff => {
                let (a, b) = two_operands(mode, "SOURCE_A SOURCE_B DEST", &mut operands)?;
                let destination = operands.next().ok_or(CliError::MissingOperands {
                    mode: mode.as_str(),
                    expected: "SOURCE_A SOURCE_B DEST",
                })??;
                (a, b, destination)
            }
        };
        if let Some(extra) = operands.next() {
            return Err(CliError::UnexpectedOperand {
                mode: mode.as_str(),
                operand: extra?,
            });
        }

        let mut options = MergeOptions::new()
            .mode(mode)
            .execute(!parsed.plan_only)
            .trace_comparisons(parsed.verbosity >= COMPARE_TRACE_VERBOSITY);
        for raw in parsed.excludes {
            options = options.exclude(OperationCode::from_str(&utf8("--exclude", raw)?)?);
        }

        let max_free_fraction = match parsed.max_free_fraction {
            Some(raw) => parse_fraction(&utf8("--max-free-fraction", raw)?)?,
            None => 1.0,
        };

        Ok(Self {
            mode,
            source_a,
            source_b,
            destination,
            options,
            dry_run: parsed.dry_run,
            max_free_fraction,
            verbosity: parsed.verbosity,
            log_settings: parsed.log_settings,
        })
    }
}

fn two_operands<I>(
    mode: MergeMode,
    expected: &'static str,
    operands: &mut I,
) -> Result<(String, String), CliError>
where
    I: Iterator<Item = Result<String, CliError>>,
{
    let missing = || CliError::MissingOperands {
        mode: mode.as_str(),
        expected,
    };
    let a = operands.next().ok_or_else(missing)??;
    let b = operands.next().ok_or_else(missing)??;
    Ok((a, b))
}

fn utf8(what: &'static str, value: OsString) -> Result<String, CliError> {
    value.into_string().map_err(|value| CliError::NotUtf8 {
        what,
        value: value.to_string_lossy().into_owned(),
    })
}

fn parse_fraction(raw: &str) -> Result<f64, CliError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value > 0.0 && value <= 1.0 => Ok(value),
        _ => Err(CliError::InvalidFraction(raw.to_owned())),
    }
}
