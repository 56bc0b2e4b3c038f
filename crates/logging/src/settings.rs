//! JSON logging settings.
//!
//! ```json
//! {
//!   "do_logging": true,
//!   "console": { "enable": true },
//!   "file": { "enable": true, "clear": false, "output_filename": "merge.log", "max_file_size": 1048576 },
//!   "types": { "general": true, "copy": true, "conflict": true, "compare": false },
//!   "do_timestamp": true,
//!   "do_type": true
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::LogCategory;
use crate::error::LogError;
use crate::printer::{CombinedPrinter, LineSink, Printer, RotatingFilePrinter};
use crate::router::LogRouter;

/// Console printer settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Print to standard output.
    #[serde(default = "enabled")]
    pub enable: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self { enable: true }
    }
}

/// Log file printer settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Append to a log file.
    #[serde(default)]
    pub enable: bool,
    /// Truncate the log file (and drop its backup) when the printer opens.
    #[serde(default)]
    pub clear: bool,
    /// Log file path; required when `enable` is set.
    #[serde(default)]
    pub output_filename: Option<PathBuf>,
    /// Rotate into `<file>.backup` once the file reaches this many bytes.
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

/// Complete router configuration.
///
/// Keys missing from a settings document take their values from
/// [`LoggingSettings::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Master switch. When off, categories still register but nothing prints.
    pub do_logging: bool,
    /// Console output.
    pub console: ConsoleSettings,
    /// File output.
    pub file: FileSettings,
    /// Category name → enabled.
    pub types: BTreeMap<String, bool>,
    /// Prefix lines with a timestamp.
    pub do_timestamp: bool,
    /// Prefix lines with the category name.
    pub do_type: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            do_logging: true,
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
            types: LogCategory::ALL
                .into_iter()
                .map(|category| (category.as_str().to_string(), category != LogCategory::Compare))
                .collect(),
            do_timestamp: true,
            do_type: true,
        }
    }
}

impl LoggingSettings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, LogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn load(path: &Path) -> Result<Self, LogError> {
        let contents = fs::read_to_string(path).map_err(|source| LogError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Resolves the `types` table into categories.
    pub fn categories(&self) -> Result<Vec<(LogCategory, bool)>, LogError> {
        self.types
            .iter()
            .map(|(name, enabled)| Ok((name.parse::<LogCategory>()?, *enabled)))
            .collect()
    }

    fn printer(&self) -> Result<Option<Box<dyn Printer>>, LogError> {
        if !self.do_logging {
            return Ok(None);
        }

        let file = if self.file.enable {
            let path = self.file.output_filename.clone().ok_or_else(|| {
                LogError::InvalidSettings(
                    "file logging is enabled but no output_filename is set".to_string(),
                )
            })?;
            let printer = RotatingFilePrinter::open(&path, self.file.clear, self.file.max_file_size)
                .map_err(|source| LogError::Io { path, source })?;
            Some(printer)
        } else {
            None
        };

        let printer: Option<Box<dyn Printer>> = match (self.console.enable, file) {
            (true, Some(file)) => Some(Box::new(
                CombinedPrinter::new().with(LineSink::stdout()).with(file),
            )),
            (true, None) => Some(Box::new(LineSink::stdout())),
            (false, Some(file)) => Some(Box::new(file)),
            (false, None) => None,
        };
        Ok(printer)
    }
}

impl LogRouter {
    /// Builds a router from [`LoggingSettings`].
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self, LogError> {
        let mut router = Self::new()
            .with_boxed_printer(settings.printer()?)
            .show_category(settings.do_type)
            .show_timestamp(settings.do_timestamp);
        for (category, enabled) in settings.categories()? {
            router = router.register(category, enabled);
        }
        Ok(router)
    }
}
