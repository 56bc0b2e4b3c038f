//! Line printers used by [`LogRouter`](crate::LogRouter).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::line_mode::LineMode;

/// Destination for fully rendered log lines.
pub trait Printer: Send {
    /// Writes a single rendered line.
    fn print_line(&mut self, line: &str) -> io::Result<()>;
}

/// Streaming printer that writes lines into an [`io::Write`] target.
///
/// The sink owns the underlying writer and applies the configured
/// [`LineMode`] to every line, emitting one line per call by default.
///
/// # Examples
///
/// ```
/// use logging::{LineMode, LineSink, Printer};
///
/// let mut sink = LineSink::new(Vec::new());
/// sink.print_line("first")?;
/// sink.print_line("second")?;
/// assert_eq!(sink.into_inner(), b"first\nsecond\n".to_vec());
///
/// let mut bare = LineSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
/// bare.print_line("ready")?;
/// assert_eq!(bare.into_inner(), b"ready".to_vec());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineSink<W> {
    writer: W,
    line_mode: LineMode,
}

impl<W> LineSink<W> {
    /// Creates a sink that appends a newline after each line.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub const fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self { writer, line_mode }
    }

    /// Returns the current [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineSink<io::Stdout> {
    /// Console printer writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl LineSink<io::Stderr> {
    /// Console printer writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W> Printer for LineSink<W>
where
    W: Write + Send,
{
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        if self.line_mode.append_newline() {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()
    }
}

/// Appends lines to a log file, rotating it into a backup once it grows too large.
///
/// When the file has reached `max_size` bytes before a write, its contents are
/// copied to `<file><backup_suffix>` and the file is truncated. Only one backup
/// generation is kept.
#[derive(Debug)]
pub struct RotatingFilePrinter {
    path: PathBuf,
    backup_path: PathBuf,
    max_size: Option<u64>,
}

impl RotatingFilePrinter {
    /// Suffix appended to the log path to name the backup file.
    pub const DEFAULT_BACKUP_SUFFIX: &'static str = ".backup";

    /// Opens (creating when missing) the log file at `path`.
    ///
    /// With `clear` set, the log file is truncated and any existing backup
    /// removed.
    pub fn open(path: impl Into<PathBuf>, clear: bool, max_size: Option<u64>) -> io::Result<Self> {
        Self::open_with_suffix(path, clear, max_size, Self::DEFAULT_BACKUP_SUFFIX)
    }

    /// Same as [`open`](Self::open) with a custom backup suffix.
    pub fn open_with_suffix(
        path: impl Into<PathBuf>,
        clear: bool,
        max_size: Option<u64>,
        backup_suffix: &str,
    ) -> io::Result<Self> {
        let path = path.into();
        let mut backup = path.clone().into_os_string();
        backup.push(backup_suffix);
        let backup_path = PathBuf::from(backup);

        OpenOptions::new().create(true).append(true).open(&path)?;
        if clear {
            File::create(&path)?;
            if backup_path.exists() {
                fs::remove_file(&backup_path)?;
            }
        }

        Ok(Self {
            path,
            backup_path,
            max_size,
        })
    }

    /// Path of the active log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the single backup generation.
    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    fn rotate_if_full(&self) -> io::Result<()> {
        let Some(limit) = self.max_size else {
            return Ok(());
        };
        let size = fs::metadata(&self.path).map_or(0, |metadata| metadata.len());
        if size >= limit {
            fs::copy(&self.path, &self.backup_path)?;
            File::create(&self.path)?;
        }
        Ok(())
    }
}

impl Printer for RotatingFilePrinter {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.rotate_if_full()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")
    }
}

/// Fans every line out to several printers.
///
/// All printers are attempted; the first failure is returned afterwards.
#[derive(Default)]
pub struct CombinedPrinter {
    printers: Vec<Box<dyn Printer>>,
}

impl CombinedPrinter {
    /// Creates an empty combined printer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a printer to the fan-out list.
    #[must_use]
    pub fn with(mut self, printer: impl Printer + 'static) -> Self {
        self.printers.push(Box::new(printer));
        self
    }

    /// Number of printers receiving each line.
    #[must_use]
    pub fn len(&self) -> usize {
        self.printers.len()
    }

    /// Whether no printers are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.printers.is_empty()
    }
}

impl Printer for CombinedPrinter {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        let mut first_error = None;
        for printer in &mut self.printers {
            if let Err(error) = printer.print_line(line) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Captures lines in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryPrinter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryPrinter {
    /// Creates an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Printer for MemoryPrinter {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}
