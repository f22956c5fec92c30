//! Status line formatting.
//!
//! Informational lines go to stdout; warnings and errors go to stderr so
//! machine-readable output on stdout stays clean.
//!
//! # Examples
//!
//! ```
//! use docfuse::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Reading 3 documents...");
//! formatter.success("Merge completed");
//! formatter.warning("1 document replaced by a placeholder page");
//! ```

use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Progress and plain information.
    Info,
    /// A step finished.
    Success,
    /// Something the user should look at; the run continues.
    Warning,
    /// The run failed.
    Error,
    /// Extra detail for `--verbose`.
    Debug,
}

impl MessageLevel {
    /// Prefix symbol and ANSI color.
    fn decoration(self) -> (&'static str, &'static str) {
        match self {
            Self::Info => ("", ""),
            Self::Success => ("✓ ", "\x1b[32m"),
            Self::Warning => ("⚠ ", "\x1b[33m"),
            Self::Error => ("✗ ", "\x1b[31m"),
            Self::Debug => ("→ ", "\x1b[36m"),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// How much the formatter prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    /// Status lines.
    #[default]
    Normal,
    /// Status lines plus details and statistics.
    Verbose,
}

/// Prints status lines according to a [`Verbosity`].
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    verbosity: Verbosity,
    colored: bool,
}

impl OutputFormatter {
    /// Create a formatter from the `--quiet` and `--verbose` flags.
    ///
    /// `quiet` wins when both are set.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let verbosity = match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        };
        Self::with_verbosity(verbosity)
    }

    /// Create a formatter with an explicit verbosity.
    ///
    /// Colors are used when stdout is a terminal and `TERM` is set.
    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Warnings and errors only.
    pub fn quiet() -> Self {
        Self::with_verbosity(Verbosity::Quiet)
    }

    /// Everything, including details.
    pub fn verbose() -> Self {
        Self::with_verbosity(Verbosity::Verbose)
    }

    /// Never emit ANSI escapes.
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// The configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Plain status line.
    pub fn info(&self, message: &str) {
        self.emit(Verbosity::Normal, MessageLevel::Info, message);
    }

    /// Completed step.
    pub fn success(&self, message: &str) {
        self.emit(Verbosity::Normal, MessageLevel::Success, message);
    }

    /// Shown at every verbosity.
    pub fn warning(&self, message: &str) {
        self.emit(Verbosity::Quiet, MessageLevel::Warning, message);
    }

    /// Shown at every verbosity.
    pub fn error(&self, message: &str) {
        self.emit(Verbosity::Quiet, MessageLevel::Error, message);
    }

    /// Verbose only.
    pub fn debug(&self, message: &str) {
        self.emit(Verbosity::Verbose, MessageLevel::Debug, message);
    }

    fn emit(&self, min: Verbosity, level: MessageLevel, message: &str) {
        if self.verbosity < min {
            return;
        }
        let line = self.render(level, message);
        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// The line as it would be printed: prefix symbol, then the message,
    /// wrapped in the level's color when colors are on.
    pub fn render(&self, level: MessageLevel, message: &str) -> String {
        let (prefix, color) = level.decoration();
        if self.colored && !color.is_empty() {
            format!("{color}{prefix}{message}{RESET}")
        } else {
            format!("{prefix}{message}")
        }
    }

    /// Section title preceded by an empty line.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("\n{title}");
        }
    }

    /// Indented `label: value` line, verbose only.
    pub fn detail(&self, label: &str, value: &str) {
        if self.is_verbose() {
            println!("  {label}: {value}");
        }
    }

    /// Empty line.
    pub fn blank_line(&self) {
        if self.should_print() {
            println!();
        }
    }

    /// Numbered line; `index` is 1-based.
    pub fn list_item(&self, index: usize, message: &str) {
        if self.should_print() {
            println!("  {index}. {message}");
        }
    }

    /// Whether status lines are printed at all.
    pub fn should_print(&self) -> bool {
        self.verbosity >= Verbosity::Normal
    }

    /// Whether details are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Whether only warnings and errors are printed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::with_verbosity(Verbosity::Normal)
    }
}
