use std::io::Write;
use std::path::PathBuf;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Status of splitting a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// File was split successfully.
    Split,
    /// An error occurred while processing the file.
    Error,
}

/// Result of splitting a single file.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub statements: Vec<String>,
    pub error: Option<String>,
}

/// Aggregated report of split results.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn errors(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == FileStatus::Error)
            .count()
    }

    pub fn statements(&self) -> usize {
        self.results.iter().map(|r| r.statements.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("{} file(s) processed", self.total()));
        parts.push(format!("{} statement(s)", self.statements()));
        if self.errors() > 0 {
            parts.push(format!("{} error(s)", self.errors()));
        }
        parts.join(", ")
    }

    /// Print error details to stderr.
    pub fn print_errors(&self, color: bool) {
        let choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        for result in &self.results {
            if let Some(ref error) = result.error {
                let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
                let _ = write!(stderr, "error");
                let _ = stderr.reset();
                let _ = writeln!(stderr, ": {}: {}", result.path.display(), error);
            }
        }
    }
}
