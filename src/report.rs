use std::path::PathBuf;

use crate::formatter::FormatterOutput;

/// Outcome of formatting a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Parsed and formatted.
    Formatted,
    /// Hit a parser limit; the output is the raw input.
    FellBack,
    /// The file could not be read.
    Error,
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub output: Option<FormatterOutput>,
    pub error: Option<String>,
}

/// Aggregated results of a batch run.
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

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn formatted(&self) -> usize {
        self.count(FileStatus::Formatted)
    }

    pub fn fell_back(&self) -> usize {
        self.count(FileStatus::FellBack)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("{} file(s) processed", self.total()));
        if self.formatted() > 0 {
            parts.push(format!("{} formatted", self.formatted()));
        }
        if self.fell_back() > 0 {
            parts.push(format!("{} left as-is", self.fell_back()));
        }
        if self.errors() > 0 {
            parts.push(format!("{} error(s)", self.errors()));
        }
        parts.join(", ")
    }

    /// Print error details.
    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(ref error) = result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: FileStatus) -> FileResult {
        FileResult {
            path: PathBuf::from(name),
            status,
            output: None,
            error: (status == FileStatus::Error).then(|| "Read error".to_string()),
        }
    }

    #[test]
    fn test_report_summary() {
        let mut report = Report::new();
        report.add(result("a.sql", FileStatus::Formatted));
        report.add(result("b.sql", FileStatus::FellBack));
        report.add(result("c.sql", FileStatus::Error));

        assert_eq!(report.total(), 3);
        assert_eq!(report.formatted(), 1);
        assert_eq!(report.fell_back(), 1);
        assert_eq!(report.errors(), 1);
        assert!(report.has_errors());
        assert_eq!(
            report.summary(),
            "3 file(s) processed, 1 formatted, 1 left as-is, 1 error(s)"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert!(!report.has_errors());
        assert_eq!(report.summary(), "0 file(s) processed");
    }
}
