use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::Config;
use crate::diagnostic::{report_guarded, DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::error::{ParseError, SqlishError};
use crate::formatter::{self, FormatterOutput, OutputKind};
use crate::fragment::DisplayFragment;
use crate::lexer::{self, Lexer, Syntax};
use crate::node::Node;
use crate::parser::Parser;
use crate::report::{FileResult, FileStatus, Report};
use crate::token::Token;

/// Result of one facade call, with a flag telling whether the fallback was
/// used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub output: FormatterOutput,
    pub fell_back: bool,
}

/// Entry point: tokenize, parse, and format SQL fragments.
///
/// Holds only immutable configuration and a shared diagnostic sink, so one
/// instance can serve any number of threads. No call ever fails: when the
/// parser hits a limit the failure is reported to the sink and the raw input
/// comes back unchanged.
#[derive(Clone)]
pub struct SqlishFormatter {
    syntax: Syntax,
    parser: Parser,
    sink: Arc<dyn DiagnosticSink>,
}

impl SqlishFormatter {
    /// Default configuration, reporting through `tracing`.
    pub fn new() -> Self {
        Self {
            syntax: Syntax::default(),
            parser: Parser::default(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SqlishError> {
        config.validate()?;
        Ok(Self {
            syntax: config.syntax()?,
            parser: Parser::new(config.limits()),
            sink: Arc::new(TracingSink),
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    pub fn tokenize(&self, raw: &str) -> Vec<Token> {
        lexer::tokenize(raw, &self.syntax)
    }

    pub fn parse(&self, raw: &str) -> Result<Node, ParseError> {
        self.parser.parse(Lexer::new(raw, &self.syntax))
    }

    /// Normalized SQL string, or `raw` unchanged if parsing failed.
    pub fn to_string(&self, raw: &str) -> String {
        match self.to_format(raw, OutputKind::String) {
            FormatterOutput::String(s) => s,
            FormatterOutput::Markup(_) => raw.to_string(),
        }
    }

    /// Display fragments, or a single generic fragment holding `raw` if
    /// parsing failed.
    pub fn to_markup_fragments(&self, raw: &str) -> Vec<DisplayFragment> {
        match self.to_format(raw, OutputKind::Markup) {
            FormatterOutput::Markup(fragments) => fragments,
            FormatterOutput::String(_) => vec![DisplayFragment::generic(raw)],
        }
    }

    pub fn to_format(&self, raw: &str, kind: OutputKind) -> FormatterOutput {
        self.format_with_status(raw, kind).output
    }

    pub fn format_with_status(&self, raw: &str, kind: OutputKind) -> Formatted {
        let span = tracing::debug_span!("sqlish.to_format", format = %kind, len = raw.len());
        let _enter = span.enter();

        match self.parse(raw) {
            Ok(root) => {
                tracing::trace!(tokens = root.tokens().len(), depth = root.depth(), "parsed");
                Formatted {
                    output: formatter::format(&root, kind),
                    fell_back: false,
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "falling back to raw input");
                let event = DiagnosticEvent::from_parse_error(&err, raw);
                report_guarded(self.sink.as_ref(), &event);
                Formatted {
                    output: fallback(raw, kind),
                    fell_back: true,
                }
            }
        }
    }
}

impl Default for SqlishFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SqlishFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SqlishFormatter")
            .field("syntax", &self.syntax)
            .field("limits", &self.parser.limits())
            .finish()
    }
}

fn fallback(raw: &str, kind: OutputKind) -> FormatterOutput {
    match kind {
        OutputKind::String => FormatterOutput::String(raw.to_string()),
        OutputKind::Markup => FormatterOutput::Markup(vec![DisplayFragment::generic(raw)]),
    }
}

/// Normalize a SQL string with the given configuration.
pub fn format_string(source: &str, config: &Config) -> Result<String, SqlishError> {
    let formatter = SqlishFormatter::from_config(config)?;
    Ok(formatter.to_string(source))
}

/// Format many files in parallel with one shared formatter. Results keep
/// the order of `paths`.
pub fn format_files(paths: &[PathBuf], kind: OutputKind, formatter: &SqlishFormatter) -> Report {
    let results: Vec<FileResult> = paths
        .par_iter()
        .map(|path| format_file(path, kind, formatter))
        .collect();

    let mut report = Report::new();
    for result in results {
        report.add(result);
    }
    report
}

fn format_file(path: &Path, kind: OutputKind, formatter: &SqlishFormatter) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return FileResult {
                path: path.to_path_buf(),
                status: FileStatus::Error,
                output: None,
                error: Some(format!("Read error: {}", e)),
            };
        }
    };

    let formatted = formatter.format_with_status(&source, kind);
    FileResult {
        path: path.to_path_buf(),
        status: if formatted.fell_back {
            FileStatus::FellBack
        } else {
            FileStatus::Formatted
        },
        output: Some(formatted.output),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{PlaceholderStyle, QuoteStyle};
    use crate::fragment::DisplayKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<DiagnosticEvent>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn report(&self, event: &DiagnosticEvent) -> Result<(), crate::diagnostic::SinkError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn recording() -> (SqlishFormatter, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let formatter = SqlishFormatter::new().with_sink(sink.clone());
        (formatter, sink)
    }

    #[test]
    fn test_to_string_normalizes() {
        let formatter = SqlishFormatter::new();
        assert_eq!(formatter.to_string("SELECT   *   FROM  t"), "SELECT * FROM t");
    }

    #[test]
    fn test_fallback_on_deep_nesting() {
        let (formatter, sink) = recording();
        let raw = format!("select {}", "(".repeat(1000));

        assert_eq!(formatter.to_string(&raw), raw);
        assert_eq!(sink.events.lock().unwrap().len(), 1);

        let fragments = formatter.to_markup_fragments(&raw);
        assert_eq!(fragments, vec![DisplayFragment::generic(raw.as_str())]);
        assert_eq!(fragments[0].kind, DisplayKind::Generic);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].message.contains("max nesting depth"));
        assert_eq!(events[0].position, Some(71));
    }

    #[test]
    fn test_unterminated_group_is_not_reported() {
        let (formatter, sink) = recording();
        let out = formatter.format_with_status("SELECT * FROM t WHERE x IN (1, 2, 3", OutputKind::String);
        assert!(!out.fell_back);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_limits() {
        let config = Config {
            max_token_count: 3,
            ..Config::default()
        };
        let (_, sink) = recording();
        let formatter = SqlishFormatter::from_config(&config)
            .unwrap()
            .with_sink(sink.clone());
        assert_eq!(formatter.to_string("a b c d"), "a b c d");
        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].message.contains("max token count"));
    }

    #[test]
    fn test_from_config_resolves_syntax() {
        let config = Config {
            dialect: "sqlserver".to_string(),
            ..Config::default()
        };
        let formatter = SqlishFormatter::from_config(&config).unwrap();
        assert!(formatter.syntax().quotes.contains(&QuoteStyle::Bracket));
        assert!(!formatter.syntax().quotes.contains(&QuoteStyle::Backtick));
        assert!(formatter.syntax().placeholders.contains(&PlaceholderStyle::Colon));
        assert!(!SqlishFormatter::new().syntax().backslash_escapes);
    }

    #[test]
    fn test_nesting_at_large_configured_limit() {
        let config = Config {
            max_nesting_depth: 10_000,
            ..Config::default()
        };
        let (_, sink) = recording();
        let formatter = SqlishFormatter::from_config(&config)
            .unwrap()
            .with_sink(sink.clone());
        let raw = "(".repeat(9_999);

        let out = formatter.format_with_status(&raw, OutputKind::String);
        assert!(!out.fell_back);
        assert_eq!(out.output, FormatterOutput::String(raw.clone()));
        assert_eq!(formatter.to_markup_fragments(&raw).len(), 9_999);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_rejects_bad_dialect() {
        let config = Config {
            dialect: "oracle".to_string(),
            ..Config::default()
        };
        assert!(SqlishFormatter::from_config(&config).is_err());
        assert!(format_string("select 1", &config).is_err());
    }

    #[test]
    fn test_format_string() {
        assert_eq!(
            format_string("select   1", &Config::default()).unwrap(),
            "select 1"
        );
    }

    #[test]
    fn test_formatter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqlishFormatter>();
    }

    #[test]
    fn test_format_files_keeps_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.sql");
        let b = dir.path().join("b.sql");
        let missing = dir.path().join("missing.sql");
        std::fs::write(&a, "select   1").unwrap();
        std::fs::write(&b, "(".repeat(100)).unwrap();

        let (formatter, sink) = recording();
        let report = format_files(
            &[a.clone(), b.clone(), missing.clone()],
            OutputKind::String,
            &formatter,
        );

        assert_eq!(report.total(), 3);
        assert_eq!(report.results[0].path, a);
        assert_eq!(report.results[0].status, FileStatus::Formatted);
        assert_eq!(
            report.results[0].output,
            Some(FormatterOutput::String("select 1".to_string()))
        );
        assert_eq!(report.results[1].status, FileStatus::FellBack);
        assert_eq!(report.results[2].status, FileStatus::Error);
        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }
}
