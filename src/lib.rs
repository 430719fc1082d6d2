pub mod api;
pub mod config;
pub mod diagnostic;
pub mod dialect;
pub mod error;
pub mod formatter;
pub mod fragment;
pub mod keywords;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod report;
pub mod token;

// Re-export the main public API
pub use api::{format_files, format_string, Formatted, SqlishFormatter};
pub use config::{load_config, Config};
pub use diagnostic::{DiagnosticEvent, DiagnosticSink, NoopSink, SinkError, TracingSink};
pub use error::{ParseError, SqlishError};
pub use formatter::{FormatterOutput, OutputKind};
pub use fragment::{DisplayFragment, DisplayKind};
pub use lexer::tokenize;
pub use token::{Token, TokenKind};
