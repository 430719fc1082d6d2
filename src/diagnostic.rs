use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

use crate::error::ParseError;
use crate::token::Pos;

/// Groups every parse failure under one issue in the collector.
pub const PARSE_ERROR_FINGERPRINT: &str = "sqlish-parse-error";

/// Only the tail of a diagnostic message is kept.
const MESSAGE_TAIL_CHARS: usize = 100;

const FOUND_SNIPPET_CHARS: usize = 40;

/// A parse failure as handed to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    pub fingerprint: &'static str,
    pub message: String,
    pub found: String,
    pub position: Option<Pos>,
}

impl DiagnosticEvent {
    pub fn from_parse_error(err: &ParseError, source: &str) -> Self {
        let message = err.to_string();
        let position = err.position();
        let found = source
            .get(position..)
            .map(|rest| rest.chars().take(FOUND_SNIPPET_CHARS).collect())
            .unwrap_or_else(|| err.found().to_string());
        Self {
            fingerprint: PARSE_ERROR_FINGERPRINT,
            message: tail_chars(&message, MESSAGE_TAIL_CHARS).to_string(),
            found,
            position: Some(position),
        }
    }
}

/// The last `n` chars of `s`.
fn tail_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) if n > 0 => &s[idx..],
        _ if n == 0 => "",
        _ => s,
    }
}

#[derive(Error, Debug)]
#[error("diagnostic sink failed: {0}")]
pub struct SinkError(pub String);

/// Receives parse-failure diagnostics. Implementations must tolerate
/// concurrent calls. Closures of the right shape implement this trait.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, event: &DiagnosticEvent) -> Result<(), SinkError>;
}

impl<F> DiagnosticSink for F
where
    F: Fn(&DiagnosticEvent) -> Result<(), SinkError> + Send + Sync,
{
    fn report(&self, event: &DiagnosticEvent) -> Result<(), SinkError> {
        self(event)
    }
}

/// Emits each diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, event: &DiagnosticEvent) -> Result<(), SinkError> {
        tracing::warn!(
            fingerprint = event.fingerprint,
            position = ?event.position,
            found = %event.found,
            "{}",
            event.message
        );
        Ok(())
    }
}

/// Drops every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _event: &DiagnosticEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Deliver `event`, absorbing sink errors and panics. A broken sink must not
/// change what the caller gets back.
pub(crate) fn report_guarded(sink: &dyn DiagnosticSink, event: &DiagnosticEvent) {
    match catch_unwind(AssertUnwindSafe(|| sink.report(event))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "failed to report sqlish parse error"),
        Err(_) => tracing::warn!("diagnostic sink panicked while reporting sqlish parse error"),
    }
}
