use std::fmt;

use compact_str::CompactString;

use crate::token::TokenKind;

/// Display-relevant classification of a fragment. Renderers style by this
/// and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    Keyword,
    Identifier,
    String,
    Number,
    Operator,
    Generic,
}

impl DisplayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Identifier => "Identifier",
            Self::String => "String",
            Self::Number => "Number",
            Self::Operator => "Operator",
            Self::Generic => "Generic",
        }
    }
}

impl fmt::Display for DisplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TokenKind> for DisplayKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Keyword => Self::Keyword,
            TokenKind::Identifier | TokenKind::QuotedIdentifier => Self::Identifier,
            TokenKind::StringLiteral => Self::String,
            TokenKind::NumberLiteral => Self::Number,
            TokenKind::Operator => Self::Operator,
            TokenKind::Placeholder
            | TokenKind::Punctuation(_)
            | TokenKind::Whitespace
            | TokenKind::Comment
            | TokenKind::Unknown => Self::Generic,
        }
    }
}

/// A typed, renderer-ready piece of output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFragment {
    pub kind: DisplayKind,
    pub text: CompactString,
}

impl DisplayFragment {
    pub fn new(kind: DisplayKind, text: impl Into<CompactString>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn generic(text: impl Into<CompactString>) -> Self {
        Self::new(DisplayKind::Generic, text)
    }

    pub fn is_whitespace(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }
}

/// Concatenate fragment texts.
pub fn fragments_text(fragments: &[DisplayFragment]) -> String {
    fragments.iter().map(|f| f.text.as_str()).collect()
}
