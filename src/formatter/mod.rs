mod layout;
pub mod markup;
pub mod string;

use std::fmt;

use crate::fragment::DisplayFragment;
use crate::node::Node;

/// The closed set of output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    String,
    Markup,
}

impl OutputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Markup => "markup",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a formatter, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatterOutput {
    String(String),
    Markup(Vec<DisplayFragment>),
}

impl FormatterOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::String(_) => OutputKind::String,
            Self::Markup(_) => OutputKind::Markup,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(s) => Some(s),
            Self::Markup(_) => None,
        }
    }

    pub fn into_fragments(self) -> Option<Vec<DisplayFragment>> {
        match self {
            Self::Markup(fragments) => Some(fragments),
            Self::String(_) => None,
        }
    }
}

/// Dispatch to the formatter for `kind`. Pure and infallible.
pub fn format(root: &Node, kind: OutputKind) -> FormatterOutput {
    match kind {
        OutputKind::String => FormatterOutput::String(string::format(root)),
        OutputKind::Markup => FormatterOutput::Markup(markup::format(root)),
    }
}
