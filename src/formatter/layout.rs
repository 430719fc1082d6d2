use crate::node::{Node, Visit};
use crate::token::{Token, TokenKind};

/// Normalized whitespace between two emitted tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Gap {
    Space,
    /// Only used after a `--` comment, which would otherwise swallow
    /// whatever follows it on the line.
    Newline,
}

impl Gap {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Gap::Space => " ",
            Gap::Newline => "\n",
        }
    }
}

/// One unit of normalized output, shared by the string and markup
/// formatters so both agree on spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Token(&'a Token),
    Separator(&'a Token),
    Gap(Gap),
}

/// Flatten the tree into pieces: whitespace runs collapse to one gap,
/// leading and trailing whitespace disappear, and list separators are
/// always rendered as `", "`.
pub(crate) fn layout(root: &Node) -> Vec<Piece<'_>> {
    let mut builder = LayoutBuilder::default();
    root.walk(|visit| match visit {
        Visit::Token(token) => builder.token(token),
        Visit::Separator(comma) => builder.separator(comma),
    });
    builder.pieces
}

#[derive(Default)]
struct LayoutBuilder<'a> {
    pieces: Vec<Piece<'a>>,
    pending: Option<Gap>,
    after_line_comment: bool,
}

impl<'a> LayoutBuilder<'a> {
    fn token(&mut self, token: &'a Token) {
        if token.kind == TokenKind::Whitespace {
            let gap = if self.after_line_comment {
                Gap::Newline
            } else {
                Gap::Space
            };
            self.pending = self.pending.max(Some(gap));
            return;
        }
        self.flush_gap();
        self.pieces.push(Piece::Token(token));
        self.after_line_comment = token.is_line_comment();
    }

    fn separator(&mut self, comma: &'a Token) {
        // Whitespace before a comma is dropped, unless it ends a line comment.
        if self.pending.take() == Some(Gap::Newline) {
            self.pieces.push(Piece::Gap(Gap::Newline));
        }
        self.pieces.push(Piece::Separator(comma));
        self.after_line_comment = false;
        self.pending = Some(Gap::Space);
    }

    fn flush_gap(&mut self) {
        if let Some(gap) = self.pending.take() {
            if !self.pieces.is_empty() {
                self.pieces.push(Piece::Gap(gap));
            }
        }
    }
}
