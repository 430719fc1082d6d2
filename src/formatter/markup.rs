use crate::formatter::layout::{layout, Piece};
use crate::fragment::{DisplayFragment, DisplayKind};
use crate::node::Node;
use crate::token::{Token, TokenKind};

/// Render the tree as a flat sequence of typed fragments. Spacing matches
/// the string formatter exactly: concatenating the fragment texts gives the
/// same string.
pub fn format(root: &Node) -> Vec<DisplayFragment> {
    let pieces = layout(root);
    let mut fragments = Vec::with_capacity(pieces.len());
    let mut prev: Option<TokenKind> = None;

    for piece in pieces {
        match piece {
            Piece::Token(token) => {
                fragments.push(DisplayFragment::new(display_kind(token, prev), token.text.clone()));
                if !token.kind.is_trivia() {
                    prev = Some(token.kind);
                }
            }
            Piece::Separator(comma) => {
                fragments.push(DisplayFragment::generic(comma.text.clone()));
                prev = Some(comma.kind);
            }
            Piece::Gap(gap) => fragments.push(DisplayFragment::generic(gap.as_str())),
        }
    }

    fragments
}

/// `*` right after a keyword, `(`, `,`, `.` or at the start selects columns;
/// it is displayed as plain text rather than as an arithmetic operator.
fn display_kind(token: &Token, prev: Option<TokenKind>) -> DisplayKind {
    if token.kind == TokenKind::Operator && token.text == "*" {
        let wildcard = prev.map_or(true, TokenKind::opens_wildcard_position);
        if wildcard {
            return DisplayKind::Generic;
        }
    }
    DisplayKind::from(token.kind)
}
