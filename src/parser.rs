use smallvec::SmallVec;

use crate::error::ParseError;
use crate::node::{ClauseList, Group, Node};
use crate::token::Token;

/// Bounds on parser work. Exceeding either is the only way parsing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_nesting_depth: usize,
    pub max_token_count: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nesting_depth: 64,
            max_token_count: 10_000,
        }
    }
}

/// Longest `found` snippet carried by a ParseError.
const FOUND_SNIPPET_CHARS: usize = 40;

/// An open `(` waiting for its `)`.
struct Frame {
    open: Token,
    body: ClauseList,
}

/// Groups a token stream into parenthesized groups and comma lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    limits: Limits,
}

impl Parser {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Parse tokens into a root `Node::List`.
    ///
    /// Tokens are pulled one at a time, so an oversized input handed over as
    /// a lazy `Lexer` is rejected without lexing the rest of it. Groups still
    /// open at end of input are closed as unterminated.
    pub fn parse<I>(&self, tokens: I) -> Result<Node, ParseError>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut root = ClauseList::new();
        let mut stack: SmallVec<[Frame; 8]> = SmallVec::new();

        for (count, token) in tokens.into_iter().enumerate() {
            if count >= self.limits.max_token_count {
                return Err(ParseError::TooManyTokens {
                    limit: self.limits.max_token_count,
                    position: token.start,
                    found: snippet(&token.text),
                });
            }

            if token.kind.is_open_paren() {
                if stack.len() >= self.limits.max_nesting_depth {
                    return Err(ParseError::NestingTooDeep {
                        limit: self.limits.max_nesting_depth,
                        position: token.start,
                        found: snippet(&token.text),
                    });
                }
                stack.push(Frame {
                    open: token,
                    body: ClauseList::new(),
                });
            } else if token.kind.is_close_paren() {
                match stack.pop() {
                    Some(frame) => current(&mut root, &mut stack).push(Node::Group(Group {
                        open: frame.open,
                        body: frame.body,
                        close: Some(token),
                    })),
                    // A stray `)` has nothing to close.
                    None => root.push(Node::Leaf(token)),
                }
            } else if token.kind.is_comma() {
                current(&mut root, &mut stack).separate(token);
            } else {
                current(&mut root, &mut stack).push(Node::Leaf(token));
            }
        }

        while let Some(frame) = stack.pop() {
            current(&mut root, &mut stack).push(Node::Group(Group {
                open: frame.open,
                body: frame.body,
                close: None,
            }));
        }

        Ok(Node::List(root))
    }
}

/// The list new nodes belong to: the innermost open group, else the root.
fn current<'s>(root: &'s mut ClauseList, stack: &'s mut [Frame]) -> &'s mut ClauseList {
    match stack.last_mut() {
        Some(frame) => &mut frame.body,
        None => root,
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(FOUND_SNIPPET_CHARS).collect()
}
