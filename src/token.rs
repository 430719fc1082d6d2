use compact_str::CompactString;

/// Position in source string (byte offset).
pub type Pos = usize;

/// Single-character structural punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    OpenParen,
    CloseParen,
    Comma,
    Dot,
    Semicolon,
}

impl Punct {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'(' => Some(Self::OpenParen),
            b')' => Some(Self::CloseParen),
            b',' => Some(Self::Comma),
            b'.' => Some(Self::Dot),
            b';' => Some(Self::Semicolon),
            _ => None,
        }
    }
}

/// All token kinds recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    QuotedIdentifier,
    StringLiteral,
    NumberLiteral,
    Placeholder,
    Operator,
    Punctuation(Punct),
    Whitespace,
    Comment,
    Unknown,
}

impl TokenKind {
    /// Tokens that are kept in the tree but never influence its structure.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    pub fn is_open_paren(self) -> bool {
        self == Self::Punctuation(Punct::OpenParen)
    }

    pub fn is_close_paren(self) -> bool {
        self == Self::Punctuation(Punct::CloseParen)
    }

    pub fn is_comma(self) -> bool {
        self == Self::Punctuation(Punct::Comma)
    }

    /// Tokens after which a `*` selects columns rather than multiplying.
    pub fn opens_wildcard_position(self) -> bool {
        matches!(
            self,
            Self::Keyword
                | Self::Punctuation(Punct::OpenParen)
                | Self::Punctuation(Punct::Comma)
                | Self::Punctuation(Punct::Dot)
                | Self::Punctuation(Punct::Semicolon)
        )
    }
}

/// An immutable token produced by the lexer. `text` is the exact source
/// slice `source[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub start: Pos,
    pub end: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, start: Pos) -> Self {
        Self {
            kind,
            text: CompactString::from(text),
            start,
            end: start + text.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A `--` comment runs to the end of its line; anything emitted after it
    /// on the same line would become part of the comment.
    pub fn is_line_comment(&self) -> bool {
        self.kind == TokenKind::Comment && self.text.starts_with("--")
    }
}
