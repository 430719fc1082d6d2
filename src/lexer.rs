use memchr::{memchr, memchr2};
use smallvec::SmallVec;

use crate::dialect::{PlaceholderStyle, QuoteStyle};
use crate::keywords::KeywordSet;
use crate::token::{Pos, Punct, Token, TokenKind};

/// Lexical conventions the lexer honors: resolved from a dialect preset
/// plus explicit config overrides.
#[derive(Debug, Clone)]
pub struct Syntax {
    pub quotes: SmallVec<[QuoteStyle; 3]>,
    pub placeholders: SmallVec<[PlaceholderStyle; 4]>,
    pub keywords: KeywordSet,
    pub backslash_escapes: bool,
}

impl Syntax {
    fn quotes_with(&self, style: QuoteStyle) -> bool {
        self.quotes.contains(&style)
    }

    fn allows(&self, style: PlaceholderStyle) -> bool {
        self.placeholders.contains(&style)
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            quotes: QuoteStyle::ALL.iter().copied().collect(),
            placeholders: PlaceholderStyle::ALL.iter().copied().collect(),
            keywords: KeywordSet::Ansi,
            backslash_escapes: false,
        }
    }
}

/// Tokenize the whole input. Never fails: every byte of `source` ends up in
/// exactly one token, and concatenating the token texts gives `source` back.
pub fn tokenize(source: &str, syntax: &Syntax) -> Vec<Token> {
    Lexer::new(source, syntax).collect()
}

/// Lazy, single-pass lexer. Yields tokens in source order.
pub struct Lexer<'a> {
    source: &'a str,
    syntax: &'a Syntax,
    pos: Pos,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, syntax: &'a Syntax) -> Self {
        Self {
            source,
            syntax,
            pos: 0,
        }
    }

    /// Byte offset of the next token.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    fn lex_one(&mut self) -> Token {
        let remaining = &self.source[self.pos..];
        let (kind, len) = self.classify(remaining);
        // Scanners stop before an ASCII byte, after a whole char, or at end
        // of input, so `len` always lands on a char boundary.
        let token = Token::new(kind, &remaining[..len], self.pos);
        self.pos += len;
        token
    }

    /// Decide the kind and byte length of the token at the start of `text`.
    /// `text` is never empty.
    fn classify(&self, text: &str) -> (TokenKind, usize) {
        let bytes = text.as_bytes();
        let first = bytes[0];
        let second = bytes.get(1).copied();

        if first.is_ascii_whitespace() {
            return (TokenKind::Whitespace, scan_whitespace(bytes));
        }

        match (first, second) {
            (b'-', Some(b'-')) => return (TokenKind::Comment, scan_line_comment(bytes)),
            (b'/', Some(b'*')) => return (TokenKind::Comment, scan_block_comment(bytes)),
            _ => {}
        }

        if first == b'\'' {
            return match scan_string(bytes, self.syntax.backslash_escapes) {
                Some(len) => (TokenKind::StringLiteral, len),
                None => (TokenKind::Unknown, bytes.len()),
            };
        }

        if let Some(style) = QuoteStyle::from_open(first) {
            if self.syntax.quotes_with(style) {
                return match scan_quoted_name(bytes, style.close()) {
                    Some(len) => (TokenKind::QuotedIdentifier, len),
                    None => (TokenKind::Unknown, bytes.len()),
                };
            }
        }

        if first.is_ascii_digit() {
            return (TokenKind::NumberLiteral, scan_number(bytes));
        }

        if let Some(len) = self.scan_placeholder(text) {
            return (TokenKind::Placeholder, len);
        }

        let len = scan_word(text);
        if len > 0 {
            let kind = if self.syntax.keywords.contains(&text[..len]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return (kind, len);
        }

        if let Some(len) = scan_operator(bytes) {
            return (TokenKind::Operator, len);
        }

        if let Some(punct) = Punct::from_byte(first) {
            return (TokenKind::Punctuation(punct), 1);
        }

        let char_len = text.chars().next().map_or(1, char::len_utf8);
        (TokenKind::Unknown, char_len)
    }

    /// `text` starts with an ASCII sigil, so slicing past it stays on a char
    /// boundary.
    fn scan_placeholder(&self, text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        match bytes[0] {
            b'%' if self.syntax.allows(PlaceholderStyle::Percent) => scan_percent_placeholder(text),
            b'?' if self.syntax.allows(PlaceholderStyle::Question) => Some(1 + scan_digits(&bytes[1..])),
            b'$' if self.syntax.allows(PlaceholderStyle::Dollar) => {
                let digits = scan_digits(&bytes[1..]);
                (digits > 0).then_some(1 + digits)
            }
            b':' if self.syntax.allows(PlaceholderStyle::Colon) => {
                // `::` is a cast operator, never a placeholder.
                if bytes.get(1) == Some(&b':') {
                    return None;
                }
                let name = scan_word(&text[1..]);
                (name > 0).then_some(1 + name)
            }
            _ => None,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.source.len() {
            return None;
        }
        Some(self.lex_one())
    }
}

// ---- Scanners: each returns a byte length measured from bytes[0] ----


fn scan_whitespace(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len())
}

/// Scan an identifier: letters, digits and underscores, including non-ASCII
/// letters so unicode names stay whole. Callers have already ruled out a
/// leading digit.
#[inline]
fn scan_word(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphanumeric() || b == b'_' {
            i += 1;
            continue;
        }
        if b.is_ascii() {
            break;
        }
        match text[i..].chars().next() {
            Some(c) if c.is_alphanumeric() => i += c.len_utf8(),
            _ => break,
        }
    }
    i
}

fn scan_digits(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len())
}

/// Scan a number starting at bytes[0]: integer, decimal, or scientific
/// notation. Underscore digit separators are accepted.
fn scan_number(bytes: &[u8]) -> usize {
    let len = bytes.len();
    let mut i = 0;

    while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        i += 1;
    }

    if i < len && bytes[i] == b'.' {
        i += 1;
        while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
            i += 1;
        }
    }

    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < len && bytes[j].is_ascii_digit() {
            i = j;
            while i < len && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }

    i
}

/// Scan a single-quoted string literal. A doubled quote is an escaped quote;
/// with `backslash_escapes`, so is `\'`. Returns `None` when unterminated.
fn scan_string(bytes: &[u8], backslash_escapes: bool) -> Option<usize> {
    let mut i = 1;
    while i < bytes.len() {
        let offset = if backslash_escapes {
            memchr2(b'\'', b'\\', &bytes[i..])?
        } else {
            memchr(b'\'', &bytes[i..])?
        };
        let pos = i + offset;
        if bytes[pos] == b'\\' {
            i = pos + 2;
            continue;
        }
        if bytes.get(pos + 1) == Some(&b'\'') {
            i = pos + 2;
            continue;
        }
        return Some(pos + 1);
    }
    None
}

/// Scan a delimited name such as `"users"` or `[order]`. A doubled closing
/// delimiter is an escape. Returns `None` when unterminated.
fn scan_quoted_name(bytes: &[u8], close: u8) -> Option<usize> {
    let mut i = 1;
    while i < bytes.len() {
        let pos = i + memchr(close, &bytes[i..])?;
        if bytes.get(pos + 1) == Some(&close) {
            i = pos + 2;
            continue;
        }
        return Some(pos + 1);
    }
    None
}

/// Scan a line comment. The terminating newline is not part of the comment.
fn scan_line_comment(bytes: &[u8]) -> usize {
    memchr(b'\n', bytes).unwrap_or(bytes.len())
}

/// Scan a block comment. `bytes` starts at `/*`. An unterminated comment runs
/// to end of input.
fn scan_block_comment(bytes: &[u8]) -> usize {
    let mut i = 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// `%s` or pyformat `%(name)s`.
fn scan_percent_placeholder(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.get(1)? {
        b's' => Some(2),
        b'(' => {
            let name = scan_word(&text[2..]);
            let close = 2 + name;
            (name > 0 && bytes.get(close) == Some(&b')') && bytes.get(close + 1) == Some(&b's'))
                .then_some(close + 2)
        }
        _ => None,
    }
}

/// Maximal munch over the operator set.
fn scan_operator(bytes: &[u8]) -> Option<usize> {
    if let [a, b, ..] = bytes {
        if matches!(
            (a, b),
            (b'<', b'>')
                | (b'<', b'=')
                | (b'>', b'=')
                | (b'!', b'=')
                | (b'|', b'|')
                | (b':', b':')
        ) {
            return Some(2);
        }
    }
    match bytes[0] {
        b'=' | b'<' | b'>' | b'+' | b'-' | b'*' | b'/' | b'%' => Some(1),
        _ => None,
    }
}
