use serde::Deserialize;

use crate::error::SqlishError;

/// Delimiters accepted around quoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `"name"`, escaped as `""`.
    Double,
    /// `` `name` ``, escaped as a doubled backtick.
    Backtick,
    /// `[name]`, escaped as `]]`.
    Bracket,
}

impl QuoteStyle {
    pub const ALL: &'static [QuoteStyle] = &[Self::Double, Self::Backtick, Self::Bracket];

    /// Returns the style opened by `b`, if any.
    pub fn from_open(b: u8) -> Option<Self> {
        match b {
            b'"' => Some(Self::Double),
            b'`' => Some(Self::Backtick),
            b'[' => Some(Self::Bracket),
            _ => None,
        }
    }

    pub fn close(self) -> u8 {
        match self {
            Self::Double => b'"',
            Self::Backtick => b'`',
            Self::Bracket => b']',
        }
    }
}

/// Parameter-binding markers recognized as placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `%s` and `%(name)s`.
    Percent,
    /// `?`.
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:name`.
    Colon,
}

impl PlaceholderStyle {
    pub const ALL: &'static [PlaceholderStyle] =
        &[Self::Percent, Self::Question, Self::Dollar, Self::Colon];
}

/// A SQL dialect bundles the lexical conventions of one database family.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn quote_styles(&self) -> &'static [QuoteStyle] {
        QuoteStyle::ALL
    }

    fn placeholder_styles(&self) -> &'static [PlaceholderStyle] {
        PlaceholderStyle::ALL
    }

    /// Whether `\'` escapes a quote inside string literals.
    fn backslash_escapes(&self) -> bool {
        false
    }
}

/// The default dialect. Accepts every quoting and placeholder convention,
/// since traced SQL rarely says where it came from.
pub struct Polyglot;

impl Dialect for Polyglot {
    fn name(&self) -> &'static str {
        "polyglot"
    }
}

/// PostgreSQL: double-quoted names, `$1` and psycopg-style `%s` parameters.
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_styles(&self) -> &'static [QuoteStyle] {
        &[QuoteStyle::Double]
    }

    fn placeholder_styles(&self) -> &'static [PlaceholderStyle] {
        &[PlaceholderStyle::Dollar, PlaceholderStyle::Percent]
    }
}

/// MySQL: backtick names, `?` and `%s` parameters, backslash escapes.
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_styles(&self) -> &'static [QuoteStyle] {
        &[QuoteStyle::Backtick, QuoteStyle::Double]
    }

    fn placeholder_styles(&self) -> &'static [PlaceholderStyle] {
        &[PlaceholderStyle::Question, PlaceholderStyle::Percent]
    }

    fn backslash_escapes(&self) -> bool {
        true
    }
}

/// SQL Server: bracketed names, `?` and `:name` parameters.
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_styles(&self) -> &'static [QuoteStyle] {
        &[QuoteStyle::Bracket, QuoteStyle::Double]
    }

    fn placeholder_styles(&self) -> &'static [PlaceholderStyle] {
        &[PlaceholderStyle::Question, PlaceholderStyle::Colon]
    }
}

/// Create a dialect from a string name.
pub fn dialect_from_name(name: &str) -> Result<Box<dyn Dialect>, SqlishError> {
    match name.to_ascii_lowercase().as_str() {
        "polyglot" => Ok(Box::new(Polyglot)),
        "postgres" | "postgresql" => Ok(Box::new(Postgres)),
        "mysql" => Ok(Box::new(MySql)),
        "sqlserver" | "mssql" => Ok(Box::new(SqlServer)),
        _ => Err(SqlishError::Config(format!("Unknown dialect: {}", name))),
    }
}
