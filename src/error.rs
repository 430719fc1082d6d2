use thiserror::Error;

use crate::token::Pos;

/// Setup-time errors: building a config or a formatter.
#[derive(Error, Debug)]
pub enum SqlishError {
    #[error("sqlish config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Structural limit violations raised by the parser. These are the only
/// failures the pipeline can produce; the facade recovers from all of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("max nesting depth exceeded: more than {limit} open groups at position {position} near {found:?}")]
    NestingTooDeep {
        limit: usize,
        position: Pos,
        found: String,
    },

    #[error("max token count exceeded: more than {limit} tokens at position {position} near {found:?}")]
    TooManyTokens {
        limit: usize,
        position: Pos,
        found: String,
    },
}

impl ParseError {
    pub fn position(&self) -> Pos {
        match self {
            Self::NestingTooDeep { position, .. } | Self::TooManyTokens { position, .. } => {
                *position
            }
        }
    }

    /// Source text at the failure point.
    pub fn found(&self) -> &str {
        match self {
            Self::NestingTooDeep { found, .. } | Self::TooManyTokens { found, .. } => found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting_message() {
        let err = ParseError::NestingTooDeep {
            limit: 64,
            position: 64,
            found: "((((".to_string(),
        };
        assert!(err.to_string().contains("max nesting depth exceeded"));
        assert_eq!(err.position(), 64);
        assert_eq!(err.found(), "((((");
    }

    #[test]
    fn test_token_count_message() {
        let err = ParseError::TooManyTokens {
            limit: 10,
            position: 20,
            found: "x".to_string(),
        };
        assert!(err.to_string().contains("max token count exceeded"));
        assert_eq!(err.position(), 20);
    }

    #[test]
    fn test_config_error_display() {
        let err = SqlishError::Config("Unknown dialect: oracle".to_string());
        assert_eq!(err.to_string(), "sqlish config error: Unknown dialect: oracle");
    }
}
