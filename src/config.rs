use std::path::{Path, PathBuf};

use serde::Deserialize;
use smallvec::SmallVec;

use crate::dialect::{self, PlaceholderStyle, QuoteStyle};
use crate::error::SqlishError;
use crate::keywords::KeywordSet;
use crate::lexer::Syntax;
use crate::parser::Limits;

const CONFIG_FILE_NAME: &str = "sqlish.toml";

/// All recognized options. Every field has a default, so an empty TOML
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    #[serde(default = "default_max_token_count")]
    pub max_token_count: usize,

    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Overrides the dialect's quoting conventions.
    #[serde(default)]
    pub quote_styles: Option<Vec<QuoteStyle>>,

    /// Overrides the dialect's placeholder syntaxes.
    #[serde(default)]
    pub placeholders: Option<Vec<PlaceholderStyle>>,

    /// Replaces the built-in keyword list.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,

    #[serde(default)]
    pub backslash_escapes: Option<bool>,
}

fn default_max_nesting_depth() -> usize {
    64
}
fn default_max_token_count() -> usize {
    10_000
}
fn default_dialect() -> String {
    "polyglot".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_nesting_depth: default_max_nesting_depth(),
            max_token_count: default_max_token_count(),
            dialect: default_dialect(),
            quote_styles: None,
            placeholders: None,
            keywords: None,
            backslash_escapes: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, SqlishError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SqlishError> {
        if self.max_nesting_depth == 0 {
            return Err(SqlishError::Config(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        if self.max_token_count == 0 {
            return Err(SqlishError::Config(
                "max_token_count must be at least 1".to_string(),
            ));
        }
        dialect::dialect_from_name(&self.dialect)?;
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_nesting_depth: self.max_nesting_depth,
            max_token_count: self.max_token_count,
        }
    }

    /// Resolve the dialect preset and apply explicit overrides on top.
    pub fn syntax(&self) -> Result<Syntax, SqlishError> {
        let dialect = dialect::dialect_from_name(&self.dialect)?;

        let quotes: SmallVec<[QuoteStyle; 3]> = match &self.quote_styles {
            Some(styles) => styles.iter().copied().collect(),
            None => dialect.quote_styles().iter().copied().collect(),
        };
        let placeholders: SmallVec<[PlaceholderStyle; 4]> = match &self.placeholders {
            Some(styles) => styles.iter().copied().collect(),
            None => dialect.placeholder_styles().iter().copied().collect(),
        };
        let keywords = match &self.keywords {
            Some(words) => KeywordSet::custom(words),
            None => KeywordSet::Ansi,
        };

        Ok(Syntax {
            quotes,
            placeholders,
            keywords,
            backslash_escapes: self
                .backslash_escapes
                .unwrap_or_else(|| dialect.backslash_escapes()),
        })
    }
}

/// Load configuration. An explicit path must exist; otherwise the current
/// directory and its parents are searched for `sqlish.toml`, then the user
/// config directory. No file at all yields the defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<Config, SqlishError> {
    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(SqlishError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => {
            let cwd = std::env::current_dir()?;
            find_config_file(&cwd).or_else(user_config_file)
        }
    };

    match config_file {
        Some(path) => load_config_from_path(&path),
        None => Ok(Config::default()),
    }
}

/// Walk from `start` up to the filesystem root looking for `sqlish.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("sqlish").join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

fn load_config_from_path(path: &Path) -> Result<Config, SqlishError> {
    let content = std::fs::read_to_string(path)?;
    Config::from_toml_str(&content).map_err(|e| match e {
        SqlishError::Toml(inner) => {
            SqlishError::Config(format!("Failed to parse {}: {}", path.display(), inner))
        }
        other => other,
    })
}
