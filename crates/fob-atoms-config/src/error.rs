//! Error types for option loading and environment resolution.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value for `{field}`{}", format_hint(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid build mode: {0} (expected development, production or test)")]
    InvalidMode(String),

    #[error("invalid vendor pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({hint})"),
        None => String::new(),
    }
}
