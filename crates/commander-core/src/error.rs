use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the responder or loading settings.
///
/// Conversation turns and game actions never fail: unmatched input gets the
/// fallback reply and idle hits are ignored.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read settings from {path}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid pattern for intent {intent}")]
    Pattern {
        intent: &'static str,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
