use commander_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Failures reported by a [`crate::Host`]. They are logged and never abort a
/// conversation turn.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to open {url}")]
    OpenLink {
        url: String,
        #[source]
        source: std::io::Error,
    },
}
