use std::sync::{Mutex, PoisonError};

use commander_core::{Section, SideEffect};

use crate::error::HostError;

/// Primitives the embedding front end provides for side effects.
pub trait Host: Send + Sync + 'static {
    /// Opens `url` in a new browsing context.
    fn open_link(&self, url: &str) -> Result<(), HostError>;

    /// Switches the visible section.
    fn navigate(&self, section: Section) -> Result<(), HostError>;

    /// Closes the dialog hosting the chat.
    fn close_dialog(&self) -> Result<(), HostError>;

    fn apply(&self, effect: &SideEffect) -> Result<(), HostError> {
        match effect {
            SideEffect::OpenLink { url } => self.open_link(url),
            SideEffect::Navigate { section } => self.navigate(*section),
        }
    }
}

/// Opens links in the system browser. Navigation and dialog changes are
/// rendered by whoever consumes the session events, so they are only traced
/// here.
#[derive(Debug, Default, Clone)]
pub struct BrowserHost;

impl Host for BrowserHost {
    fn open_link(&self, url: &str) -> Result<(), HostError> {
        tracing::info!(url, "opening link");
        open::that(url).map_err(|source| HostError::OpenLink { url: url.to_string(), source })
    }

    fn navigate(&self, section: Section) -> Result<(), HostError> {
        tracing::info!(%section, "navigating");
        Ok(())
    }

    fn close_dialog(&self) -> Result<(), HostError> {
        tracing::debug!("closing dialog");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    OpenLink(String),
    Navigate(Section),
    CloseDialog,
}

/// Records every call instead of acting on it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }
}

impl Host for RecordingHost {
    fn open_link(&self, url: &str) -> Result<(), HostError> {
        self.record(HostCall::OpenLink(url.to_string()));
        Ok(())
    }

    fn navigate(&self, section: Section) -> Result<(), HostError> {
        self.record(HostCall::Navigate(section));
        Ok(())
    }

    fn close_dialog(&self) -> Result<(), HostError> {
        self.record(HostCall::CloseDialog);
        Ok(())
    }
}
