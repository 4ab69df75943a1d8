//! Tokio plumbing for the commander widgets: the chat session with its
//! cancellable "thinking" delay, the reflex game ticker, and the host seam
//! through which side effects leave the process.

pub mod chat;
pub mod driver;
pub mod error;
pub mod host;

pub use chat::ChatSession;
pub use driver::GameDriver;
pub use error::{HostError, RuntimeError};
pub use host::{BrowserHost, Host, HostCall, RecordingHost};
