//! Domain types for the commander portfolio assistant: the scripted intent
//! responder, the conversation transcript and the reflex trainer game.
//!
//! Nothing in this crate schedules work or touches the outside world; the
//! deferred callbacks and host side effects live in `commander-runtime`.

pub mod action;
pub mod catalog;
pub mod error;
pub mod events;
pub mod game;
pub mod intent;
pub mod quick;
pub mod settings;
pub mod transcript;

pub use action::{Section, SideEffect};
pub use error::CoreError;
pub use events::{GameEvent, SessionEvent};
pub use game::{Phase, ReflexGame, RoundState, TargetPosition, TickOutcome};
pub use intent::{Intent, IntentRule, IntentTable, Responder, Turn};
pub use quick::QuickPrompt;
pub use settings::{Settings, SocialLinks, TimingSettings};
pub use transcript::{Entry, Speaker, Transcript};
