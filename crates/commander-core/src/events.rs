//! Events published by the chat session and the game driver to whatever
//! front end renders them.

use serde::{Deserialize, Serialize};

use crate::action::SideEffect;
use crate::game::TargetPosition;
use crate::intent::Intent;
use crate::transcript::Entry;

/// A change in the reflex round as observed by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Started { remaining_seconds: u32, target: TargetPosition },
    Hit { score: u32, target: TargetPosition },
    Tick { remaining_seconds: u32 },
    /// The countdown ran out.
    Expired { score: u32 },
    /// The player stopped the round early.
    Stopped { score: u32 },
}

/// Output of a chat session, in the order the user should see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The assistant started "typing" a reply.
    Thinking,
    Replied { intent: Intent, entry: Entry },
    EffectApplied { effect: SideEffect },
    /// A newer message cancelled the pending reply to `input`.
    Superseded { input: String },
    DialogClosed,
}
