//! Click Trainer: a timed reflex round where each hit scores a point and
//! moves the target.
//!
//! The state machine is Idle -> Running -> Idle. Only `start` leaves Idle;
//! score and remaining time never change while idle.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const ROUND_SECONDS: u32 = 20;

/// Targets stay inside `[SAFE_MIN_PCT, SAFE_MAX_PCT)` on both axes so they
/// never touch the edges of the play area.
pub const SAFE_MIN_PCT: f32 = 10.0;
pub const SAFE_MAX_PCT: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
}

/// Target position in percent of the play area, measured from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPosition {
    pub x_pct: f32,
    pub y_pct: f32,
}

impl TargetPosition {
    fn random(rng: &mut impl Rng) -> Self {
        Self {
            x_pct: rng.random_range(SAFE_MIN_PCT..SAFE_MAX_PCT),
            y_pct: rng.random_range(SAFE_MIN_PCT..SAFE_MAX_PCT),
        }
    }

    pub fn is_within_safe_area(&self) -> bool {
        let range = SAFE_MIN_PCT..SAFE_MAX_PCT;
        range.contains(&self.x_pct) && range.contains(&self.y_pct)
    }
}

impl Default for TargetPosition {
    fn default() -> Self {
        Self { x_pct: 40.0, y_pct: 40.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    pub remaining_seconds: u32,
    pub phase: Phase,
    pub target: TargetPosition,
}

impl RoundState {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was idle; nothing changed.
    Ignored,
    Counted { remaining: u32 },
    /// The countdown reached zero and the round stopped.
    Expired { score: u32 },
}

#[derive(Debug, Clone)]
pub struct ReflexGame<R = StdRng> {
    state: RoundState,
    round_seconds: u32,
    rng: R,
}

impl ReflexGame<StdRng> {
    pub fn new(round_seconds: u32) -> Self {
        Self::with_rng(round_seconds, StdRng::from_os_rng())
    }

    pub fn seeded(round_seconds: u32, seed: u64) -> Self {
        Self::with_rng(round_seconds, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReflexGame<R> {
    pub fn with_rng(round_seconds: u32, rng: R) -> Self {
        Self {
            state: RoundState {
                score: 0,
                remaining_seconds: round_seconds,
                phase: Phase::Idle,
                target: TargetPosition::default(),
            },
            round_seconds,
            rng,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn round_seconds(&self) -> u32 {
        self.round_seconds
    }

    /// Begins a fresh round, discarding any round in progress.
    pub fn start(&mut self) -> RoundState {
        self.state.score = 0;
        self.state.remaining_seconds = self.round_seconds;
        self.state.phase = Phase::Running;
        self.reposition();
        tracing::debug!(seconds = self.round_seconds, "round started");
        self.state
    }

    /// Scores a hit. Returns `false` and changes nothing while idle.
    pub fn hit(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state.score += 1;
        self.reposition();
        true
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Ignored;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            self.state.phase = Phase::Idle;
            return TickOutcome::Expired { score: self.state.score };
        }
        TickOutcome::Counted { remaining: self.state.remaining_seconds }
    }

    /// Ends the round early. Returns whether a round was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.state.is_running();
        self.state.phase = Phase::Idle;
        was_running
    }

    fn reposition(&mut self) {
        self.state.target = TargetPosition::random(&mut self.rng);
    }
}
