//! Drives a [`ReflexGame`] in real time.
//!
//! Every `start` and `stop` cancels the current ticker before anything else,
//! and each ticker only advances the round it was spawned for, so a round
//! never has more than one countdown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use commander_core::{GameEvent, ReflexGame, RoundState, TickOutcome, TimingSettings};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct Shared {
    game: ReflexGame,
    round: u64,
}

pub struct GameDriver {
    shared: Arc<Mutex<Shared>>,
    period: Duration,
    events: mpsc::UnboundedSender<GameEvent>,
    ticker: Option<CancellationToken>,
}

impl GameDriver {
    pub fn new(timing: &TimingSettings) -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let game = ReflexGame::new(timing.round_seconds);
        Self::with_game(game, Duration::from_millis(timing.tick_ms))
    }

    pub fn with_game(
        game: ReflexGame,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let driver = Self {
            shared: Arc::new(Mutex::new(Shared { game, round: 0 })),
            period,
            events,
            ticker: None,
        };
        (driver, rx)
    }

    pub fn snapshot(&self) -> RoundState {
        self.lock().game.state()
    }

    /// Starts a new round and its countdown.
    pub fn start(&mut self) -> RoundState {
        self.cancel_ticker();

        let (state, round) = {
            let mut shared = self.lock();
            shared.round += 1;
            (shared.game.start(), shared.round)
        };
        tracing::info!(round, seconds = state.remaining_seconds, "reflex round started");
        let _ = self.events.send(GameEvent::Started {
            remaining_seconds: state.remaining_seconds,
            target: state.target,
        });

        let token = CancellationToken::new();
        let ticker = Ticker {
            shared: self.shared.clone(),
            events: self.events.clone(),
            token: token.clone(),
            period: self.period,
            round,
        };
        tokio::spawn(ticker.run());
        self.ticker = Some(token);
        state
    }

    /// Registers a hit on the target. Ignored while idle.
    pub fn hit(&self) -> bool {
        let state = {
            let mut shared = self.lock();
            if !shared.game.hit() {
                return false;
            }
            shared.game.state()
        };
        let _ = self.events.send(GameEvent::Hit { score: state.score, target: state.target });
        true
    }

    /// Ends the round early. Returns whether a round was running.
    pub fn stop(&mut self) -> bool {
        self.cancel_ticker();
        let (stopped, score) = {
            let mut shared = self.lock();
            (shared.game.stop(), shared.game.state().score)
        };
        if stopped {
            tracing::info!(score, "reflex round stopped");
            let _ = self.events.send(GameEvent::Stopped { score });
        }
        stopped
    }

    fn cancel_ticker(&mut self) {
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GameDriver {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

struct Ticker {
    shared: Arc<Mutex<Shared>>,
    events: mpsc::UnboundedSender<GameEvent>,
    token: CancellationToken,
    period: Duration,
    round: u64,
}

impl Ticker {
    async fn run(self) {
        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return,
                _ = tokio::time::sleep(self.period) => {}
            }

            let outcome = {
                let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
                if shared.round != self.round {
                    return;
                }
                shared.game.tick()
            };

            match outcome {
                TickOutcome::Ignored => return,
                TickOutcome::Counted { remaining } => {
                    tracing::debug!(remaining, "tick");
                    let _ = self.events.send(GameEvent::Tick { remaining_seconds: remaining });
                }
                TickOutcome::Expired { score } => {
                    tracing::info!(score, round = self.round, "reflex round finished");
                    let _ = self.events.send(GameEvent::Expired { score });
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use commander_core::game::ROUND_SECONDS;
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture() -> (GameDriver, mpsc::UnboundedReceiver<GameEvent>) {
        GameDriver::with_game(ReflexGame::seeded(ROUND_SECONDS, 11), Duration::from_secs(1))
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_expires_after_twenty_ticks() {
        let (mut driver, mut rx) = fixture();
        driver.start();

        tokio::time::sleep(Duration::from_millis(19_500)).await;
        assert!(driver.snapshot().is_running());
        assert_eq!(driver.snapshot().remaining_seconds, 1);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let actual = driver.snapshot();
        assert!(!actual.is_running());
        assert_eq!(actual.remaining_seconds, 0);

        let events = drain(&mut rx);
        let ticks = events.iter().filter(|e| matches!(e, GameEvent::Tick { .. })).count();
        assert_eq!(ticks, 19);
        assert_eq!(events.last(), Some(&GameEvent::Expired { score: 0 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_countdown() {
        let (mut driver, mut rx) = fixture();
        driver.start();
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        assert!(driver.stop());
        tokio::time::sleep(Duration::from_secs(30)).await;

        let actual = driver.snapshot();
        assert_eq!(actual.remaining_seconds, ROUND_SECONDS - 3);
        assert!(!actual.is_running());
        assert_eq!(drain(&mut rx).last(), Some(&GameEvent::Stopped { score: 0 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_a_single_countdown() {
        let (mut driver, _rx) = fixture();
        driver.start();
        tokio::time::sleep(Duration::from_millis(500)).await;
        driver.start();
        tokio::time::sleep(Duration::from_millis(5_250)).await;

        // Two live tickers would have counted down ten seconds by now.
        assert_eq!(driver.snapshot().remaining_seconds, ROUND_SECONDS - 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_only_count_while_running() {
        let (mut driver, mut rx) = fixture();
        assert!(!driver.hit());

        driver.start();
        assert!(driver.hit());
        assert!(driver.hit());
        driver.stop();
        assert!(!driver.hit());

        assert_eq!(driver.snapshot().score, 2);
        let hits = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Hit { .. }))
            .count();
        assert_eq!(hits, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_then_stop_yields_zero_score() {
        let (mut driver, _rx) = fixture();
        driver.start();
        driver.stop();

        let actual = driver.snapshot();
        assert_eq!(actual.score, 0);
        assert!(!actual.is_running());
    }
}
