//! One chat dialog session.
//!
//! Each accepted message is answered by a single deferred task that waits out
//! the simulated "thinking" delay before appending the reply and applying the
//! turn's side effect. A newer message cancels a reply that has not been
//! delivered yet, so at most one reply is ever in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use commander_core::{
    Entry, QuickPrompt, Responder, SessionEvent, Settings, SideEffect, TimingSettings, Transcript,
    Turn,
};
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;
use crate::host::Host;

struct PendingTurn {
    input: String,
    token: CancellationToken,
    replied: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PendingTurn {
    fn is_replied(&self) -> bool {
        self.replied.load(Ordering::Acquire)
    }
}

pub struct ChatSession<H> {
    responder: Arc<Responder>,
    timing: TimingSettings,
    host: Arc<H>,
    transcript: Arc<Mutex<Transcript>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    pending: Option<PendingTurn>,
}

impl<H: Host> ChatSession<H> {
    pub fn new(
        settings: &Settings,
        host: Arc<H>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SessionEvent>), RuntimeError> {
        let responder = Arc::new(Responder::new(settings.links.clone())?);
        Ok(Self::with_responder(responder, settings.timing.clone(), host))
    }

    pub fn with_responder(
        responder: Arc<Responder>,
        timing: TimingSettings,
        host: Arc<H>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        tracing::info!("chat session opened");
        let session = Self {
            responder,
            timing,
            host,
            transcript: Arc::new(Mutex::new(Transcript::with_greeting())),
            events,
            pending: None,
        };
        (session, rx)
    }

    /// Submits a typed message. Returns `false` without touching the
    /// transcript when the input is blank.
    pub fn submit(&mut self, input: &str) -> bool {
        let Some(turn) = self.responder.respond(input) else {
            return false;
        };
        let delay = rand::rng()
            .random_range(self.timing.thinking_min_ms..=self.timing.thinking_max_ms);
        self.dispatch(turn, Duration::from_millis(delay));
        true
    }

    /// Submits one of the canned prompts with the fixed quick-reply delay.
    pub fn quick_ask(&mut self, prompt: QuickPrompt) {
        if let Some(turn) = self.responder.respond(prompt.text()) {
            let delay = Duration::from_millis(self.timing.quick_reply_ms);
            self.dispatch(turn, delay);
        }
    }

    /// Whether a reply is still being "typed".
    pub fn is_thinking(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_replied() && !pending.handle.is_finished())
    }

    /// Whether the latest turn has run to completion, including its side
    /// effect and any dialog close. Every event of a settled session is
    /// already queued on the receiver.
    pub fn is_settled(&self) -> bool {
        self.pending.as_ref().is_none_or(|pending| pending.handle.is_finished())
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Cancels whatever is still scheduled and hands back the transcript,
    /// which is not kept anywhere else.
    pub fn close(mut self) -> Transcript {
        self.cancel_pending();
        tracing::info!("chat session closed");
        self.transcript()
    }

    fn dispatch(&mut self, turn: Turn, delay: Duration) {
        {
            // The delivery task checks its token and marks the turn replied
            // under this lock, so the two sides agree on who got there first.
            let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = self.pending.take() {
                previous.token.cancel();
                if !previous.is_replied() {
                    tracing::debug!(input = %previous.input, "superseded pending reply");
                    self.emit(SessionEvent::Superseded { input: previous.input });
                }
            }
            transcript.push(Entry::user(turn.input.clone()));
        }
        self.emit(SessionEvent::Thinking);
        tracing::debug!(intent = %turn.intent, delay_ms = delay.as_millis() as u64, "scheduled reply");

        let token = CancellationToken::new();
        let replied = Arc::new(AtomicBool::new(false));
        let delivery = Delivery {
            host: self.host.clone(),
            transcript: self.transcript.clone(),
            events: self.events.clone(),
            token: token.clone(),
            replied: replied.clone(),
            close_delay: Duration::from_millis(self.timing.close_dialog_ms),
        };
        let input = turn.input.clone();
        let handle = tokio::spawn(delivery.run(turn, delay));

        self.pending = Some(PendingTurn { input, token, replied, handle });
    }

    fn cancel_pending(&mut self) -> Option<PendingTurn> {
        let pending = self.pending.take()?;
        pending.token.cancel();
        Some(pending)
    }

    fn emit(&self, event: SessionEvent) {
        // The receiver going away only means nobody renders the dialog anymore.
        let _ = self.events.send(event);
    }
}

impl<H> Drop for ChatSession<H> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }
}

/// State moved into the deferred reply task.
struct Delivery<H> {
    host: Arc<H>,
    transcript: Arc<Mutex<Transcript>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    token: CancellationToken,
    replied: Arc<AtomicBool>,
    close_delay: Duration,
}

impl<H: Host> Delivery<H> {
    async fn run(self, turn: Turn, delay: Duration) {
        if !self.wait(delay).await {
            return;
        }

        let entry = Entry::bot(turn.reply);
        {
            let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
            if self.token.is_cancelled() {
                return;
            }
            transcript.push(entry.clone());
            self.replied.store(true, Ordering::Release);
        }
        let _ = self.events.send(SessionEvent::Replied { intent: turn.intent, entry });

        let Some(effect) = turn.effect else {
            return;
        };
        self.apply(&effect);

        if effect.closes_dialog() && self.wait(self.close_delay).await {
            if let Err(error) = self.host.close_dialog() {
                tracing::warn!(%error, "host failed to close dialog");
            }
            let _ = self.events.send(SessionEvent::DialogClosed);
        }
    }

    fn apply(&self, effect: &SideEffect) {
        match self.host.apply(effect) {
            Ok(()) => {
                let _ = self.events.send(SessionEvent::EffectApplied { effect: effect.clone() });
            }
            Err(error) => tracing::warn!(%error, %effect, "host failed to apply side effect"),
        }
    }

    /// Sleeps for `delay`; `false` if the turn was cancelled first.
    async fn wait(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use commander_core::{Intent, Section, Speaker};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::host::{HostCall, RecordingHost};

    fn fixture() -> (
        ChatSession<RecordingHost>,
        mpsc::UnboundedReceiver<SessionEvent>,
        Arc<RecordingHost>,
    ) {
        let host = Arc::new(RecordingHost::default());
        let (session, rx) = ChatSession::new(&Settings::default(), host.clone()).unwrap();
        (session, rx, host)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn elapse(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_leaves_transcript_unchanged() {
        let (mut session, mut rx, host) = fixture();
        let before = session.transcript().len();

        assert!(!session.submit("   "));
        assert!(!session.submit(""));
        elapse(2_000).await;

        assert_eq!(session.transcript().len(), before);
        assert!(drain(&mut rx).is_empty());
        assert!(host.calls().is_empty());
        assert!(!session.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_within_thinking_window() {
        let (mut session, mut rx, _host) = fixture();

        assert!(session.submit("hello"));
        assert!(session.is_thinking());
        assert_eq!(session.transcript().last(), Some(&Entry::user("hello")));

        elapse(599).await;
        assert_eq!(drain(&mut rx), vec![SessionEvent::Thinking]);

        elapse(900).await;
        let expected = vec![SessionEvent::Replied {
            intent: Intent::Greeting,
            entry: Entry::bot("Hello! How can I help you today?"),
        }];
        assert_eq!(drain(&mut rx), expected);
        assert!(!session.is_thinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_github_opens_configured_url() {
        let (mut session, mut rx, host) = fixture();
        let url = Settings::default().links.github;

        session.submit("Open GitHub");
        elapse(1_500).await;

        let events = drain(&mut rx);
        assert!(matches!(&events[1], SessionEvent::Replied { entry, .. } if entry.text.contains(&url)));
        assert_eq!(
            events[2],
            SessionEvent::EffectApplied { effect: SideEffect::OpenLink { url: url.clone() } }
        );
        assert_eq!(host.calls(), vec![HostCall::OpenLink(url)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_game_navigates_then_closes_dialog() {
        let (mut session, mut rx, host) = fixture();

        session.quick_ask(QuickPrompt::StartGame);
        elapse(401).await;
        assert_eq!(host.calls(), vec![HostCall::Navigate(Section::Game)]);

        elapse(400).await;
        assert_eq!(host.calls(), vec![HostCall::Navigate(Section::Game), HostCall::CloseDialog]);
        assert_eq!(drain(&mut rx).last(), Some(&SessionEvent::DialogClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_supersedes_pending_reply() {
        let (mut session, mut rx, host) = fixture();

        session.submit("show resume");
        elapse(100).await;
        session.submit("thanks");
        elapse(2_000).await;

        let actual = drain(&mut rx);
        let expected = vec![
            SessionEvent::Thinking,
            SessionEvent::Superseded { input: "show resume".to_string() },
            SessionEvent::Thinking,
            SessionEvent::Replied {
                intent: Intent::Thanks,
                entry: Entry::bot("You're welcome, Commander."),
            },
        ];
        assert_eq!(actual, expected);
        assert!(host.calls().is_empty());

        let speakers: Vec<Speaker> =
            session.transcript().entries().iter().map(|e| e.speaker).collect();
        assert_eq!(speakers, vec![Speaker::Bot, Speaker::User, Speaker::User, Speaker::Bot]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_only_after_dialog_closes() {
        let (mut session, mut rx, _host) = fixture();

        session.submit("start game");
        assert!(!session.is_settled());

        let mut events = Vec::new();
        while !session.is_settled() {
            match rx.recv().await {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events.extend(drain(&mut rx));

        assert!(!session.is_thinking());
        assert!(events.contains(&SessionEvent::EffectApplied {
            effect: SideEffect::Navigate { section: Section::Game }
        }));
        assert_eq!(events.last(), Some(&SessionEvent::DialogClosed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_turn_is_either_answered_or_superseded() {
        let host = Arc::new(RecordingHost::default());
        let timing = TimingSettings::default().thinking_min_ms(0).thinking_max_ms(1);
        let settings = Settings::default().timing(timing);
        let (mut session, mut rx) = ChatSession::new(&settings, host).unwrap();
        let submissions = 200;

        for _ in 0..submissions {
            session.submit("thanks");
            tokio::task::yield_now().await;
        }
        while !session.is_settled() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let events = drain(&mut rx);
        let superseded =
            events.iter().filter(|e| matches!(e, SessionEvent::Superseded { .. })).count();
        let answered = session
            .transcript()
            .entries()
            .iter()
            .skip(1)
            .filter(|entry| entry.speaker == Speaker::Bot)
            .count();

        assert_eq!(answered + superseded, submissions);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_pending_reply() {
        let (mut session, mut rx, host) = fixture();

        session.submit("resume");
        let transcript = session.close();
        elapse(2_000).await;

        assert_eq!(transcript.len(), 2);
        assert_eq!(drain(&mut rx), vec![SessionEvent::Thinking]);
        assert!(host.calls().is_empty());
    }
}
