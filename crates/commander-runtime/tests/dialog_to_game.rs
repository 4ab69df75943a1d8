use std::sync::Arc;
use std::time::Duration;

use commander_core::{GameEvent, Intent, Section, SessionEvent, Settings, SideEffect};
use commander_runtime::{ChatSession, GameDriver, HostCall, RecordingHost};
use pretty_assertions::assert_eq;

#[tokio::test(start_paused = true)]
async fn start_game_request_hands_over_to_a_fresh_round() {
    let settings = Settings::default();
    let host = Arc::new(RecordingHost::default());
    let (mut session, mut chat_events) = ChatSession::new(&settings, host.clone()).unwrap();

    assert!(session.submit("start game"));

    let mut navigated = false;
    while let Some(event) = chat_events.recv().await {
        match event {
            SessionEvent::Replied { intent, .. } => assert_eq!(intent, Intent::MiniGame),
            SessionEvent::EffectApplied { effect } => {
                assert_eq!(effect, SideEffect::Navigate { section: Section::Game });
                navigated = true;
            }
            SessionEvent::DialogClosed => break,
            SessionEvent::Thinking => {}
            other => panic!("unexpected event: {other:?}"),
        }
    }
    assert!(navigated);
    assert_eq!(host.calls(), vec![HostCall::Navigate(Section::Game), HostCall::CloseDialog]);

    let transcript = session.close();
    assert_eq!(transcript.len(), 3);

    let (mut driver, mut game_events) = GameDriver::new(&settings.timing);
    driver.start();
    driver.hit();
    driver.hit();
    driver.hit();

    let mut last = None;
    while let Some(event) = game_events.recv().await {
        if matches!(event, GameEvent::Expired { .. }) {
            last = Some(event);
            break;
        }
    }
    assert_eq!(last, Some(GameEvent::Expired { score: 3 }));

    let state = driver.snapshot();
    assert!(!state.is_running());
    assert_eq!(state.remaining_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn priority_order_decides_the_single_side_effect() {
    let settings = Settings::default();
    let host = Arc::new(RecordingHost::default());
    let (mut session, _events) = ChatSession::new(&settings, host.clone()).unwrap();

    session.submit("show my resume on github");
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(host.calls(), vec![HostCall::OpenLink(settings.links.resume.clone())]);
    let reply = session.transcript().last().cloned().unwrap();
    assert_eq!(
        reply.text,
        format!("You can download the resume here: {}", settings.links.resume)
    );
}
