use std::sync::Arc;

use anyhow::{Context, Result};
use commander_core::{QuickPrompt, Section, SessionEvent, Settings, SideEffect, Speaker};
use commander_runtime::ChatSession;
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufRead, Lines};

use crate::host::TerminalHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogExit {
    Closed,
    /// The assistant sent the user to the mini-game.
    ToGame,
}

pub async fn run<R>(
    settings: &Settings,
    host: Arc<TerminalHost>,
    lines: &mut Lines<R>,
    json: bool,
) -> Result<DialogExit>
where
    R: AsyncBufRead + Unpin,
{
    let (mut session, mut events) = ChatSession::new(settings, host)?;

    for entry in session.transcript().entries() {
        println!("bot: {}", entry.text);
    }
    let shortcuts: Vec<String> =
        QuickPrompt::iter().map(|prompt| format!("/{}", prompt.command())).collect();
    println!("(shortcuts: {}, /transcript, /quit)", shortcuts.join(", "));

    let mut to_game = false;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading chat input")? else {
                    // Input ended: let the last turn finish, side effect included.
                    while !session.is_settled() {
                        let Some(event) = events.recv().await else { break };
                        to_game |= render(&event, json)?;
                        if event == SessionEvent::DialogClosed {
                            break;
                        }
                    }
                    while let Ok(event) = events.try_recv() {
                        to_game |= render(&event, json)?;
                    }
                    break;
                };
                match line.trim() {
                    "/quit" | "/exit" => break,
                    "/transcript" => {
                        for entry in session.transcript().entries() {
                            let who = match entry.speaker {
                                Speaker::User => "you",
                                Speaker::Bot => "bot",
                            };
                            println!("  {who}: {}", entry.text);
                        }
                    }
                    command if command.starts_with('/') => {
                        let name = command.trim_start_matches('/');
                        match name.parse::<QuickPrompt>() {
                            Ok(prompt) => {
                                println!("you: {prompt}");
                                session.quick_ask(prompt);
                            }
                            Err(_) => println!("  unknown shortcut `/{name}`"),
                        }
                    }
                    text => {
                        session.submit(text);
                    }
                }
            }
            Some(event) = events.recv() => {
                to_game |= render(&event, json)?;
                if event == SessionEvent::DialogClosed {
                    break;
                }
            }
        }
    }

    let transcript = session.close();
    tracing::debug!(entries = transcript.len(), "discarded chat transcript");
    Ok(if to_game { DialogExit::ToGame } else { DialogExit::Closed })
}

/// Prints one event. Returns whether it sent the user to the game.
fn render(event: &SessionEvent, json: bool) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        match event {
            SessionEvent::Thinking => println!("  Typing..."),
            SessionEvent::Replied { entry, .. } => println!("bot: {}", entry.text),
            SessionEvent::Superseded { input } => println!("  (skipped reply to \"{input}\")"),
            SessionEvent::EffectApplied { .. } | SessionEvent::DialogClosed => {}
        }
    }
    Ok(matches!(
        event,
        SessionEvent::EffectApplied { effect: SideEffect::Navigate { section: Section::Game } }
    ))
}
