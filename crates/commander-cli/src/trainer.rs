use anyhow::{Context, Result};
use commander_core::{GameEvent, RoundState, Settings, TargetPosition};
use commander_runtime::GameDriver;
use tokio::io::{AsyncBufRead, Lines};

/// Plays rounds until `quit` or end of input, and returns the last round's
/// state after stopping it.
pub async fn run<R>(settings: &Settings, lines: &mut Lines<R>, json: bool) -> Result<RoundState>
where
    R: AsyncBufRead + Unpin,
{
    let (mut driver, mut events) = GameDriver::new(&settings.timing);
    println!(
        "Click Trainer: score as many hits as you can in {}s.",
        settings.timing.round_seconds
    );
    println!("(commands: start, hit or empty line, stop, status, quit)");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading game input")? else { break };
                match line.trim() {
                    "start" | "s" => {
                        driver.start();
                    }
                    "" | "hit" | "h" => {
                        driver.hit();
                    }
                    "stop" => {
                        driver.stop();
                    }
                    "status" => {
                        let state = driver.snapshot();
                        println!(
                            "  score {} | {}s | {}",
                            state.score,
                            state.remaining_seconds,
                            if state.is_running() { "running" } else { "idle" }
                        );
                    }
                    "quit" | "q" => break,
                    other => println!("  unknown command `{other}`"),
                }
            }
            Some(event) = events.recv() => render(&event, json)?,
        }
    }

    driver.stop();
    Ok(driver.snapshot())
}

fn render(event: &GameEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        GameEvent::Started { remaining_seconds, target } => {
            println!("Go! {remaining_seconds}s on the clock, target {}", at(target));
        }
        GameEvent::Hit { score, target } => println!("  hit! {score}, target {}", at(target)),
        GameEvent::Tick { remaining_seconds } => {
            if remaining_seconds % 5 == 0 || *remaining_seconds <= 3 {
                println!("  {remaining_seconds}s left");
            }
        }
        GameEvent::Expired { score } => println!("Time! Final score: {score}"),
        GameEvent::Stopped { score } => println!("Stopped. Score: {score}"),
    }
    Ok(())
}

fn at(target: &TargetPosition) -> String {
    format!("at ({:.0}%, {:.0}%)", target.x_pct, target.y_pct)
}

#[cfg(test)]
mod tests {
    use commander_core::Phase;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncBufReadExt, BufReader};

    use super::*;

    async fn play(input: &str) -> RoundState {
        let mut lines = BufReader::new(input.as_bytes()).lines();
        run(&Settings::default(), &mut lines, false).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_the_round_with_its_score() {
        let actual = play("start\nhit\nquit\n").await;

        assert_eq!(actual.score, 1);
        assert_eq!(actual.phase, Phase::Idle);
        assert_eq!(actual.remaining_seconds, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_before_start_do_not_score() {
        let actual = play("hit\n\nstatus\nbogus\n").await;

        assert_eq!(actual.score, 0);
        assert!(!actual.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_of_input_stops_a_running_round() {
        let actual = play("s\nh\nh\n").await;

        assert_eq!(actual.score, 2);
        assert!(!actual.is_running());
    }

    #[test]
    fn test_target_is_rounded_to_whole_percent() {
        let fixture = TargetPosition { x_pct: 12.4, y_pct: 79.6 };
        assert_eq!(at(&fixture), "at (12%, 80%)");
    }
}
