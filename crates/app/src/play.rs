use std::io::Write as _;
use std::sync::Arc;

use quiz_core::SessionError;
use quiz_core::session::Advance;
use services::{ANIMATION_PERIOD, FetchOutcome, QuizServiceError, QuizSessionService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::render;

const NO_QUIZ: &str = "Ingen quiz lastet. Skriv `ny` for å hente en.";

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Pick(usize),
    Check,
    Next,
    NewQuiz,
    Restart,
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return Self::Pick(number);
        }
        match trimmed.to_lowercase().as_str() {
            "s" | "sjekk" => Self::Check,
            "n" | "neste" => Self::Next,
            "ny" => Self::NewQuiz,
            "r" | "restart" => Self::Restart,
            "" | "vis" => Self::Show,
            "h" | "?" | "hjelp" => Self::Help,
            "q" | "quit" | "avslutt" => Self::Quit,
            _ => Self::Unknown(trimmed.to_owned()),
        }
    }
}

pub async fn run(session: Arc<QuizSessionService>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render::help());
    fetch(&session).await?;

    let (mut countdown, countdown_task) = session.spawn_countdown();
    let mut countdown_live = true;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Input::parse(&line) {
                    Input::Quit => break,
                    input => handle(&session, input).await?,
                }
            }
            changed = countdown.changed(), if countdown_live => {
                if changed.is_err() {
                    countdown_live = false;
                    continue;
                }
                let Some(tick) = *countdown.borrow_and_update() else {
                    continue;
                };
                if tick.expired {
                    println!("{}", render::countdown_line(&tick));
                    show_summary(&session).await?;
                } else if tick.time_left <= 5 || tick.time_left % 15 == 0 {
                    println!("{}", render::countdown_line(&tick));
                }
            }
        }
    }

    countdown_task.abort();
    info!("player quit");
    Ok(())
}

async fn handle(session: &QuizSessionService, input: Input) -> Result<(), QuizServiceError> {
    debug!(?input, "player input");
    match input {
        Input::Pick(number) => {
            let snapshot = session.snapshot()?;
            let option = snapshot
                .question
                .as_ref()
                .and_then(|q| number.checked_sub(1).and_then(|i| q.options().get(i)))
                .cloned();
            match option {
                Some(option) => {
                    if let Err(err) = session.select_answer(&option) {
                        report(&err);
                    }
                }
                None if snapshot.has_quiz() => println!("Ugyldig valg: {number}"),
                None => println!("{NO_QUIZ}"),
            }
            show(session)?;
        }
        Input::Check => match session.check_answer() {
            Ok(outcome) => {
                show(session)?;
                println!("{}", render::feedback(&outcome));
            }
            Err(err) => report(&err),
        },
        Input::Next => match session.advance() {
            Ok(Advance::Next { .. }) => show(session)?,
            Ok(Advance::Completed) => show_summary(session).await?,
            Err(err) => report(&err),
        },
        Input::NewQuiz => fetch(session).await?,
        Input::Restart => {
            session.reset()?;
            fetch(session).await?;
        }
        Input::Show => show(session)?,
        Input::Help => println!("{}", render::help()),
        Input::Unknown(raw) => println!("Ukjent kommando: {raw}. {}", render::help()),
        Input::Quit => {}
    }
    Ok(())
}

async fn fetch(session: &QuizSessionService) -> Result<(), QuizServiceError> {
    println!("Henter quiz ...");
    match session.fetch_quiz().await {
        Ok(FetchOutcome::Loaded { .. }) => show(session),
        Ok(FetchOutcome::Superseded) => Ok(()),
        Err(QuizServiceError::FetchFailed(err)) => {
            println!("Kunne ikke hente quiz: {err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn show(session: &QuizSessionService) -> Result<(), QuizServiceError> {
    let snapshot = session.snapshot()?;
    if !snapshot.is_complete {
        println!("\n{}", render::question_block(&snapshot));
    }
    Ok(())
}

/// Count the score up on the animation task, then print the result screen.
async fn show_summary(session: &QuizSessionService) -> Result<(), QuizServiceError> {
    let Some(summary) = session.snapshot()?.summary else {
        return Ok(());
    };
    let target = summary.score();

    let (mut displayed, task) = session.spawn_score_animation(ANIMATION_PERIOD);
    let mut value = *displayed.borrow_and_update();
    while value < target {
        if displayed.changed().await.is_err() {
            break;
        }
        value = *displayed.borrow_and_update();
        print!("\rPoeng: {value}");
        let _ = std::io::stdout().flush();
    }
    task.abort();

    println!("\n\n{}", render::summary_block(&summary, value.max(target)));
    println!("Skriv `ny` for en ny quiz eller `q` for å avslutte.");
    Ok(())
}

/// Usage errors are shown to the player and never end the loop.
fn report(err: &QuizServiceError) {
    debug!(error = %err, "rejected input");
    match err {
        QuizServiceError::Session(SessionError::NoQuiz) => println!("{NO_QUIZ}"),
        other => println!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_player_commands() {
        assert_eq!(Input::parse(" 2 "), Input::Pick(2));
        assert_eq!(Input::parse("S"), Input::Check);
        assert_eq!(Input::parse("neste"), Input::Next);
        assert_eq!(Input::parse("ny"), Input::NewQuiz);
        assert_eq!(Input::parse("r"), Input::Restart);
        assert_eq!(Input::parse(""), Input::Show);
        assert_eq!(Input::parse("?"), Input::Help);
        assert_eq!(Input::parse("q"), Input::Quit);
        assert_eq!(Input::parse("hopp"), Input::Unknown("hopp".into()));
    }
}
