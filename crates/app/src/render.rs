//! Plain-text rendering of session snapshots for the terminal front end.

use std::fmt::Write as _;

use quiz_core::model::SessionSummary;
use quiz_core::session::{CheckOutcome, CountdownTick};
use services::SessionSnapshot;

const BAR_WIDTH: usize = 20;

pub fn progress_bar(percentage: f64, width: usize) -> String {
    let clamped = percentage.clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Header, question text and numbered options. After a check the correct
/// option is marked, and the selection too when it was wrong.
pub fn question_block(snapshot: &SessionSnapshot) -> String {
    let Some(question) = snapshot.question.as_ref() else {
        return "Ingen quiz lastet. Skriv `ny` for å hente en.".to_owned();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Spørsmål {} av {} {} {:.0}%",
        snapshot.question_index + 1,
        snapshot.total_questions,
        progress_bar(snapshot.progress_percentage, BAR_WIDTH),
        snapshot.progress_percentage,
    );
    let _ = write!(out, "Poeng: {}  Rekke: {}", snapshot.score, snapshot.streak);
    if let Some(left) = snapshot.time_left {
        let _ = write!(out, "  Tid: {left}s");
    }
    let _ = writeln!(out);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", question.text());

    let selected = snapshot.selected_answer.as_deref();
    for (i, option) in question.options().iter().enumerate() {
        let is_selected = selected == Some(option.as_str());
        let marker = if snapshot.answer_checked {
            if question.is_correct(option) {
                "✔"
            } else if is_selected {
                "✘"
            } else {
                " "
            }
        } else if is_selected {
            ">"
        } else {
            " "
        };
        let _ = writeln!(out, " {marker} {}) {option}", i + 1);
    }
    out
}

pub fn feedback(outcome: &CheckOutcome) -> String {
    if outcome.correct {
        if outcome.streak > 1 {
            format!(
                "Riktig! +{} poeng ({} på rad)",
                outcome.points, outcome.streak
            )
        } else {
            format!("Riktig! +{} poeng", outcome.points)
        }
    } else {
        format!("Feil. Riktig svar: {}", outcome.correct_answer)
    }
}

pub fn countdown_line(tick: &CountdownTick) -> String {
    if tick.expired {
        "Tiden er ute!".to_owned()
    } else {
        format!("{}s igjen", tick.time_left)
    }
}

pub fn summary_block(summary: &SessionSummary, displayed_score: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Quiz fullført!");
    let _ = writeln!(out, "{}", summary.medal().label());
    let _ = writeln!(
        out,
        "Poeng: {} av {} ({:.0}%)",
        displayed_score,
        summary.max_score(),
        summary.score_percentage()
    );
    let _ = writeln!(
        out,
        "Riktige svar: {} av {}",
        summary.correct_answers(),
        summary.total_questions()
    );
    let _ = writeln!(out, "Beste rekke: {}", summary.best_streak());
    let _ = write!(out, "Tid brukt: {}s", summary.duration().num_seconds());
    out
}

pub fn help() -> &'static str {
    "Kommandoer: 1-4 velg svar, s sjekk, n neste, ny ny quiz, r start på nytt, q avslutt"
}
