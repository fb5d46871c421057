use quiz_core::SessionEngine;
use quiz_core::model::{Question, SessionSummary};
use quiz_core::session::SessionPhase;

/// Everything a front end needs to draw the current session, copied out
/// under one lock so the values are mutually consistent.
///
/// This is intentionally **not** a view-model: no formatted strings, no locale.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub question: Option<Question>,
    pub question_index: usize,
    pub total_questions: usize,
    pub selected_answer: Option<String>,
    pub answer_checked: bool,
    pub score: u32,
    pub displayed_score: u32,
    pub max_score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub correct_answers: u32,
    pub is_complete: bool,
    pub on_last_question: bool,
    pub progress_percentage: f64,
    pub time_left: Option<u32>,
    pub summary: Option<SessionSummary>,
    pub fetch_pending: bool,
}

impl SessionSnapshot {
    pub(crate) fn capture(engine: &SessionEngine, fetch_pending: bool) -> Self {
        Self {
            phase: engine.phase(),
            question: engine.current_question().cloned(),
            question_index: engine.current_index(),
            total_questions: engine.total_questions(),
            selected_answer: engine.selected_answer().map(str::to_owned),
            answer_checked: engine.is_answer_checked(),
            score: engine.score(),
            displayed_score: engine.displayed_score(),
            max_score: engine.max_score(),
            streak: engine.streak(),
            best_streak: engine.best_streak(),
            correct_answers: engine.correct_answers(),
            is_complete: engine.is_complete(),
            on_last_question: engine.on_last_question(),
            progress_percentage: engine.progress_percentage(),
            time_left: engine.time_left(),
            summary: engine.summary(),
            fetch_pending,
        }
    }

    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !matches!(self.phase, SessionPhase::Empty)
    }
}
