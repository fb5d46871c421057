use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::animator::ScoreAnimator;
use crate::model::{Question, QuestionResult, Quiz, SessionSummary};
use crate::scoring::ScoringRule;
use crate::time::Clock;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A mutator was called outside the state it is valid in.
///
/// The engine state is left exactly as it was whenever one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no quiz loaded")]
    NoQuiz,
    #[error("session already completed")]
    Completed,
    #[error("answer is locked until the session advances")]
    AnswerLocked,
    #[error("no answer selected")]
    NoSelection,
    #[error("answer has not been checked yet")]
    NotChecked,
}

//
// ─── TRANSITION RESULTS ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Answering { index: usize },
    Checked { index: usize },
    Complete,
}

/// Result of locking in an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub correct: bool,
    pub points: u32,
    pub streak: u32,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub time_left: u32,
    pub expired: bool,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Owns the state of one quiz run and exposes the only legal transitions on it.
///
/// `Empty → Answering(i) → Checked(i) → Answering(i + 1) → … → Complete`.
/// `initialize` enters `Answering(0)` from any state and keeps the best streak;
/// `reset` returns to `Empty` and clears everything.
pub struct SessionEngine {
    rule: ScoringRule,
    animator: ScoreAnimator,
    clock: Clock,
    quiz: Option<Arc<Quiz>>,
    current: usize,
    selected: Option<String>,
    checked: bool,
    complete: bool,
    score: u32,
    displayed_score: u32,
    streak: u32,
    best_streak: u32,
    correct_answers: u32,
    results: Vec<QuestionResult>,
    time_left: Option<u32>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(ScoringRule::default())
    }
}

impl SessionEngine {
    #[must_use]
    pub fn new(rule: ScoringRule) -> Self {
        Self {
            rule,
            animator: ScoreAnimator::default(),
            clock: Clock::default_clock(),
            quiz: None,
            current: 0,
            selected: None,
            checked: false,
            complete: false,
            score: 0,
            displayed_score: 0,
            streak: 0,
            best_streak: 0,
            correct_answers: 0,
            results: Vec::new(),
            time_left: None,
            started_at: None,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_animator(mut self, animator: ScoreAnimator) -> Self {
        self.animator = animator;
        self
    }

    /// Load a quiz and start from its first question.
    ///
    /// Score, streak and correct count go back to zero; the best streak is kept.
    pub fn initialize(&mut self, quiz: impl Into<Arc<Quiz>>) {
        let quiz = quiz.into();
        debug!(questions = quiz.len(), "initializing quiz session");
        self.results = Vec::with_capacity(quiz.len());
        self.quiz = Some(quiz);
        self.current = 0;
        self.selected = None;
        self.checked = false;
        self.complete = false;
        self.score = 0;
        self.displayed_score = 0;
        self.streak = 0;
        self.correct_answers = 0;
        self.time_left = self.rule.duration_secs();
        self.started_at = Some(self.clock.now());
        self.completed_at = None;
    }

    /// Hard reset: drop the quiz and clear every counter, best streak included.
    pub fn reset(&mut self) {
        debug!("resetting quiz session");
        let rule = self.rule;
        let animator = self.animator;
        let clock = self.clock;
        *self = Self::new(rule).with_clock(clock).with_animator(animator);
    }

    /// Choose an option for the current question.
    ///
    /// Values outside the question's options are accepted; they simply never
    /// match the correct answer.
    ///
    /// # Errors
    ///
    /// `NoQuiz`, `Completed`, or `AnswerLocked` once the answer was checked.
    pub fn select_answer(&mut self, option: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_open()?;
        if self.checked {
            return Err(SessionError::AnswerLocked);
        }
        self.selected = Some(option.into());
        Ok(())
    }

    /// Lock in the selected answer and score it.
    ///
    /// # Errors
    ///
    /// `NoQuiz`, `Completed`, `AnswerLocked` if already checked, `NoSelection`.
    pub fn check_answer(&mut self) -> Result<CheckOutcome, SessionError> {
        self.ensure_open()?;
        if self.checked {
            return Err(SessionError::AnswerLocked);
        }
        let selected = self.selected.clone().ok_or(SessionError::NoSelection)?;
        self.lock_in(Some(selected))
    }

    /// Move past a checked question, or finish the session on the last one.
    ///
    /// # Errors
    ///
    /// `NoQuiz`, `Completed`, or `NotChecked` when the answer is still open.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let last = self.ensure_open()?.last_index();
        if !self.checked {
            return Err(SessionError::NotChecked);
        }

        if self.current >= last {
            self.finish();
            return Ok(Advance::Completed);
        }

        self.current += 1;
        self.selected = None;
        self.checked = false;
        debug!(index = self.current, "advanced to next question");
        Ok(Advance::Next {
            index: self.current,
        })
    }

    /// One animation step of the displayed score toward the committed score.
    pub fn tick_display(&mut self) -> u32 {
        self.displayed_score = self.animator.step(self.displayed_score, self.score);
        self.displayed_score
    }

    /// Run the quiz-wide countdown. Only meaningful for `ScoringRule::Countdown`.
    ///
    /// When time runs out the open question is locked in as-is (or recorded
    /// unanswered), the remaining questions count as unanswered, and the
    /// session completes.
    pub fn tick_clock(&mut self, elapsed_secs: u32) -> Option<CountdownTick> {
        if self.quiz.is_none() || self.complete {
            return None;
        }
        let left = self.time_left?.saturating_sub(elapsed_secs);
        self.time_left = Some(left);
        if left > 0 {
            return Some(CountdownTick {
                time_left: left,
                expired: false,
            });
        }

        debug!(index = self.current, "countdown expired");
        if !self.checked {
            let selected = self.selected.clone();
            // Open and not complete was checked above.
            let _ = self.lock_in(selected);
        }
        let total = self.total_questions();
        while self.results.len() < total {
            self.results.push(QuestionResult {
                selected: None,
                correct: false,
                points: 0,
            });
        }
        self.finish();
        Some(CountdownTick {
            time_left: 0,
            expired: true,
        })
    }

    fn ensure_open(&self) -> Result<&Arc<Quiz>, SessionError> {
        let quiz = self.quiz.as_ref().ok_or(SessionError::NoQuiz)?;
        if self.complete {
            return Err(SessionError::Completed);
        }
        Ok(quiz)
    }

    fn lock_in(&mut self, selected: Option<String>) -> Result<CheckOutcome, SessionError> {
        let quiz = Arc::clone(self.ensure_open()?);
        let question = quiz
            .question(self.current)
            .ok_or(SessionError::NoQuiz)?;
        let correct = selected
            .as_deref()
            .is_some_and(|answer| question.is_correct(answer));

        let points = if correct {
            self.streak += 1;
            let points = self.rule.points_for_correct(self.streak, self.time_left);
            self.score += points;
            self.correct_answers += 1;
            self.best_streak = self.best_streak.max(self.streak);
            points
        } else {
            self.streak = 0;
            0
        };

        self.checked = true;
        self.results.push(QuestionResult {
            selected,
            correct,
            points,
        });
        debug!(
            index = self.current,
            correct,
            points,
            score = self.score,
            streak = self.streak,
            "answer checked"
        );

        Ok(CheckOutcome {
            correct,
            points,
            streak: self.streak,
            correct_answer: question.correct_answer().to_owned(),
        })
    }

    fn finish(&mut self) {
        self.complete = true;
        self.completed_at = Some(self.clock.now());
        debug!(
            score = self.score,
            correct = self.correct_answers,
            best_streak = self.best_streak,
            "quiz session complete"
        );
    }

    //
    // ─── READ ACCESSORS ────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn rule(&self) -> ScoringRule {
        self.rule
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Arc<Quiz>> {
        self.quiz.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (&self.quiz, self.complete, self.checked) {
            (None, _, _) => SessionPhase::Empty,
            (Some(_), true, _) => SessionPhase::Complete,
            (Some(_), false, true) => SessionPhase::Checked {
                index: self.current,
            },
            (Some(_), false, false) => SessionPhase::Answering {
                index: self.current,
            },
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref()?.question(self.current)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.quiz.as_ref().map_or(0, |quiz| quiz.len())
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn is_answer_checked(&self) -> bool {
        self.checked
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn displayed_score(&self) -> u32 {
        self.displayed_score
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    /// Seconds left on the countdown; `None` under the streak rule or with no quiz.
    #[must_use]
    pub fn time_left(&self) -> Option<u32> {
        self.quiz.as_ref().and(self.time_left)
    }

    /// Terminal state: set only by advancing past the last question or by the
    /// countdown running out.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.quiz.is_some() && self.complete
    }

    /// True while the last question is showing. Not a transition by itself.
    #[must_use]
    pub fn on_last_question(&self) -> bool {
        self.quiz.is_some() && self.current + 1 >= self.total_questions()
    }

    /// `(current_index + (on last question ? 1 : 0)) / total * 100`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percentage(&self) -> f64 {
        let total = self.total_questions();
        if total == 0 {
            return 0.0;
        }
        let reached = self.current + usize::from(self.on_last_question());
        reached as f64 / total as f64 * 100.0
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.rule.max_score(self.total_questions())
    }

    /// Available once the session is complete.
    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        if !self.is_complete() {
            return None;
        }
        let (started_at, completed_at) = self.started_at.zip(self.completed_at)?;
        Some(SessionSummary::new(
            self.total_questions(),
            self.correct_answers,
            self.score,
            self.max_score(),
            self.best_streak,
            self.results.clone(),
            started_at,
            completed_at,
        ))
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("rule", &self.rule)
            .field("questions", &self.total_questions())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("checked", &self.checked)
            .field("complete", &self.complete)
            .field("score", &self.score)
            .field("streak", &self.streak)
            .field("best_streak", &self.best_streak)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
