use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::scoring::Medal;

/// Locked-in outcome of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    /// `None` when the countdown ran out before anything was selected.
    pub selected: Option<String>,
    pub correct: bool,
    pub points: u32,
}

/// Read-only view of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    total_questions: usize,
    correct_answers: u32,
    score: u32,
    max_score: u32,
    best_streak: u32,
    results: Vec<QuestionResult>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        total_questions: usize,
        correct_answers: u32,
        score: u32,
        max_score: u32,
        best_streak: u32,
        results: Vec<QuestionResult>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            total_questions,
            correct_answers,
            score,
            max_score,
            best_streak,
            results,
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }

    #[must_use]
    pub fn medal(&self) -> Medal {
        Medal::for_score(self.score)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Never negative, even if the clock was adjusted mid-session.
    #[must_use]
    pub fn duration(&self) -> Duration {
        (self.completed_at - self.started_at).max(Duration::zero())
    }

    /// Share of `max_score` reached, in `0.0..=100.0`.
    #[must_use]
    pub fn score_percentage(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        (f64::from(self.score) / f64::from(self.max_score) * 100.0).min(100.0)
    }
}
