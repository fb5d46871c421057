use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{Question, QuestionDraft, QuestionError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,

    #[error("question {index} is invalid: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Payload shape returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDraft {
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// Validate every question. A single bad question rejects the whole quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Question` with the offending index, or
    /// `QuizError::Empty` when the list is empty.
    pub fn validate(self) -> Result<Quiz, QuizError> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| QuizError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Quiz::new(questions)
    }
}

/// Immutable, non-empty ordered list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    questions: Vec<Question>,
}

impl Quiz {
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionKind;

    #[test]
    fn empty_quiz_is_rejected() {
        assert_eq!(Quiz::new(Vec::new()).unwrap_err(), QuizError::Empty);
        let draft = QuizDraft {
            questions: Vec::new(),
        };
        assert_eq!(draft.validate().unwrap_err(), QuizError::Empty);
    }

    #[test]
    fn one_bad_question_rejects_the_quiz() {
        let draft = QuizDraft {
            questions: vec![
                QuestionDraft {
                    question: "Sant?".into(),
                    kind: QuestionKind::TrueFalse,
                    options: vec!["Sant".into(), "Usant".into()],
                    answer: "Sant".into(),
                },
                QuestionDraft {
                    question: "Hvem?".into(),
                    kind: QuestionKind::MultipleChoice,
                    options: vec!["A".into(), "B".into()],
                    answer: "A".into(),
                },
            ],
        };
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, QuizError::Question { index: 1, .. }));
    }
}
