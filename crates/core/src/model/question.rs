use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed labels offered for every true/false question, in display order.
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["Sant", "Usant"];

/// Number of options a multiple-choice question must carry.
pub const MULTIPLE_CHOICE_OPTIONS: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("question has no options")]
    NoOptions,

    #[error("option {index} is blank")]
    BlankOption { index: usize },

    #[error("option `{option}` appears more than once")]
    DuplicateOption { option: String },

    #[error("multiple-choice question needs {MULTIPLE_CHOICE_OPTIONS} options, got {len}")]
    WrongOptionCount { len: usize },

    #[error("true/false question must offer exactly [\"Sant\", \"Usant\"]")]
    WrongTrueFalseLabels,

    #[error("answer `{answer}` is not one of the options")]
    AnswerNotInOptions { answer: String },
}

//
// ─── QUESTION KIND ────────────────────────────────────────────────────────────
//

/// Presentation shape of a question. Serialized with the generator's names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multipleChoice")]
    MultipleChoice,
    #[serde(rename = "trueOrFalse")]
    TrueFalse,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multipleChoice",
            QuestionKind::TrueFalse => "trueOrFalse",
        }
    }
}

//
// ─── DRAFT ────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when any shape rule is violated.
    pub fn validate(self) -> Result<Question, QuestionError> {
        Question::new(self.question, self.kind, self.options, self.answer)
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated quiz question. Fields are private so every instance has
/// passed the shape rules in [`Question::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    kind: QuestionKind,
    options: Vec<String>,
    correct_answer: String,
}

impl Question {
    /// Build a question, enforcing option cardinality, uniqueness and answer membership.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` describing the first violated rule.
    pub fn new(
        text: impl Into<String>,
        kind: QuestionKind,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        let correct_answer = correct_answer.into();

        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        for (index, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::BlankOption { index });
            }
            if options[..index].contains(option) {
                return Err(QuestionError::DuplicateOption {
                    option: option.clone(),
                });
            }
        }

        match kind {
            QuestionKind::MultipleChoice if options.len() != MULTIPLE_CHOICE_OPTIONS => {
                return Err(QuestionError::WrongOptionCount { len: options.len() });
            }
            QuestionKind::TrueFalse if options.iter().map(String::as_str).ne(TRUE_FALSE_OPTIONS) => {
                return Err(QuestionError::WrongTrueFalseLabels);
            }
            _ => {}
        }

        if !options.contains(&correct_answer) {
            return Err(QuestionError::AnswerNotInOptions {
                answer: correct_answer,
            });
        }

        Ok(Self {
            text,
            kind,
            options,
            correct_answer,
        })
    }

    /// Convenience constructor for a true/false question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` for blank text.
    pub fn true_false(text: impl Into<String>, answer_is_true: bool) -> Result<Self, QuestionError> {
        let answer = if answer_is_true {
            TRUE_FALSE_OPTIONS[0]
        } else {
            TRUE_FALSE_OPTIONS[1]
        };
        Self::new(
            text,
            QuestionKind::TrueFalse,
            TRUE_FALSE_OPTIONS.iter().map(|s| (*s).to_owned()).collect(),
            answer,
        )
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_answer == selected
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
