mod article;
mod question;
mod quiz;
mod summary;

pub use article::{Article, Lenient};
pub use question::{
    MULTIPLE_CHOICE_OPTIONS, Question, QuestionDraft, QuestionError, QuestionKind,
    TRUE_FALSE_OPTIONS,
};
pub use quiz::{Quiz, QuizDraft, QuizError};
pub use summary::{QuestionResult, SessionSummary};
