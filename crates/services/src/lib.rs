#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod generator;
pub mod parse;
pub mod prompt;
pub mod sessions;
pub mod supplier;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{GenerationError, QuizServiceError, SupplyError};
pub use generator::{GeneratorConfig, OpenAiQuizGenerator, QuizGenerator};
pub use prompt::{PromptOptions, QuizPrompt};
pub use sessions::{ANIMATION_PERIOD, FetchOutcome, QuizSessionService, SessionSnapshot};
pub use supplier::{ArticleQuizSupplier, QuizSupplier};
