mod service;
mod snapshot;
mod ticker;

// Public API of the session subsystem.
pub use crate::error::QuizServiceError;
pub use service::{FetchOutcome, QuizSessionService};
pub use snapshot::SessionSnapshot;
pub use ticker::ANIMATION_PERIOD;
