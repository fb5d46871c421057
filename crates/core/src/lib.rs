#![forbid(unsafe_code)]

pub mod animator;
pub mod model;
pub mod scoring;
pub mod session;
pub mod time;

pub use session::{SessionEngine, SessionError, SessionPhase};
pub use time::Clock;
