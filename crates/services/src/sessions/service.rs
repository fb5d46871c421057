use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use quiz_core::SessionEngine;
use quiz_core::scoring::ScoringRule;
use quiz_core::session::{Advance, CheckOutcome};
use quiz_core::{Clock, SessionError};
use tracing::{debug, info, warn};

use crate::error::QuizServiceError;
use crate::supplier::QuizSupplier;

use super::snapshot::SessionSnapshot;

//
// ─── SHARED STATE ──────────────────────────────────────────────────────────────
//

/// Engine plus the ticket of the last fetch that was allowed to land.
pub(crate) struct SessionSlot {
    pub(crate) engine: SessionEngine,
    settled: u64,
}

impl SessionSlot {
    /// A fetch started after the last one that landed, was dropped, or was reset.
    pub(crate) fn is_pending(&self, tickets: &AtomicU64) -> bool {
        tickets.load(Ordering::SeqCst) != self.settled
    }
}

/// Result of a fetch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The quiz was loaded into the session.
    Loaded { questions: usize },
    /// A newer fetch (or a reset) started meanwhile; this response was dropped.
    Superseded,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Serializes every session mutation behind one lock and wires the engine to a supplier.
///
/// Fetches are numbered; only the most recently started fetch may initialize
/// the engine, so a slow earlier response cannot replace a newer quiz. While a
/// fetch is outstanding, per-question mutators return `FetchPending`.
#[derive(Clone)]
pub struct QuizSessionService {
    supplier: Arc<dyn QuizSupplier>,
    pub(crate) state: Arc<Mutex<SessionSlot>>,
    pub(crate) tickets: Arc<AtomicU64>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(supplier: Arc<dyn QuizSupplier>, rule: ScoringRule) -> Self {
        Self::with_engine(supplier, SessionEngine::new(rule))
    }

    #[must_use]
    pub fn with_engine(supplier: Arc<dyn QuizSupplier>, engine: SessionEngine) -> Self {
        Self {
            supplier,
            state: Arc::new(Mutex::new(SessionSlot { engine, settled: 0 })),
            tickets: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Convenience constructor using the given clock for session timestamps.
    #[must_use]
    pub fn with_clock(supplier: Arc<dyn QuizSupplier>, rule: ScoringRule, clock: Clock) -> Self {
        Self::with_engine(supplier, SessionEngine::new(rule).with_clock(clock))
    }

    /// Fetch a new quiz and, if this is still the latest request, load it.
    ///
    /// On failure the current session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::FetchFailed` when the supplier fails, or
    /// `QuizServiceError::Poisoned` if the session lock is poisoned.
    pub async fn fetch_quiz(&self) -> Result<FetchOutcome, QuizServiceError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let mut guard = FetchGuard {
            service: self,
            ticket,
            armed: true,
        };
        debug!(ticket, "fetching quiz");

        let result = self.supplier.fetch_quiz().await;

        let mut slot = self.lock()?;
        guard.armed = false;
        if self.tickets.load(Ordering::SeqCst) != ticket {
            warn!(ticket, "discarding superseded quiz response");
            return Ok(FetchOutcome::Superseded);
        }
        slot.settled = ticket;

        match result {
            Ok(quiz) => {
                let questions = quiz.len();
                slot.engine.initialize(quiz);
                info!(ticket, questions, "quiz loaded");
                Ok(FetchOutcome::Loaded { questions })
            }
            Err(err) => {
                warn!(ticket, error = %err, "quiz fetch failed");
                Err(err.into())
            }
        }
    }

    /// # Errors
    ///
    /// `FetchPending`, `Poisoned`, or the engine's `SessionError`.
    pub fn select_answer(&self, option: &str) -> Result<(), QuizServiceError> {
        self.mutate(|engine| engine.select_answer(option))
    }

    /// # Errors
    ///
    /// `FetchPending`, `Poisoned`, or the engine's `SessionError`.
    pub fn check_answer(&self) -> Result<CheckOutcome, QuizServiceError> {
        self.mutate(SessionEngine::check_answer)
    }

    /// # Errors
    ///
    /// `FetchPending`, `Poisoned`, or the engine's `SessionError`.
    pub fn advance(&self) -> Result<Advance, QuizServiceError> {
        self.mutate(SessionEngine::advance)
    }

    /// Full restart: clears the session (best streak included) and drops any
    /// in-flight fetch.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Poisoned` if the session lock is poisoned.
    pub fn reset(&self) -> Result<(), QuizServiceError> {
        let mut slot = self.lock()?;
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        slot.settled = ticket;
        slot.engine.reset();
        Ok(())
    }

    /// One animation step of the displayed score, taken under the session lock.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Poisoned` if the session lock is poisoned.
    pub fn tick_display(&self) -> Result<u32, QuizServiceError> {
        Ok(self.lock()?.engine.tick_display())
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Poisoned` if the session lock is poisoned.
    pub fn snapshot(&self) -> Result<SessionSnapshot, QuizServiceError> {
        let slot = self.lock()?;
        let pending = self.is_pending(&slot);
        Ok(SessionSnapshot::capture(&slot.engine, pending))
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Poisoned` if the session lock is poisoned.
    pub fn fetch_pending(&self) -> Result<bool, QuizServiceError> {
        let slot = self.lock()?;
        Ok(self.is_pending(&slot))
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut SessionEngine) -> Result<T, SessionError>,
    ) -> Result<T, QuizServiceError> {
        let mut slot = self.lock()?;
        if self.is_pending(&slot) {
            return Err(QuizServiceError::FetchPending);
        }
        Ok(op(&mut slot.engine)?)
    }

    fn is_pending(&self, slot: &SessionSlot) -> bool {
        slot.is_pending(&self.tickets)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionSlot>, QuizServiceError> {
        self.state
            .lock()
            .map_err(|e| QuizServiceError::Poisoned(e.to_string()))
    }
}

impl fmt::Debug for QuizSessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionService")
            .field("tickets", &self.tickets.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Settles a fetch whose future was dropped before it could land, so a
/// cancelled request does not leave the session pending forever.
struct FetchGuard<'a> {
    service: &'a QuizSessionService,
    ticket: u64,
    armed: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut slot) = self.service.state.lock() else {
            return;
        };
        if self.service.tickets.load(Ordering::SeqCst) == self.ticket {
            debug!(ticket = self.ticket, "quiz fetch cancelled");
            slot.settled = self.ticket;
        }
    }
}
