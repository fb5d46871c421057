use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use quiz_core::session::CountdownTick;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use super::service::{QuizSessionService, SessionSlot};

/// Default animation period for the displayed score.
pub const ANIMATION_PERIOD: Duration = Duration::from_millis(30);

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

impl QuizSessionService {
    /// Drive the displayed score on a tokio interval and publish every value.
    ///
    /// Each tick steps the engine under the session lock, so it reads the score
    /// as last committed. The task ends when the service state is dropped or
    /// every receiver is gone. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn_score_animation(&self, period: Duration) -> (watch::Receiver<u32>, JoinHandle<()>) {
        let weak = Arc::downgrade(&self.state);
        let initial = with_slot(&weak, |slot| slot.engine.displayed_score()).unwrap_or(0);
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(value) = with_slot(&weak, |slot| slot.engine.tick_display()) else {
                    break;
                };
                // Only wake receivers when the value moved.
                let moved = tx.send_if_modified(|current| {
                    let changed = *current != value;
                    *current = value;
                    changed
                });
                if moved {
                    debug!(displayed = value, "score animation tick");
                }
                if tx.is_closed() {
                    break;
                }
            }
        });
        (rx, handle)
    }

    /// Run the quiz-wide countdown once per second and publish every tick.
    ///
    /// Nothing is published while no countdown is running (streak rule, no
    /// quiz, or session complete); the task keeps waiting for the next quiz.
    /// The clock stands still while a fetch is pending, like every other
    /// session mutation.
    #[must_use]
    pub fn spawn_countdown(&self) -> (watch::Receiver<Option<CountdownTick>>, JoinHandle<()>) {
        let weak = Arc::downgrade(&self.state);
        let tickets = Arc::clone(&self.tickets);
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(COUNTDOWN_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; a full second must pass first.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(tick) = with_slot(&weak, |slot| {
                    if slot.is_pending(&tickets) {
                        return None;
                    }
                    slot.engine.tick_clock(1)
                }) else {
                    break;
                };
                if let Some(tick) = tick {
                    if tick.expired {
                        debug!("countdown expired");
                    }
                    tx.send_replace(Some(tick));
                }
                if tx.is_closed() {
                    break;
                }
            }
        });
        (rx, handle)
    }
}

/// Run `f` under the lock if the state is still alive and not poisoned.
fn with_slot<T>(weak: &Weak<Mutex<SessionSlot>>, f: impl FnOnce(&mut SessionSlot) -> T) -> Option<T> {
    let state = weak.upgrade()?;
    let mut slot = state.lock().ok()?;
    Some(f(&mut slot))
}
