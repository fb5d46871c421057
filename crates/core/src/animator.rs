//! Cosmetic score animation.
//!
//! The displayed score chases the authoritative score one tick at a time.
//! Any periodic driver (tokio interval, render loop, test loop) calls [`step`].

/// Default convergence divisor: each tick closes about an eighth of the gap.
pub const STEP_DIVISOR: u32 = 8;

/// One animation tick from `current` toward `target`.
///
/// Moves up by `ceil((target - current) / divisor)`, so it never overshoots
/// and always makes progress. A `current` at or above `target` snaps to
/// `target`. A zero divisor is treated as 1.
#[must_use]
pub fn step(current: u32, target: u32, divisor: u32) -> u32 {
    if current >= target {
        return target;
    }
    let gap = target - current;
    current + gap.div_ceil(divisor.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAnimator {
    divisor: u32,
}

impl Default for ScoreAnimator {
    fn default() -> Self {
        Self::new(STEP_DIVISOR)
    }
}

impl ScoreAnimator {
    #[must_use]
    pub fn new(divisor: u32) -> Self {
        Self {
            divisor: divisor.max(1),
        }
    }

    #[must_use]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    #[must_use]
    pub fn step(&self, current: u32, target: u32) -> u32 {
        step(current, target, self.divisor)
    }

    /// Number of ticks needed to go from `current` to `target`.
    #[cfg(test)]
    fn ticks_to_converge(&self, mut current: u32, target: u32) -> u32 {
        let mut ticks = 0;
        while current != target {
            current = self.step(current, target);
            ticks += 1;
        }
        ticks
    }
}
