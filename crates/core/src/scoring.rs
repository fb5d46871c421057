use serde::{Deserialize, Serialize};

/// Points for any correct answer.
pub const BASE_POINTS: u32 = 10;

/// Extra points for a correct answer that extends a streak past the first.
pub const BONUS_POINTS: u32 = 5;

/// Upper bound of the time bonus in the countdown variant.
pub const MAX_TIME_BONUS: u32 = 5;

/// Length of the shared countdown in the countdown variant.
pub const COUNTDOWN_SECS: u32 = 60;

//
// ─── SCORING RULE ─────────────────────────────────────────────────────────────
//

/// How a correct answer is rewarded.
///
/// The two variants never mix: `Streak` rewards consecutive correct answers,
/// `Countdown` rewards answering while much of a quiz-wide timer remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringRule {
    Streak {
        base: u32,
        bonus: u32,
    },
    Countdown {
        base: u32,
        max_bonus: u32,
        duration_secs: u32,
    },
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self::streak()
    }
}

impl ScoringRule {
    #[must_use]
    pub fn streak() -> Self {
        Self::Streak {
            base: BASE_POINTS,
            bonus: BONUS_POINTS,
        }
    }

    #[must_use]
    pub fn countdown(duration_secs: u32) -> Self {
        Self::Countdown {
            base: BASE_POINTS,
            max_bonus: MAX_TIME_BONUS,
            duration_secs,
        }
    }

    /// Countdown length, or `None` for the streak rule.
    #[must_use]
    pub fn duration_secs(&self) -> Option<u32> {
        match self {
            Self::Streak { .. } => None,
            Self::Countdown { duration_secs, .. } => Some(*duration_secs),
        }
    }

    /// Points for a correct answer.
    ///
    /// `streak` is the streak *including* this answer. `time_left` is only
    /// read by the countdown rule; `None` there means no time bonus.
    #[must_use]
    pub fn points_for_correct(&self, streak: u32, time_left: Option<u32>) -> u32 {
        match *self {
            Self::Streak { base, bonus } => {
                if streak <= 1 {
                    base
                } else {
                    base + bonus
                }
            }
            Self::Countdown {
                base,
                max_bonus,
                duration_secs,
            } => base + time_bonus(time_left.unwrap_or(0), duration_secs, max_bonus),
        }
    }

    /// Highest score reachable on a quiz of `questions` questions.
    #[must_use]
    pub fn max_score(&self, questions: usize) -> u32 {
        let n = u32::try_from(questions).unwrap_or(u32::MAX);
        match *self {
            Self::Streak { base, bonus } => {
                base.saturating_mul(n)
                    .saturating_add(bonus.saturating_mul(n.saturating_sub(1)))
            }
            Self::Countdown {
                base, max_bonus, ..
            } => (base + max_bonus).saturating_mul(n),
        }
    }
}

/// `floor(time_left / duration * max_bonus)`, clamped to `max_bonus`.
fn time_bonus(time_left: u32, duration_secs: u32, max_bonus: u32) -> u32 {
    if duration_secs == 0 {
        return 0;
    }
    let left = u64::from(time_left.min(duration_secs));
    let bonus = left * u64::from(max_bonus) / u64::from(duration_secs);
    u32::try_from(bonus).unwrap_or(max_bonus)
}

//
// ─── MEDAL ────────────────────────────────────────────────────────────────────
//

/// Award shown on the result screen, on absolute score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    TryAgain,
}

impl Medal {
    #[must_use]
    pub fn for_score(score: u32) -> Self {
        if score >= 100 {
            Medal::Gold
        } else if score >= 70 {
            Medal::Silver
        } else if score >= 40 {
            Medal::Bronze
        } else {
            Medal::TryAgain
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Medal::Gold => "🥇 Gull",
            Medal::Silver => "🥈 Sølv",
            Medal::Bronze => "🥉 Bronse",
            Medal::TryAgain => "😅 Prøv igjen!",
        }
    }
}
