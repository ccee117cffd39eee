//! Shared combo/score kernel.
//!
//! Both rule variants (solitaire pyramid and multiplayer tower matching)
//! track the same thing: a run of consecutive successful plays since the
//! last reset, multiplying a per-play base. Keeping the bookkeeping here
//! stops the two engines drifting apart.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboScore {
    pub score: i64,
    pub combo: u32,
    pub max_combo: u32,
}

/// What a successful play did to the kernel, for broadcast/display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub points_awarded: i64,
    pub combo: u32,
}

impl ComboScore {
    /// Record a successful play: combo increments first, then the award is
    /// `base_points * combo`.
    pub fn record_match(&mut self, base_points: i64) -> MoveOutcome {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        let points = base_points * self.combo as i64;
        self.score += points;
        MoveOutcome {
            points_awarded: points,
            combo: self.combo,
        }
    }

    /// A draw or failed match breaks the run. Score is untouched.
    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Flat score adjustment (bonuses, penalties). No floor.
    pub fn add(&mut self, points: i64) {
        self.score += points;
    }
}
