//! Battle statistics and the end-of-battle result.

/// Running totals for one battle, consumed by the reward and statistics
/// subsystems after the battle ends.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStats {
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub healing_done: i64,
    pub modules_used: u32,
    pub crits: u32,
    pub best_combo: u32,
    wpm_total: f64,
    accuracy_total: f64,
    typing_samples: u32,
}

impl BattleStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed typing challenge.
    pub fn record_typing(&mut self, wpm: f64, accuracy: f64, combo: u32) {
        self.wpm_total += wpm;
        self.accuracy_total += accuracy;
        self.typing_samples += 1;
        self.best_combo = self.best_combo.max(combo);
    }

    /// Average WPM across recorded challenges, 0 when none were recorded.
    pub fn average_wpm(&self) -> f64 {
        if self.typing_samples == 0 {
            return 0.0;
        }
        self.wpm_total / f64::from(self.typing_samples)
    }

    /// Average accuracy across recorded challenges, 0 when none were
    /// recorded.
    pub fn average_accuracy(&self) -> f64 {
        if self.typing_samples == 0 {
            return 0.0;
        }
        self.accuracy_total / f64::from(self.typing_samples)
    }
}

/// Outcome of a finished battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub is_victory: bool,
    pub stats: BattleStats,
}
