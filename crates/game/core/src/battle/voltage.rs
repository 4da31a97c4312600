//! Voltage: the time-increasing damage multiplier on the enemy.
//!
//! Voltage starts at 100%, rises continuously with battle time at the enemy
//! type's rate, and is clamped at 999.9%. It scales only damage the player
//! deals to the enemy: healing and enemy-dealt damage are never affected.
//! Voltage persists across the Enhanced phase transition and resets only at
//! battle start.

use crate::battle::state::EnemyModel;
use crate::config::BattleConfig;

/// Advances and resets enemy voltage.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoltageManager;

impl VoltageManager {
    /// Advances voltage by elapsed battle time.
    ///
    /// No-op when the delta is non-positive or the enemy's rise rate is
    /// non-positive. The result is clamped to [`BattleConfig::VOLTAGE_CAP`].
    pub fn update(enemy: &mut EnemyModel, delta_seconds: f64) {
        if delta_seconds <= 0.0 || enemy.voltage_rise_per_10s <= 0.0 {
            return;
        }
        let risen = enemy.voltage + enemy.voltage_rise_per_10s / 10.0 * delta_seconds;
        enemy.voltage = risen.min(BattleConfig::VOLTAGE_CAP);
    }

    /// Resets voltage to exactly the base value. Called at battle start only.
    pub fn reset(enemy: &mut EnemyModel) {
        enemy.voltage = BattleConfig::VOLTAGE_BASE;
    }
}
