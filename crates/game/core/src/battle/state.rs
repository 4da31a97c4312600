//! Battle state aggregates.

use crate::agent::Agent;
use crate::battle::enemy::{EnemyActionKind, EnemyActionSpec};
use crate::battle::stats::BattleStats;
use crate::config::BattleConfig;
use crate::effect::EffectTable;

/// Enemy combat stage. Transitions Normal → Enhanced exactly once per
/// battle, irreversibly, when HP drops to half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Normal,
    Enhanced,
}

/// What a defensive stance does while it lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DefenseKind {
    /// Reduces incoming damage by the stance value.
    Shield,
    /// Returns a fraction of received damage to the attacker.
    Counter,
}

/// The enemy's wait cycle between actions.
///
/// Modeled as a tagged enum so the timer fields cannot exist without the
/// mode they belong to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaitMode {
    /// Ready to pick the next action.
    None,
    /// Winding up the pending action in `BattleState::next_action`.
    Charging { remaining: f64 },
    /// Holding a defensive stance.
    Defending {
        remaining: f64,
        defense: DefenseKind,
        value: f64,
    },
}

/// Outcome of one completed typing challenge, supplied by the typing UI.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypingOutcome {
    /// Percent, `0.0..=100.0`.
    pub accuracy: f64,
    pub wpm: f64,
    pub combo: u32,
}

/// The enemy action currently winding up.
///
/// `expected_value` is computed once at selection time for the prediction
/// display; execution recomputes damage from live stats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NextEnemyAction {
    pub name: String,
    pub kind: EnemyActionKind,
    pub charge_time: f64,
    pub expected_value: Option<i32>,
}

/// The player side of a battle.
#[derive(Debug)]
pub struct PlayerModel {
    pub hp: i32,
    pub max_hp: i32,
    pub effects: EffectTable,
    /// Sub-point regen accumulation between ticks.
    pub(crate) regen_carry: f64,
}

impl PlayerModel {
    pub fn new(max_hp: i32, effects: EffectTable) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            effects,
            regen_carry: 0.0,
        }
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Applies healing, clamped at max HP unless overheal is allowed, in
    /// which case the cap is [`BattleConfig::OVERHEAL_CAP`] of max.
    /// Returns the realized amount.
    pub fn apply_heal(&mut self, amount: i32, overheal: bool) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let cap = if overheal {
            (f64::from(self.max_hp) * BattleConfig::OVERHEAL_CAP).round() as i32
        } else {
            self.max_hp
        };
        if self.hp >= cap {
            return 0;
        }
        let healed = amount.min(cap - self.hp);
        self.hp += healed;
        healed
    }

    /// Applies damage, clamped at zero. Returns the realized amount.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }
}

/// The enemy side of a battle.
#[derive(Debug)]
pub struct EnemyModel {
    pub type_id: u32,
    pub name: String,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    /// Damage multiplier on player-dealt damage, percent. Starts at 100,
    /// rises over time, capped at 999.9.
    pub voltage: f64,
    /// Voltage gained per ten seconds of battle time.
    pub voltage_rise_per_10s: f64,
    pub phase: Phase,
    pub wait: WaitMode,
    pub effects: EffectTable,
    /// Action pattern while in Normal phase.
    pub actions: Vec<EnemyActionSpec>,
    /// Action pattern after the Enhanced transition.
    pub enhanced_actions: Vec<EnemyActionSpec>,
}

impl EnemyModel {
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Applies damage, clamped at zero. Returns the realized amount.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Applies healing (life steal), clamped at max HP. Enemies never
    /// overheal. Returns the realized amount.
    pub fn apply_heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.hp >= self.max_hp {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// The action pattern for the current phase.
    pub fn current_pattern(&self) -> &[EnemyActionSpec] {
        match self.phase {
            Phase::Normal => &self.actions,
            // An empty enhanced pattern falls back to the normal one.
            Phase::Enhanced if self.enhanced_actions.is_empty() => &self.actions,
            Phase::Enhanced => &self.enhanced_actions,
        }
    }
}

/// Root aggregate for one battle.
///
/// Owned exclusively by the loop that drives it; discarded wholesale when
/// the battle ends or is abandoned.
#[derive(Debug)]
pub struct BattleState {
    pub player: PlayerModel,
    pub enemy: EnemyModel,
    /// Immutable snapshot of the equipped squad.
    pub agents: Vec<Agent>,
    pub stats: BattleStats,
    pub next_action: Option<NextEnemyAction>,
    /// Battle clock in seconds.
    pub elapsed: f64,
}

impl BattleState {
    pub fn is_over(&self) -> bool {
        self.player.is_defeated() || self.enemy.is_defeated()
    }
}
