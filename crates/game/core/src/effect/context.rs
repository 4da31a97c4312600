//! Immutable snapshot of battle state for effect enablement checks.

use bitflags::bitflags;

/// The battle event an evaluation is resolving.
///
/// Conditional effects can gate on this so that, say, a counter passive only
/// fires while resolving an enemy attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    /// Battle initialization.
    BattleStart,
    /// A periodic clock tick (regen, challenge modifiers).
    Tick,
    /// A player module resolving after a completed typing challenge.
    ModuleUse,
    /// An enemy attack resolving after its charge elapsed.
    EnemyAttack,
}

bitflags! {
    /// Category flags of the module currently being resolved.
    ///
    /// Evaluations outside a module resolution carry an empty set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ModuleCategories: u8 {
        const ATTACK  = 1 << 0;
        const HEAL    = 1 << 1;
        const BUFF    = 1 << 2;
        const DEBUFF  = 1 << 3;
        const SUPPORT = 1 << 4;
    }
}

/// Snapshot of battle-relevant state passed to every enablement predicate.
///
/// Constructed fresh per evaluation from the current `BattleState`, never
/// stored beyond one `calculate` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectContext {
    /// Player HP as a fraction of maximum, `0.0..=1.0` (overheal may exceed).
    pub player_hp_ratio: f64,
    /// Enemy HP as a fraction of maximum.
    pub enemy_hp_ratio: f64,
    /// Typing accuracy of the triggering challenge, percent `0.0..=100.0`.
    pub accuracy: f64,
    /// Words per minute of the triggering challenge.
    pub wpm: f64,
    /// Current consecutive-success combo.
    pub combo: u32,
    /// The event being resolved.
    pub event: TriggerEvent,
    /// Categories of the module being resolved, empty outside module use.
    pub categories: ModuleCategories,
    /// Whether the enemy currently carries at least one debuff row.
    pub enemy_has_debuff: bool,
}

impl EffectContext {
    /// A neutral context for evaluations with no typing challenge attached.
    pub fn ambient(
        player_hp_ratio: f64,
        enemy_hp_ratio: f64,
        event: TriggerEvent,
        enemy_has_debuff: bool,
    ) -> Self {
        Self {
            player_hp_ratio,
            enemy_hp_ratio,
            accuracy: 0.0,
            wpm: 0.0,
            combo: 0,
            event,
            categories: ModuleCategories::empty(),
            enemy_has_debuff,
        }
    }
}
