//! Enablement conditions as data.
//!
//! Conditions are a tagged enum with a single exhaustive evaluator rather
//! than function-valued fields. This keeps master data serializable and lets
//! the compiler check that every condition kind is handled.

use super::context::{EffectContext, ModuleCategories, TriggerEvent};

/// A predicate over [`EffectContext`] deciding whether an effect row is
/// enabled for one evaluation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// The triggering challenge was completed with 100% accuracy.
    PerfectAccuracy,
    /// Typing speed reached the threshold (words per minute).
    WpmAtLeast(f64),
    /// The success combo reached the threshold.
    ComboAtLeast(u32),
    /// Player HP ratio is at or below the threshold (fraction of max).
    PlayerHpAtMost(f64),
    /// Enemy HP ratio is at or below the threshold (fraction of max).
    EnemyHpAtMost(f64),
    /// The enemy carries at least one debuff.
    EnemyHasDebuff,
    /// The evaluation resolves the given event.
    EventIs(TriggerEvent),
    /// The module being resolved carries any of the given categories.
    CategoryAny(ModuleCategories),
    /// Never enabled. Unknown data-driven condition kinds resolve here so a
    /// malformed content row cannot crash an in-progress battle.
    Never,
}

impl Condition {
    /// Evaluates the condition against a context snapshot.
    pub fn evaluate(&self, ctx: &EffectContext) -> bool {
        match self {
            Self::PerfectAccuracy => ctx.accuracy >= 100.0,
            Self::WpmAtLeast(threshold) => ctx.wpm >= *threshold,
            Self::ComboAtLeast(threshold) => ctx.combo >= *threshold,
            Self::PlayerHpAtMost(threshold) => ctx.player_hp_ratio <= *threshold,
            Self::EnemyHpAtMost(threshold) => ctx.enemy_hp_ratio <= *threshold,
            Self::EnemyHasDebuff => ctx.enemy_has_debuff,
            Self::EventIs(event) => ctx.event == *event,
            Self::CategoryAny(categories) => ctx.categories.intersects(*categories),
            Self::Never => false,
        }
    }
}
