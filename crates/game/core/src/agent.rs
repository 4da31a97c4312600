//! Read-only input value objects supplied by the equipment layer.
//!
//! Agents, cores and modules are assembled outside the battle core (equip
//! screens, persistence). The battle takes an immutable snapshot of the
//! equipped squad at initialization and never mutates these definitions.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::effect::{EffectTemplate, ModuleCategories};
use crate::passive::PassiveSkill;

/// The stat vocabulary referenced by module formulas and core weightings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Str,
    Con,
    Dex,
    Int,
    Wil,
    Ego,
}

/// An agent's effective stats, already computed from core level and type
/// weighting by the equipment layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStats {
    pub str: i32,
    pub con: i32,
    pub dex: i32,
    pub int: i32,
    pub wil: i32,
    pub ego: i32,
}

impl AgentStats {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Str => self.str,
            StatKind::Con => self.con,
            StatKind::Dex => self.dex,
            StatKind::Int => self.int,
            StatKind::Wil => self.wil,
            StatKind::Ego => self.ego,
        }
    }
}

/// HP delta formula of a module: `base + coefficient × stat`.
///
/// Formula-as-data keeps module balance in content files; the engine applies
/// stat bonuses/multipliers from the effect table before evaluating.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpFormula {
    pub stat: StatKind,
    pub coefficient: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: f64,
}

impl HpFormula {
    /// Evaluates against raw stats.
    pub fn evaluate(&self, stats: &AgentStats) -> f64 {
        self.evaluate_with_stat(f64::from(stats.get(self.stat)))
    }

    /// Evaluates against an already-modified stat value.
    pub fn evaluate_with_stat(&self, stat_value: f64) -> f64 {
        self.base + self.coefficient * stat_value
    }
}

/// Broad gameplay category of a module, mirrored as context flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModuleCategory {
    Attack,
    Heal,
    Buff,
    Debuff,
    Support,
}

impl ModuleCategory {
    /// The context flag set for this category.
    pub fn flags(self) -> ModuleCategories {
        match self {
            Self::Attack => ModuleCategories::ATTACK,
            Self::Heal => ModuleCategories::HEAL,
            Self::Buff => ModuleCategories::BUFF,
            Self::Debuff => ModuleCategories::DEBUFF,
            Self::Support => ModuleCategories::SUPPORT,
        }
    }
}

/// Which side a module's HP formula applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModuleTarget {
    /// Damage dealt to the enemy.
    Enemy,
    /// Healing applied to the player.
    Player,
}

/// Which table a chain effect's payload lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChainTarget {
    /// A buff on the player's table.
    Player,
    /// A debuff on the enemy's table.
    Enemy,
}

/// A secondary effect randomly attached to a module instance at acquisition
/// time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainEffect {
    pub id: u32,
    pub target: ChainTarget,
    pub template: EffectTemplate,
}

/// A skill definition carried by an agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub id: u32,
    pub name: String,
    pub category: ModuleCategory,
    pub target: ModuleTarget,
    pub hp_formula: HpFormula,
    /// Seconds before this module can be triggered again. Enforced by the
    /// typing UI; carried here so cooldown-reduce effects have a base value.
    pub cooldown: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chain: Option<ChainEffect>,
}

/// A player-controlled unit: one stat-bearing core plus equipped modules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: u32,
    pub name: String,
    pub core_level: u32,
    pub stats: AgentStats,
    /// Passive skill granted by the agent's core type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive: Option<PassiveSkill>,
    pub modules: ArrayVec<Module, { BattleConfig::MAX_MODULES }>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_is_base_plus_stat_times_coefficient() {
        let stats = AgentStats {
            str: 10,
            ..Default::default()
        };
        let formula = HpFormula {
            stat: StatKind::Str,
            coefficient: 10.0,
            base: 0.0,
        };
        assert_eq!(formula.evaluate(&stats), 100.0);

        let offset = HpFormula {
            stat: StatKind::Str,
            coefficient: 2.0,
            base: 15.0,
        };
        assert_eq!(offset.evaluate(&stats), 35.0);
    }

    #[test]
    fn category_flags_map_one_to_one() {
        assert_eq!(ModuleCategory::Attack.flags(), ModuleCategories::ATTACK);
        assert_eq!(ModuleCategory::Support.flags(), ModuleCategories::SUPPORT);
    }

    #[test]
    fn stat_lookup_covers_all_kinds() {
        let stats = AgentStats {
            str: 1,
            con: 2,
            dex: 3,
            int: 4,
            wil: 5,
            ego: 6,
        };
        assert_eq!(stats.get(StatKind::Str), 1);
        assert_eq!(stats.get(StatKind::Wil), 5);
        assert_eq!(stats.get(StatKind::Ego), 6);
    }
}
