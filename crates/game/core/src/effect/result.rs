//! Materialized aggregation output.

use super::column::EffectColumn;
use super::entry::EntryId;

/// The ready-to-apply numeric outputs of one table evaluation.
///
/// Produced fresh per evaluation, never mutated afterwards, and consumed
/// immediately by the damage/heal formulas. An evaluation over an empty
/// table yields [`EffectResult::identity`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectResult {
    pub damage_bonus: f64,
    pub damage_multiplier: f64,
    pub armor_pierce: bool,
    pub life_steal: f64,
    pub double_cast: f64,
    pub crit_rate: f64,
    pub damage_cut: f64,
    pub evasion: f64,
    pub reflect: f64,
    pub regen: f64,
    pub heal_bonus: f64,
    pub heal_multiplier: f64,
    pub overheal: bool,
    pub time_extend: f64,
    pub auto_correct: f64,
    pub cooldown_reduce: f64,
    pub buff_extend: f64,
    pub debuff_extend: f64,
    pub stat_bonus: f64,
    pub stat_multiplier: f64,
    /// Ids of the rows that contributed; `note_fired` books against these.
    pub active_ids: Vec<EntryId>,
    /// Names of the rows that contributed, for diagnostics and logs.
    pub active_sources: Vec<String>,
}

impl EffectResult {
    /// The no-op result: every column at its identity value.
    pub fn identity() -> Self {
        Self {
            damage_bonus: EffectColumn::DamageBonus.identity(),
            damage_multiplier: EffectColumn::DamageMultiplier.identity(),
            armor_pierce: false,
            life_steal: EffectColumn::LifeSteal.identity(),
            double_cast: EffectColumn::DoubleCast.identity(),
            crit_rate: EffectColumn::CritRate.identity(),
            damage_cut: EffectColumn::DamageCut.identity(),
            evasion: EffectColumn::Evasion.identity(),
            reflect: EffectColumn::Reflect.identity(),
            regen: EffectColumn::Regen.identity(),
            heal_bonus: EffectColumn::HealBonus.identity(),
            heal_multiplier: EffectColumn::HealMultiplier.identity(),
            overheal: false,
            time_extend: EffectColumn::TimeExtend.identity(),
            auto_correct: EffectColumn::AutoCorrect.identity(),
            cooldown_reduce: EffectColumn::CooldownReduce.identity(),
            buff_extend: EffectColumn::BuffExtend.identity(),
            debuff_extend: EffectColumn::DebuffExtend.identity(),
            stat_bonus: EffectColumn::StatBonus.identity(),
            stat_multiplier: EffectColumn::StatMultiplier.identity(),
            active_ids: Vec::new(),
            active_sources: Vec::new(),
        }
    }

    /// Writes one column's folded accumulator into the typed field.
    pub(super) fn set(&mut self, column: EffectColumn, value: f64) {
        match column {
            EffectColumn::DamageBonus => self.damage_bonus = value,
            EffectColumn::DamageMultiplier => self.damage_multiplier = value,
            EffectColumn::ArmorPierce => self.armor_pierce = value != 0.0,
            EffectColumn::LifeSteal => self.life_steal = value,
            EffectColumn::DoubleCast => self.double_cast = value,
            EffectColumn::CritRate => self.crit_rate = value,
            EffectColumn::DamageCut => self.damage_cut = value,
            EffectColumn::Evasion => self.evasion = value,
            EffectColumn::Reflect => self.reflect = value,
            EffectColumn::Regen => self.regen = value,
            EffectColumn::HealBonus => self.heal_bonus = value,
            EffectColumn::HealMultiplier => self.heal_multiplier = value,
            EffectColumn::Overheal => self.overheal = value != 0.0,
            EffectColumn::TimeExtend => self.time_extend = value,
            EffectColumn::AutoCorrect => self.auto_correct = value,
            EffectColumn::CooldownReduce => self.cooldown_reduce = value,
            EffectColumn::BuffExtend => self.buff_extend = value,
            EffectColumn::DebuffExtend => self.debuff_extend = value,
            EffectColumn::StatBonus => self.stat_bonus = value,
            EffectColumn::StatMultiplier => self.stat_multiplier = value,
        }
    }
}

impl Default for EffectResult {
    fn default() -> Self {
        Self::identity()
    }
}
