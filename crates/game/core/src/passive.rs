//! Core-granted passive skills.
//!
//! Passive skills are master-data value objects, immutable once loaded. Each
//! equipped agent's passive compiles into one [`EffectEntry`] row at battle
//! start via [`PassiveSkill::to_entry`]; all activation logic then lives in
//! the effect table, which is the single evaluation path for the whole core.

use crate::effect::{Condition, EffectColumn, EffectEntry, SourceKind, TriggerEvent};

/// Governs when a passive's effect row is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TriggerType {
    /// Always active.
    Permanent,
    /// Active while the trigger condition holds.
    Conditional,
    /// Condition-gated and rolled independently per evaluation.
    Probability,
    /// Condition-gated with stack scaling; stacks are granted by the engine.
    Stack,
    /// Condition-gated with a per-battle use budget, decremented by the
    /// engine when the effect fires.
    Reactive,
}

/// The data-driven condition vocabulary for passive skills.
///
/// Serialized as a snake_case string. Unknown kinds (content newer than this
/// binary) deserialize to [`Unknown`] and compile to a never-firing
/// condition: malformed content must not crash an in-progress battle.
///
/// [`Unknown`]: TriggerConditionKind::Unknown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerConditionKind {
    /// Typing accuracy is exactly 100%.
    PerfectAccuracy,
    /// WPM at or above `value`.
    WpmAtLeast,
    /// Combo at or above `value`.
    ComboAtLeast,
    /// Player HP ratio at or below `value` (0..=1).
    PlayerHpAtMost,
    /// Enemy HP ratio at or below `value` (0..=1).
    EnemyHpAtMost,
    /// The enemy carries a debuff.
    EnemyHasDebuff,
    /// Resolving a player module.
    OnModuleUse,
    /// Resolving an enemy attack.
    OnEnemyAttack,
    Unknown,
}

#[cfg(feature = "serde")]
impl serde::Serialize for TriggerConditionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TriggerConditionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct KindVisitor;

        impl serde::de::Visitor<'_> for KindVisitor {
            type Value = TriggerConditionKind;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a trigger condition kind string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value.parse().unwrap_or(TriggerConditionKind::Unknown))
            }
        }

        deserializer.deserialize_str(KindVisitor)
    }
}

/// A condition reference in master data: a kind plus its numeric threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerCondition {
    pub kind: TriggerConditionKind,
    /// Threshold for the kinds that take one; ignored otherwise.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: f64,
}

impl TriggerCondition {
    /// Compiles the data-driven condition into an evaluable [`Condition`].
    fn compile(&self) -> Condition {
        match self.kind {
            TriggerConditionKind::PerfectAccuracy => Condition::PerfectAccuracy,
            TriggerConditionKind::WpmAtLeast => Condition::WpmAtLeast(self.value),
            TriggerConditionKind::ComboAtLeast => Condition::ComboAtLeast(self.value as u32),
            TriggerConditionKind::PlayerHpAtMost => Condition::PlayerHpAtMost(self.value),
            TriggerConditionKind::EnemyHpAtMost => Condition::EnemyHpAtMost(self.value),
            TriggerConditionKind::EnemyHasDebuff => Condition::EnemyHasDebuff,
            TriggerConditionKind::OnModuleUse => Condition::EventIs(TriggerEvent::ModuleUse),
            TriggerConditionKind::OnEnemyAttack => Condition::EventIs(TriggerEvent::EnemyAttack),
            TriggerConditionKind::Unknown => Condition::Never,
        }
    }
}

/// A passive skill definition from master data.
///
/// One definition may produce many [`EffectEntry`] rows: one per equipped
/// agent carrying the core that grants it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveSkill {
    pub id: u32,
    pub name: String,
    pub trigger: TriggerType,
    /// Required for every trigger type except `Permanent`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<TriggerCondition>,
    /// Numeric contributions per column.
    pub values: Vec<(EffectColumn, f64)>,
    /// Or-column flags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: Vec<EffectColumn>,
    /// Trigger chance for `Probability` passives. Defaults to 1.0.
    #[cfg_attr(feature = "serde", serde(default = "default_probability"))]
    pub probability: f64,
    /// Stack ceiling for `Stack` passives.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: u32,
    /// Value gained per stack beyond the first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stack_increment: f64,
    /// Use budget for `Reactive` passives. 0 = unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub uses_per_battle: u32,
}

fn default_probability() -> f64 {
    1.0
}

impl PassiveSkill {
    /// Compiles this definition into an effect table row.
    ///
    /// Pure and deterministic: any randomness lives in the table's
    /// evaluation, never in the conversion. The mapping is exhaustive over
    /// [`TriggerType`].
    pub fn to_entry(&self) -> EffectEntry {
        let mut entry = EffectEntry::new(SourceKind::Passive, self.id, self.name.clone());
        entry.values = self.values.clone();
        entry.flags = self.flags.clone();

        // A conditional trigger without a condition in the data is a content
        // bug; degrade to never-fires rather than always-fires.
        let compiled = self.condition.as_ref().map(TriggerCondition::compile);
        let gated = || Some(compiled.clone().unwrap_or(Condition::Never));

        match self.trigger {
            TriggerType::Permanent => {
                entry.condition = None;
            }
            TriggerType::Conditional => {
                entry.condition = gated();
            }
            TriggerType::Probability => {
                entry.condition = compiled.clone();
                entry.probability = self.probability;
            }
            TriggerType::Stack => {
                entry.condition = compiled.clone();
                entry.max_stacks = self.max_stacks.max(1);
                entry.stack_increment = self.stack_increment;
            }
            TriggerType::Reactive => {
                entry.condition = gated();
                entry = entry.with_uses(self.uses_per_battle);
            }
        }
        entry
    }
}
