//! Effect table rows and the reusable effect payload template.

use super::column::EffectColumn;
use super::condition::Condition;

/// Identifier of a row within one [`super::EffectTable`].
///
/// Ids are table-scoped and assigned on insertion; they are never reused
/// within a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryId(pub u32);

/// Where an effect row came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceKind {
    /// Core-granted passive skill, present for the whole battle.
    Passive,
    /// Chain effect attached to a module instance.
    Chain,
    /// Positive temporary effect.
    Buff,
    /// Negative temporary effect.
    Debuff,
}

/// One row of the effect table.
///
/// Rows are owned by exactly one table, created when a passive, buff, debuff
/// or chain effect is granted, counted down every tick, and purged when their
/// duration runs out. Permanent rows (`duration == None`) are never removed
/// by time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectEntry {
    /// Table-assigned id, valid after insertion.
    pub id: EntryId,
    pub source: SourceKind,
    /// Id of the granting definition (passive id, chain id, action id).
    pub source_id: u32,
    pub name: String,
    /// Enablement predicate; `None` means always enabled.
    pub condition: Option<Condition>,
    /// Remaining seconds; `None` means permanent.
    pub duration: Option<f64>,
    /// Numeric contributions per column.
    pub values: Vec<(EffectColumn, f64)>,
    /// Or-column flags set by this row.
    pub flags: Vec<EffectColumn>,
    /// Independent trigger chance per evaluation. 1.0 = always.
    pub probability: f64,
    /// Row is removed after contributing once.
    pub one_shot: bool,
    /// Set by the evaluator when a one-shot row has contributed.
    pub triggered: bool,
    /// Stack ceiling; 0 disables stacking.
    pub max_stacks: u32,
    /// Value added per stack beyond the first.
    pub stack_increment: f64,
    /// Current stack count, at least 1.
    pub stacks: u32,
    /// Remaining activations for reactive sources; `None` = unlimited.
    pub uses_left: Option<u32>,
}

impl EffectEntry {
    pub fn new(source: SourceKind, source_id: u32, name: impl Into<String>) -> Self {
        Self {
            id: EntryId::default(),
            source,
            source_id,
            name: name.into(),
            condition: None,
            duration: None,
            values: Vec::new(),
            flags: Vec::new(),
            probability: 1.0,
            one_shot: false,
            triggered: false,
            max_stacks: 0,
            stack_increment: 0.0,
            stacks: 1,
            uses_left: None,
        }
    }

    /// Set the enablement condition (builder pattern).
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set a timed duration in seconds (builder pattern).
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Add a numeric contribution (builder pattern).
    pub fn with_value(mut self, column: EffectColumn, value: f64) -> Self {
        self.values.push((column, value));
        self
    }

    /// Set an Or-column flag (builder pattern).
    pub fn with_flag(mut self, column: EffectColumn) -> Self {
        self.flags.push(column);
        self
    }

    /// Set the independent trigger probability (builder pattern).
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Enable stack scaling (builder pattern).
    pub fn with_stacking(mut self, max_stacks: u32, stack_increment: f64) -> Self {
        self.max_stacks = max_stacks;
        self.stack_increment = stack_increment;
        self
    }

    /// Limit the number of activations (builder pattern). 0 = unlimited.
    pub fn with_uses(mut self, uses_per_battle: u32) -> Self {
        self.uses_left = (uses_per_battle > 0).then_some(uses_per_battle);
        self
    }

    /// Mark the row as removed after its first contribution (builder pattern).
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    /// Numeric contribution for a column, scaled by the current stack count.
    ///
    /// Returns `None` when the row does not touch the column.
    pub fn value_for(&self, column: EffectColumn) -> Option<f64> {
        let (_, base) = self.values.iter().find(|(c, _)| *c == column)?;
        if self.max_stacks == 0 {
            return Some(*base);
        }
        let stacks = self.stacks.clamp(1, self.max_stacks);
        Some(base + self.stack_increment * f64::from(stacks - 1))
    }

    /// Whether this row sets the given Or-column flag.
    pub fn flag_for(&self, column: EffectColumn) -> bool {
        self.flags.contains(&column)
    }

    /// Adds one stack, clamped to the ceiling. No-op on non-stacking rows.
    pub fn add_stack(&mut self) {
        if self.max_stacks > 0 {
            self.stacks = (self.stacks + 1).min(self.max_stacks);
        }
    }

    /// Whether this row has any activations left.
    pub fn has_uses(&self) -> bool {
        self.uses_left.is_none_or(|uses| uses > 0)
    }
}

/// A reusable effect payload: the shared shape of chain effects, enemy
/// self-buffs and enemy debuffs.
///
/// Templates live in master data; granting one stamps out an [`EffectEntry`]
/// for the receiving table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub name: String,
    pub values: Vec<(EffectColumn, f64)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: Vec<EffectColumn>,
    /// Seconds the granted row lasts; `None` = for the rest of the battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<f64>,
    /// Chance the grant happens at all, rolled once at grant time.
    #[cfg_attr(feature = "serde", serde(default = "default_probability"))]
    pub probability: f64,
}

fn default_probability() -> f64 {
    1.0
}

impl EffectTemplate {
    /// Stamps out a table row from this template.
    pub fn to_entry(&self, source: SourceKind, source_id: u32) -> EffectEntry {
        EffectEntry {
            id: EntryId::default(),
            source,
            source_id,
            name: self.name.clone(),
            condition: None,
            duration: self.duration,
            values: self.values.clone(),
            flags: self.flags.clone(),
            probability: 1.0,
            one_shot: false,
            triggered: false,
            max_stacks: 0,
            stack_increment: 0.0,
            stacks: 1,
            uses_left: None,
        }
    }
}
