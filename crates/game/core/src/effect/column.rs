//! The fixed vocabulary of effect dimensions.
//!
//! Every combat effect contributes values to one or more columns. A column's
//! aggregation rule is part of its definition and never changes at runtime:
//! adding a new effect kind means adding a column here, never touching the
//! evaluation loop.

/// How simultaneous contributions to one column combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregation {
    /// Contributions are summed.
    Add,
    /// Contributions are multiplied. Identity contributions are skipped to
    /// avoid accumulating floating-point noise.
    Multiply,
    /// The largest contribution wins ("best defensive buff wins").
    Max,
    /// Boolean: true if any enabled source sets the flag.
    Or,
}

/// One named dimension of combat effect.
///
/// Closed enumeration: the aggregation engine folds every column on every
/// evaluation, so the set must be known at compile time.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectColumn {
    // ========================================================================
    // Offense
    // ========================================================================
    /// Flat damage added after the multiplier.
    DamageBonus,
    /// Multiplier on outgoing damage.
    DamageMultiplier,
    /// Outgoing damage ignores the target's damage cut and defense stance.
    ArmorPierce,
    /// Fraction of dealt damage returned as healing to the dealer.
    LifeSteal,
    /// Chance for a module to resolve twice.
    DoubleCast,
    /// Chance for a critical hit.
    CritRate,

    // ========================================================================
    // Defense
    // ========================================================================
    /// Fraction of incoming damage removed. Best buff wins.
    DamageCut,
    /// Chance to fully avoid incoming damage. Best buff wins.
    Evasion,
    /// Fraction of received damage returned to the attacker. Best buff wins.
    Reflect,

    // ========================================================================
    // Recovery
    // ========================================================================
    /// HP restored per second.
    Regen,
    /// Flat healing added after the multiplier.
    HealBonus,
    /// Multiplier on outgoing healing.
    HealMultiplier,
    /// Healing may push HP past the maximum.
    Overheal,

    // ========================================================================
    // Typing challenge
    // ========================================================================
    /// Extra seconds on the challenge timer.
    TimeExtend,
    /// Mistyped characters forgiven per challenge.
    AutoCorrect,
    /// Fraction shaved off module cooldowns. Best buff wins.
    CooldownReduce,

    // ========================================================================
    // Meta
    // ========================================================================
    /// Seconds added to the duration of buffs the owner grants.
    BuffExtend,
    /// Seconds added to the duration of debuffs the owner inflicts.
    DebuffExtend,
    /// Flat bonus to the stat referenced by a module's formula.
    StatBonus,
    /// Multiplier on the stat referenced by a module's formula.
    StatMultiplier,
}

impl EffectColumn {
    /// The aggregation rule for this column. Fixed for the column's lifetime.
    pub const fn aggregation(self) -> Aggregation {
        match self {
            Self::DamageBonus
            | Self::LifeSteal
            | Self::CritRate
            | Self::Regen
            | Self::HealBonus
            | Self::TimeExtend
            | Self::AutoCorrect
            | Self::BuffExtend
            | Self::DebuffExtend
            | Self::StatBonus => Aggregation::Add,

            Self::DamageMultiplier | Self::HealMultiplier | Self::StatMultiplier => {
                Aggregation::Multiply
            }

            Self::DamageCut
            | Self::Evasion
            | Self::Reflect
            | Self::DoubleCast
            | Self::CooldownReduce => Aggregation::Max,

            Self::ArmorPierce | Self::Overheal => Aggregation::Or,
        }
    }

    /// The identity value of this column's accumulator: 1 for multiplicative
    /// columns, 0 for everything else (Or columns treat 0 as `false`).
    pub const fn identity(self) -> f64 {
        match self.aggregation() {
            Aggregation::Multiply => 1.0,
            Aggregation::Add | Aggregation::Max | Aggregation::Or => 0.0,
        }
    }

    /// Whether this column carries a boolean flag rather than a number.
    pub const fn is_flag(self) -> bool {
        matches!(self.aggregation(), Aggregation::Or)
    }
}
