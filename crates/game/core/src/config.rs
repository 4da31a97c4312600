/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Interval in seconds between battle ticks sent by the driving loop.
    pub tick_interval: f64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum modules equipped on one agent.
    pub const MAX_MODULES: usize = 4;
    /// Maximum agents in the equipped squad.
    pub const MAX_AGENTS: usize = 4;
    /// Maximum rows in one combatant's effect table. Rows past capacity are
    /// dropped rather than erroring.
    pub const MAX_EFFECT_ENTRIES: usize = 64;

    // ===== battle math =====
    /// Voltage at battle start and after reset (percent).
    pub const VOLTAGE_BASE: f64 = 100.0;
    /// Hard ceiling on voltage (percent).
    pub const VOLTAGE_CAP: f64 = 999.9;
    /// Enemy HP ratio at or below which the one-way Enhanced transition fires.
    pub const PHASE_THRESHOLD: f64 = 0.5;
    /// Damage multiplier on a critical hit.
    pub const CRIT_MULTIPLIER: f64 = 2.0;
    /// Ceiling on aggregated damage cut; no buff stack makes a combatant
    /// unkillable.
    pub const DAMAGE_CUT_CAP: f64 = 0.9;
    /// With the overheal flag, HP may exceed max up to this ratio of max.
    pub const OVERHEAL_CAP: f64 = 1.5;

    // ===== player HP basis =====
    /// Flat player HP before core levels are counted.
    pub const PLAYER_HP_BASE: i32 = 500;
    /// Player HP per average core level of the equipped agents.
    pub const PLAYER_HP_PER_LEVEL: i32 = 50;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_INTERVAL: f64 = 0.1;

    pub fn new() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn with_tick_interval(tick_interval: f64) -> Self {
        Self { tick_interval }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
