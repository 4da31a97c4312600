//! Deterministic combat simulation core for the typing-battle RPG.
//!
//! `game-core` defines the canonical battle rules (effect aggregation,
//! passive skills, voltage, the battle state machine) and exposes pure APIs
//! reused by the runtime and offline tools. All battle mutation flows through
//! [`battle::BattleEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod agent;
pub mod battle;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod passive;

pub use agent::{
    Agent, AgentStats, ChainEffect, ChainTarget, HpFormula, Module, ModuleCategory, ModuleTarget,
    StatKind,
};
pub use battle::{
    BattleEngine, BattleResult, BattleState, BattleStats, ChallengeModifiers, DefenseKind,
    EnemyActionKind, EnemyActionSpec, EnemyModel, EnemyType, NextEnemyAction, Phase, PlayerModel,
    TypingOutcome, VoltageManager, WaitMode,
};
pub use config::BattleConfig;
pub use effect::{
    Aggregation, Condition, EffectColumn, EffectContext, EffectEntry, EffectResult, EffectTable,
    EffectTemplate, EntryId, ModuleCategories, SourceKind, TriggerEvent,
};
pub use env::{BattleRng, EnemyOracle, mix_seed};
pub use error::BattleError;
pub use passive::{PassiveSkill, TriggerCondition, TriggerConditionKind, TriggerType};
