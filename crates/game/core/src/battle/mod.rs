//! The battle state machine: state aggregates, the engine that mutates
//! them, voltage, enemy master data and running statistics.
mod enemy;
mod engine;
mod state;
mod stats;
mod voltage;

pub use enemy::{EnemyActionKind, EnemyActionSpec, EnemyType};
pub use engine::{BattleEngine, ChallengeModifiers};
pub use state::{
    BattleState, DefenseKind, EnemyModel, NextEnemyAction, Phase, PlayerModel, TypingOutcome,
    WaitMode,
};
pub use stats::{BattleResult, BattleStats};
pub use voltage::VoltageManager;
