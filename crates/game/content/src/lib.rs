//! Data-driven master data for the combat core.
//!
//! This crate houses the catalogs a battle draws its definitions from and
//! provides loaders for RON data files:
//! - Agent rosters (cores, stats, equipped modules)
//! - Passive skill definitions
//! - Chain effect definitions
//! - Enemy type bestiaries (level scaling, action patterns)
//!
//! All loaders deserialize straight into `game-core` value objects. Content
//! is read-only input to battles and never appears in battle state; the
//! [`EnemyCatalog`] hands enemy definitions to the engine behind the core's
//! `EnemyOracle` trait.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AgentLoader, ChainLoader, EnemyCatalog, EnemyLoader, PassiveLoader};
