//! Traits describing read-only master data.
//!
//! The battle core never loads content itself. Collaborating crates supply
//! enemy definitions behind the [`EnemyOracle`] trait so the engine stays
//! decoupled from file formats and catalogs.
mod rng;

pub use rng::{BattleRng, mix_seed};

use crate::battle::EnemyType;

/// Read-only access to enemy master data.
///
/// Implementations own the loaded enemy types. Selection is driven by an
/// externally supplied roll so the implementation itself stays free of
/// randomness and the engine keeps full control of determinism.
pub trait EnemyOracle {
    /// Inclusive level range covered by this catalog.
    fn level_range(&self) -> (u32, u32);

    /// Picks an enemy type for the given level.
    ///
    /// `roll` disambiguates between multiple candidates at the same level;
    /// implementations must map any roll value onto a valid candidate.
    /// Returns `None` when no enemy type covers the level.
    fn enemy_for_level(&self, level: u32, roll: u32) -> Option<&EnemyType>;
}
