//! Error types for battle initialization.
//!
//! Only configuration problems surface as errors: a battle that cannot start
//! is reported to the caller, which returns to its previous screen. Tick
//! advancement and slot lookups never fail; out-of-range input there is a
//! no-op so a UI-layer bug cannot abort a battle in progress.

/// Errors that can abort battle initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// The squad is empty, so there is no basis for the player's HP.
    #[error("no agents equipped; cannot derive player hit points")]
    NoAgentsEquipped,

    /// The enemy generator has no enemy type covering the requested level.
    #[error("no enemy type defined for level {level}")]
    LevelOutOfRange { level: u32 },
}
