//! Runtime errors.

use game_core::BattleError;

/// Errors surfaced by the battle session layer.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Battle initialization failed.
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// The session task has stopped (battle finished, abandoned or crashed)
    /// and can no longer accept commands.
    #[error("battle session is no longer running")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
