//! Content loaders for reading master data from files.
//!
//! All catalogs are RON. Each loader offers `parse` for in-memory strings
//! and `load` for paths, and validates what the core cannot check at battle
//! time. Malformed content is caught here, at load time, with contextual
//! errors; the core only ever sees well-formed definitions.

pub mod agents;
pub mod chains;
pub mod enemies;
pub mod passives;

pub use agents::AgentLoader;
pub use chains::ChainLoader;
pub use enemies::{EnemyCatalog, EnemyLoader};
pub use passives::PassiveLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read file {}: {}", path.display(), e))
}
