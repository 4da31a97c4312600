//! Enemy bestiary loader and the catalog backing the core's oracle.

use std::path::Path;

use game_core::{EnemyOracle, EnemyType};

use crate::loaders::{LoadResult, read_file};

/// Loader for the enemy bestiary from RON files.
///
/// RON format: `Vec<EnemyType>`.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load the bestiary from a RON file.
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a bestiary from RON text.
    pub fn parse(content: &str) -> LoadResult<EnemyCatalog> {
        let types: Vec<EnemyType> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse enemy bestiary RON: {}", e))?;
        EnemyCatalog::new(types)
    }
}

/// Owns the loaded enemy types and serves them to the engine.
///
/// Selection is fully determined by the level and the roll the engine
/// supplies; the catalog itself holds no randomness.
#[derive(Debug)]
pub struct EnemyCatalog {
    types: Vec<EnemyType>,
}

impl EnemyCatalog {
    /// Validates and wraps a set of enemy types.
    pub fn new(types: Vec<EnemyType>) -> LoadResult<Self> {
        if types.is_empty() {
            anyhow::bail!("enemy bestiary is empty");
        }
        for ty in &types {
            if ty.min_level > ty.max_level {
                anyhow::bail!(
                    "enemy '{}': level range {}..={} is inverted",
                    ty.name,
                    ty.min_level,
                    ty.max_level
                );
            }
            if ty.actions.is_empty() {
                anyhow::bail!("enemy '{}' has no actions", ty.name);
            }
            if ty.actions.iter().all(|a| a.weight == 0) {
                anyhow::bail!("enemy '{}': every action has zero weight", ty.name);
            }
        }
        Ok(Self { types })
    }

    pub fn types(&self) -> &[EnemyType] {
        &self.types
    }
}

impl EnemyOracle for EnemyCatalog {
    fn level_range(&self) -> (u32, u32) {
        let min = self.types.iter().map(|t| t.min_level).min().unwrap_or(0);
        let max = self.types.iter().map(|t| t.max_level).max().unwrap_or(0);
        (min, max)
    }

    fn enemy_for_level(&self, level: u32, roll: u32) -> Option<&EnemyType> {
        let candidates: Vec<&EnemyType> = self
            .types
            .iter()
            .filter(|t| t.covers_level(level))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[roll as usize % candidates.len()])
    }
}
