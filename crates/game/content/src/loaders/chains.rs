//! Chain effect catalog loader.
//!
//! Chain effects are the pool secondary effects are drawn from when a module
//! instance is acquired. The draw itself happens in the equipment layer;
//! this loader only supplies the definitions.

use std::path::Path;

use game_core::ChainEffect;

use crate::loaders::{LoadResult, read_file};

/// Loader for the chain effect catalog from RON files.
///
/// RON format: `Vec<ChainEffect>`.
pub struct ChainLoader;

impl ChainLoader {
    /// Load the chain catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ChainEffect>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a chain catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ChainEffect>> {
        let chains: Vec<ChainEffect> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse chain catalog RON: {}", e))?;

        for chain in &chains {
            if !(0.0..=1.0).contains(&chain.template.probability) {
                anyhow::bail!(
                    "chain '{}': probability {} is out of range",
                    chain.template.name,
                    chain.template.probability
                );
            }
        }
        Ok(chains)
    }
}
