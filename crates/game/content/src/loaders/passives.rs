//! Passive skill catalog loader.

use std::path::Path;

use game_core::{PassiveSkill, TriggerType};

use crate::loaders::{LoadResult, read_file};

/// Loader for the passive skill catalog from RON files.
///
/// RON format: `Vec<PassiveSkill>`.
pub struct PassiveLoader;

impl PassiveLoader {
    /// Load the passive catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<PassiveSkill>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse a passive catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<PassiveSkill>> {
        let passives: Vec<PassiveSkill> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse passive catalog RON: {}", e))?;

        for passive in &passives {
            if !(0.0..=1.0).contains(&passive.probability) {
                anyhow::bail!(
                    "passive '{}': probability {} is out of range",
                    passive.name,
                    passive.probability
                );
            }
            if passive.trigger == TriggerType::Stack && passive.max_stacks == 0 {
                anyhow::bail!("passive '{}': stack trigger needs max_stacks", passive.name);
            }
        }
        Ok(passives)
    }
}
