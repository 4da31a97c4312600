//! Agent roster loader.
//!
//! Loads the playable squad members with their stats, optional core passive
//! and equipped modules.

use std::path::Path;

use game_core::Agent;

use crate::loaders::{LoadResult, read_file};

/// Loader for the agent roster from RON files.
///
/// RON format: `Vec<Agent>`.
pub struct AgentLoader;

impl AgentLoader {
    /// Load the agent roster from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Agent>> {
        Self::parse(&read_file(path)?)
    }

    /// Parse an agent roster from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<Agent>> {
        let agents: Vec<Agent> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse agent roster RON: {}", e))?;

        for agent in &agents {
            if agent.modules.is_empty() {
                anyhow::bail!("agent '{}' has no modules equipped", agent.name);
            }
            if let Some(passive) = &agent.passive
                && !(0.0..=1.0).contains(&passive.probability)
            {
                anyhow::bail!(
                    "agent '{}': passive '{}' probability {} is out of range",
                    agent.name,
                    passive.name,
                    passive.probability
                );
            }
        }
        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ModuleCategory, ModuleTarget, StatKind, TriggerType};
    use std::io::Write;

    const ROSTER: &str = r#"
[
    (
        id: 1,
        name: "vanguard",
        core_level: 3,
        stats: (str: 10, con: 8, dex: 7, int: 5, wil: 6, ego: 4),
        passive: Some((
            id: 10,
            name: "combat protocol",
            trigger: permanent,
            values: [(DamageMultiplier, 1.1)],
        )),
        modules: [
            (
                id: 100,
                name: "pulse blade",
                category: Attack,
                target: enemy,
                hp_formula: (stat: Str, coefficient: 10.0),
                cooldown: 5.0,
            ),
            (
                id: 101,
                name: "patch kit",
                category: Heal,
                target: player,
                hp_formula: (stat: Con, coefficient: 8.0, base: 20.0),
                cooldown: 9.0,
            ),
        ],
    ),
]
"#;

    #[test]
    fn parses_a_full_roster() {
        let agents = AgentLoader::parse(ROSTER).unwrap();
        assert_eq!(agents.len(), 1);

        let agent = &agents[0];
        assert_eq!(agent.name, "vanguard");
        assert_eq!(agent.core_level, 3);
        assert_eq!(agent.stats.get(StatKind::Str), 10);

        let passive = agent.passive.as_ref().unwrap();
        assert_eq!(passive.trigger, TriggerType::Permanent);
        assert_eq!(passive.probability, 1.0);

        assert_eq!(agent.modules.len(), 2);
        assert_eq!(agent.modules[0].category, ModuleCategory::Attack);
        assert_eq!(agent.modules[0].target, ModuleTarget::Enemy);
        assert_eq!(agent.modules[1].hp_formula.base, 20.0);
        assert!(agent.modules[1].chain.is_none());
    }

    #[test]
    fn rejects_malformed_ron_with_context() {
        let err = AgentLoader::parse("[(id: 1,]").unwrap_err();
        assert!(err.to_string().contains("agent roster"));
    }

    #[test]
    fn rejects_agents_without_modules() {
        let bare = r#"
[
    (
        id: 1,
        name: "empty",
        core_level: 1,
        stats: (str: 1, con: 1, dex: 1, int: 1, wil: 1, ego: 1),
        modules: [],
    ),
]
"#;
        let err = AgentLoader::parse(bare).unwrap_err();
        assert!(err.to_string().contains("no modules"));
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();
        let agents = AgentLoader::load(file.path()).unwrap();
        assert_eq!(agents.len(), 1);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = AgentLoader::load(Path::new("/nonexistent/roster.ron")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/roster.ron"));
    }
}
