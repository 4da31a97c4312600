//! Enemy master data and action selection.

use crate::battle::state::DefenseKind;
use crate::effect::EffectTemplate;
use crate::env::BattleRng;
use crate::passive::PassiveSkill;

/// What an enemy action does when its charge elapses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyActionKind {
    /// Damage the player for `attack × power`.
    Attack { power: f64 },
    /// Grant the enemy a buff row.
    Buff { effect: EffectTemplate },
    /// Inflict a debuff row on the player.
    Debuff { effect: EffectTemplate },
    /// Hold a defensive stance for `duration` seconds.
    Defend {
        defense: DefenseKind,
        duration: f64,
        value: f64,
    },
}

/// One weighted row of an enemy's action pattern.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyActionSpec {
    pub name: String,
    pub kind: EnemyActionKind,
    /// Selection weight; zero-weight rows never fire.
    pub weight: u32,
    /// Seconds of wind-up before the action executes.
    pub charge_time: f64,
}

/// An enemy type definition from master data.
///
/// HP and attack scale linearly with the requested battle level inside the
/// type's supported range.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyType {
    pub id: u32,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    pub hp_base: i32,
    pub hp_per_level: i32,
    pub attack_base: i32,
    pub attack_per_level: i32,
    /// Voltage gained per ten seconds of battle time.
    pub voltage_rise_per_10s: f64,
    /// Passive skills active for the whole battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<PassiveSkill>,
    pub actions: Vec<EnemyActionSpec>,
    /// Pattern after the Enhanced transition; empty falls back to `actions`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enhanced_actions: Vec<EnemyActionSpec>,
}

impl EnemyType {
    /// Whether this type covers the given battle level.
    pub fn covers_level(&self, level: u32) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    pub fn hp_at_level(&self, level: u32) -> i32 {
        self.hp_base + self.hp_per_level * level as i32
    }

    pub fn attack_at_level(&self, level: u32) -> i32 {
        self.attack_base + self.attack_per_level * level as i32
    }
}

/// Weighted pick from an action pattern.
///
/// Returns `None` for an empty pattern or all-zero weights, in which case
/// the enemy simply idles until the next selection attempt.
pub(crate) fn select_action<'a>(
    pattern: &'a [EnemyActionSpec],
    rng: &mut BattleRng,
) -> Option<&'a EnemyActionSpec> {
    let index = rng.pick_weighted(pattern.iter().map(|spec| spec.weight))?;
    pattern.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, weight: u32) -> EnemyActionSpec {
        EnemyActionSpec {
            name: name.into(),
            kind: EnemyActionKind::Attack { power: 1.0 },
            weight,
            charge_time: 2.0,
        }
    }

    #[test]
    fn level_scaling_is_linear() {
        let ty = EnemyType {
            id: 1,
            name: "drone".into(),
            min_level: 1,
            max_level: 10,
            hp_base: 100,
            hp_per_level: 50,
            attack_base: 10,
            attack_per_level: 2,
            voltage_rise_per_10s: 20.0,
            passives: vec![],
            actions: vec![spec("jab", 1)],
            enhanced_actions: vec![],
        };
        assert_eq!(ty.hp_at_level(4), 300);
        assert_eq!(ty.attack_at_level(4), 18);
        assert!(ty.covers_level(1));
        assert!(ty.covers_level(10));
        assert!(!ty.covers_level(11));
    }

    #[test]
    fn selection_respects_weights() {
        let pattern = vec![spec("never", 0), spec("always", 3)];
        let mut rng = BattleRng::new(11);
        for _ in 0..64 {
            let picked = select_action(&pattern, &mut rng).unwrap();
            assert_eq!(picked.name, "always");
        }
    }

    #[test]
    fn selection_is_deterministic_per_seed() {
        let pattern = vec![spec("a", 1), spec("b", 1), spec("c", 1)];
        let picks = |seed: u64| -> Vec<String> {
            let mut rng = BattleRng::new(seed);
            (0..16)
                .map(|_| select_action(&pattern, &mut rng).unwrap().name.clone())
                .collect()
        };
        assert_eq!(picks(99), picks(99));
    }

    #[test]
    fn empty_or_zero_weight_patterns_select_nothing() {
        let mut rng = BattleRng::new(1);
        assert!(select_action(&[], &mut rng).is_none());
        let zeros = vec![spec("a", 0)];
        assert!(select_action(&zeros, &mut rng).is_none());
    }
}
