//! The battle engine: every battle mutation flows through here.
//!
//! The engine owns the battle's random stream and applies the combat rules
//! to a [`BattleState`] it hands out at initialization. It has no clock and
//! no I/O; the driving loop feeds it elapsed time and completed typing
//! challenges, and reads the state back for presentation.
//!
//! Initialization is the only fallible operation. Everything that runs per
//! frame (ticks, module resolution) degrades to a no-op on bad input so a
//! UI-layer bug cannot abort a battle in progress.

use crate::agent::{Agent, AgentStats, ChainTarget, Module, ModuleTarget};
use crate::battle::enemy::{EnemyActionKind, select_action};
use crate::battle::state::{
    BattleState, DefenseKind, EnemyModel, NextEnemyAction, Phase, PlayerModel, TypingOutcome,
    WaitMode,
};
use crate::battle::stats::{BattleResult, BattleStats};
use crate::battle::voltage::VoltageManager;
use crate::config::BattleConfig;
use crate::effect::{EffectContext, EffectResult, EffectTable, SourceKind, TriggerEvent};
use crate::env::{BattleRng, EnemyOracle};
use crate::error::BattleError;
use crate::passive::TriggerType;

/// Aggregated modifiers the typing UI applies to the next challenge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeModifiers {
    /// Extra seconds on the challenge timer.
    pub time_extend: f64,
    /// Typo forgiveness budget.
    pub auto_correct: f64,
    /// Fraction shaved off module cooldowns.
    pub cooldown_reduce: f64,
}

/// Drives one battle from initialization to its result.
pub struct BattleEngine {
    rng: BattleRng,
}

impl BattleEngine {
    /// Creates an engine with a seeded random stream. Same seed plus the
    /// same command sequence replays the same battle.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: BattleRng::new(seed),
        }
    }

    /// Sets up a fresh battle at the requested level.
    ///
    /// Picks an enemy type from the oracle, scales its stats to the level,
    /// compiles every equipped passive into its side's effect table and
    /// selects the enemy's opening action. Player HP derives from the
    /// squad's average core level.
    pub fn initialize_battle(
        &mut self,
        level: u32,
        agents: &[Agent],
        enemies: &dyn EnemyOracle,
    ) -> Result<BattleState, BattleError> {
        if agents.is_empty() {
            return Err(BattleError::NoAgentsEquipped);
        }
        let roll = self.rng.next_u32();
        let ty = enemies
            .enemy_for_level(level, roll)
            .ok_or(BattleError::LevelOutOfRange { level })?
            .clone();

        // Each table gets its own stream so probability rolls inside one
        // table never perturb the other side or engine-level selection.
        let mut player_table = EffectTable::new(self.rng.derive_seed(1));
        for agent in agents {
            if let Some(passive) = &agent.passive {
                player_table.add_row(passive.to_entry());
            }
        }
        let mut enemy_table = EffectTable::new(self.rng.derive_seed(2));
        for passive in &ty.passives {
            enemy_table.add_row(passive.to_entry());
        }

        let total_levels: u32 = agents.iter().map(|agent| agent.core_level).sum();
        let average_level = (f64::from(total_levels) / agents.len() as f64).round() as i32;
        let max_hp = BattleConfig::PLAYER_HP_BASE + BattleConfig::PLAYER_HP_PER_LEVEL * average_level;

        let enemy_hp = ty.hp_at_level(level);
        let mut enemy = EnemyModel {
            type_id: ty.id,
            name: ty.name.clone(),
            level,
            hp: enemy_hp,
            max_hp: enemy_hp,
            attack: ty.attack_at_level(level),
            voltage: BattleConfig::VOLTAGE_BASE,
            voltage_rise_per_10s: ty.voltage_rise_per_10s,
            phase: Phase::Normal,
            wait: WaitMode::None,
            effects: enemy_table,
            actions: ty.actions,
            enhanced_actions: ty.enhanced_actions,
        };
        VoltageManager::reset(&mut enemy);

        let mut state = BattleState {
            player: PlayerModel::new(max_hp, player_table),
            enemy,
            agents: agents.to_vec(),
            stats: BattleStats::new(),
            next_action: None,
            elapsed: 0.0,
        };
        self.select_next_action(&mut state);
        Ok(state)
    }

    /// Advances the battle clock by `delta_seconds`.
    ///
    /// Counts down effect durations, raises voltage, applies regen, moves
    /// the enemy wait cycle forward and checks the phase transition.
    /// Non-positive deltas and finished battles are no-ops.
    pub fn update_effects(&mut self, state: &mut BattleState, delta_seconds: f64) {
        if delta_seconds <= 0.0 || state.is_over() {
            return;
        }
        state.elapsed += delta_seconds;
        state.player.effects.update_durations(delta_seconds);
        state.enemy.effects.update_durations(delta_seconds);
        VoltageManager::update(&mut state.enemy, delta_seconds);

        self.apply_regen(state, delta_seconds);
        self.advance_wait(state, delta_seconds);
        Self::check_and_transition_phase(state);
    }

    /// Resolves one player module after its typing challenge completed.
    ///
    /// Returns the realized HP delta: damage dealt for enemy-targeting
    /// modules, HP restored for player-targeting ones. Finished battles and
    /// out-of-range slot indices resolve to zero.
    pub fn apply_module_effect(
        &mut self,
        state: &mut BattleState,
        agent_index: usize,
        module_index: usize,
        typing: &TypingOutcome,
    ) -> i32 {
        if state.is_over() {
            return 0;
        }
        let Some(agent) = state.agents.get(agent_index) else {
            return 0;
        };
        let Some(module) = agent.modules.get(module_index).cloned() else {
            return 0;
        };
        let stats = agent.stats;
        let stacking_passive = agent
            .passive
            .as_ref()
            .filter(|passive| passive.trigger == TriggerType::Stack)
            .map(|passive| passive.id);

        state.stats.modules_used += 1;
        state
            .stats
            .record_typing(typing.wpm, typing.accuracy, typing.combo);

        let ctx = Self::module_context(state, &module, typing);
        let delta = match module.target {
            ModuleTarget::Enemy => {
                let offense = state.player.effects.calculate(&ctx);
                let defense = state.enemy.effects.calculate(&ctx);
                let mut total = self.resolve_player_hit(state, &module, stats, &offense, &defense);
                if offense.double_cast > 0.0 && self.rng.roll(offense.double_cast) {
                    total += self.resolve_player_hit(state, &module, stats, &offense, &defense);
                }
                self.apply_chain(state, &module, &offense);
                state.player.effects.note_fired(&offense);
                state.enemy.effects.note_fired(&defense);
                Self::check_and_transition_phase(state);
                total
            }
            ModuleTarget::Player => {
                let result = state.player.effects.calculate(&ctx);
                let stat_value = f64::from(stats.get(module.hp_formula.stat))
                    * result.stat_multiplier
                    + result.stat_bonus;
                let base = module.hp_formula.evaluate_with_stat(stat_value);
                // Healing is never voltage-scaled.
                let amount = (base * result.heal_multiplier + result.heal_bonus)
                    .round()
                    .max(0.0) as i32;
                let healed = state.player.apply_heal(amount, result.overheal);
                state.stats.healing_done += i64::from(healed);
                self.apply_chain(state, &module, &result);
                state.player.effects.note_fired(&result);
                healed
            }
        };

        if let Some(passive_id) = stacking_passive {
            state
                .player
                .effects
                .add_stack(SourceKind::Passive, passive_id);
        }
        delta
    }

    /// Fires the one-way Normal → Enhanced transition when the enemy drops
    /// to half HP. Returns whether the transition fired on this call.
    pub fn check_and_transition_phase(state: &mut BattleState) -> bool {
        if state.enemy.phase == Phase::Normal
            && !state.enemy.is_defeated()
            && state.enemy.hp_ratio() <= BattleConfig::PHASE_THRESHOLD
        {
            state.enemy.phase = Phase::Enhanced;
            return true;
        }
        false
    }

    /// Evaluates the typing-challenge modifiers currently granted by the
    /// player's effect table.
    ///
    /// A pure read: no random stream advances, so snapshot queries can call
    /// this freely without perturbing a replay.
    pub fn challenge_modifiers(&self, state: &BattleState) -> ChallengeModifiers {
        let ctx = Self::ambient_context(state, TriggerEvent::Tick);
        let result = state.player.effects.preview(&ctx);
        ChallengeModifiers {
            time_extend: result.time_extend,
            auto_correct: result.auto_correct,
            cooldown_reduce: result.cooldown_reduce,
        }
    }

    /// The battle's result, or `None` while it is still running.
    pub fn finish(state: &BattleState) -> Option<BattleResult> {
        if !state.is_over() {
            return None;
        }
        Some(BattleResult {
            is_victory: state.enemy.is_defeated() && !state.player.is_defeated(),
            stats: state.stats.clone(),
        })
    }

    fn apply_regen(&mut self, state: &mut BattleState, delta_seconds: f64) {
        let ctx = Self::ambient_context(state, TriggerEvent::Tick);
        let result = state.player.effects.calculate(&ctx);
        if result.regen <= 0.0 {
            state.player.regen_carry = 0.0;
            return;
        }
        state.player.regen_carry += result.regen * delta_seconds;
        let whole = state.player.regen_carry.floor();
        if whole >= 1.0 {
            state.player.regen_carry -= whole;
            let healed = state.player.apply_heal(whole as i32, result.overheal);
            state.stats.healing_done += i64::from(healed);
        }
    }

    fn advance_wait(&mut self, state: &mut BattleState, delta_seconds: f64) {
        match state.enemy.wait {
            WaitMode::None => self.select_next_action(state),
            WaitMode::Charging { remaining } => {
                let remaining = remaining - delta_seconds;
                if remaining <= 0.0 {
                    self.execute_pending_action(state);
                    if !state.is_over() && state.enemy.wait == WaitMode::None {
                        self.select_next_action(state);
                    }
                } else {
                    state.enemy.wait = WaitMode::Charging { remaining };
                }
            }
            WaitMode::Defending {
                remaining,
                defense,
                value,
            } => {
                let remaining = remaining - delta_seconds;
                if remaining <= 0.0 {
                    state.enemy.wait = WaitMode::None;
                    self.select_next_action(state);
                } else {
                    state.enemy.wait = WaitMode::Defending {
                        remaining,
                        defense,
                        value,
                    };
                }
            }
        }
    }

    /// One damage application from a player module, crit and evasion rolls
    /// included. Called once normally, twice on a double cast.
    fn resolve_player_hit(
        &mut self,
        state: &mut BattleState,
        module: &Module,
        stats: AgentStats,
        offense: &EffectResult,
        defense: &EffectResult,
    ) -> i32 {
        let stat_value = f64::from(stats.get(module.hp_formula.stat)) * offense.stat_multiplier
            + offense.stat_bonus;
        let base = module.hp_formula.evaluate_with_stat(stat_value);
        let mut damage = base * offense.damage_multiplier + offense.damage_bonus;

        if self.rng.roll(offense.crit_rate) {
            damage *= BattleConfig::CRIT_MULTIPLIER;
            state.stats.crits += 1;
        }

        let stance = state.enemy.wait;
        if !offense.armor_pierce {
            damage *= 1.0 - defense.damage_cut.min(BattleConfig::DAMAGE_CUT_CAP);
            if let WaitMode::Defending {
                defense: DefenseKind::Shield,
                value,
                ..
            } = stance
            {
                damage *= 1.0 - value;
            }
        }

        if self.rng.roll(defense.evasion) {
            return 0;
        }

        // Voltage scales exactly this path: player-dealt damage and nothing
        // else. Healing and enemy attacks stay untouched.
        damage *= state.enemy.voltage / 100.0;

        let dealt = state.enemy.apply_damage(damage.round().max(0.0) as i32);
        state.stats.damage_dealt += i64::from(dealt);

        let mut return_fraction = defense.reflect;
        if let WaitMode::Defending {
            defense: DefenseKind::Counter,
            value,
            ..
        } = stance
        {
            return_fraction += value;
        }
        if return_fraction > 0.0 && dealt > 0 {
            let returned = state
                .player
                .apply_damage((f64::from(dealt) * return_fraction).round() as i32);
            state.stats.damage_taken += i64::from(returned);
        }

        if offense.life_steal > 0.0 && dealt > 0 {
            let healed = state
                .player
                .apply_heal((f64::from(dealt) * offense.life_steal).round() as i32, false);
            state.stats.healing_done += i64::from(healed);
        }

        dealt
    }

    /// Executes the action whose charge just elapsed.
    fn execute_pending_action(&mut self, state: &mut BattleState) {
        state.enemy.wait = WaitMode::None;
        let Some(action) = state.next_action.take() else {
            return;
        };
        match action.kind {
            EnemyActionKind::Attack { power } => {
                let ctx = Self::ambient_context(state, TriggerEvent::EnemyAttack);
                let offense = state.enemy.effects.calculate(&ctx);
                let defense = state.player.effects.calculate(&ctx);

                let base = f64::from(state.enemy.attack) * power;
                let mut damage = base * offense.damage_multiplier + offense.damage_bonus;
                if self.rng.roll(offense.crit_rate) {
                    damage *= BattleConfig::CRIT_MULTIPLIER;
                }
                if !offense.armor_pierce {
                    damage *= 1.0 - defense.damage_cut.min(BattleConfig::DAMAGE_CUT_CAP);
                }
                if self.rng.roll(defense.evasion) {
                    damage = 0.0;
                }
                let taken = state.player.apply_damage(damage.round().max(0.0) as i32);
                state.stats.damage_taken += i64::from(taken);

                if defense.reflect > 0.0 && taken > 0 {
                    let returned = state
                        .enemy
                        .apply_damage((f64::from(taken) * defense.reflect).round() as i32);
                    state.stats.damage_dealt += i64::from(returned);
                }
                if offense.life_steal > 0.0 && taken > 0 {
                    state
                        .enemy
                        .apply_heal((f64::from(taken) * offense.life_steal).round() as i32);
                }

                state.enemy.effects.note_fired(&offense);
                state.player.effects.note_fired(&defense);
                Self::check_and_transition_phase(state);
            }
            EnemyActionKind::Buff { effect } => {
                if self.rng.roll(effect.probability) {
                    state
                        .enemy
                        .effects
                        .add_row(effect.to_entry(SourceKind::Buff, 0));
                }
            }
            EnemyActionKind::Debuff { effect } => {
                if self.rng.roll(effect.probability) {
                    state
                        .player
                        .effects
                        .add_row(effect.to_entry(SourceKind::Debuff, 0));
                }
            }
            EnemyActionKind::Defend {
                defense,
                duration,
                value,
            } => {
                state.enemy.wait = WaitMode::Defending {
                    remaining: duration,
                    defense,
                    value,
                };
            }
        }
    }

    /// Picks the enemy's next action from the current phase's pattern and
    /// starts its charge. An unpickable pattern leaves the enemy idle.
    fn select_next_action(&mut self, state: &mut BattleState) {
        if state.is_over() {
            return;
        }
        let Some(spec) = select_action(state.enemy.current_pattern(), &mut self.rng).cloned()
        else {
            state.next_action = None;
            state.enemy.wait = WaitMode::None;
            return;
        };
        // Prediction display only; execution recomputes from live stats.
        let expected_value = match &spec.kind {
            EnemyActionKind::Attack { power } => {
                Some((f64::from(state.enemy.attack) * power).round() as i32)
            }
            _ => None,
        };
        state.enemy.wait = WaitMode::Charging {
            remaining: spec.charge_time,
        };
        state.next_action = Some(NextEnemyAction {
            name: spec.name,
            kind: spec.kind,
            charge_time: spec.charge_time,
            expected_value,
        });
    }

    /// Grants a module's chain effect, if any, rolling its grant chance
    /// once. Buff/debuff extension from the attacker's table lengthens the
    /// granted row's duration.
    fn apply_chain(&mut self, state: &mut BattleState, module: &Module, offense: &EffectResult) {
        let Some(chain) = &module.chain else {
            return;
        };
        if !self.rng.roll(chain.template.probability) {
            return;
        }
        let mut entry = chain.template.to_entry(SourceKind::Chain, chain.id);
        match chain.target {
            ChainTarget::Player => {
                if let Some(duration) = &mut entry.duration {
                    *duration += offense.buff_extend;
                }
                state.player.effects.add_row(entry);
            }
            ChainTarget::Enemy => {
                if let Some(duration) = &mut entry.duration {
                    *duration += offense.debuff_extend;
                }
                state.enemy.effects.add_row(entry);
            }
        }
    }

    fn ambient_context(state: &BattleState, event: TriggerEvent) -> EffectContext {
        EffectContext::ambient(
            state.player.hp_ratio(),
            state.enemy.hp_ratio(),
            event,
            state.enemy.effects.has_debuff(),
        )
    }

    fn module_context(state: &BattleState, module: &Module, typing: &TypingOutcome) -> EffectContext {
        EffectContext {
            player_hp_ratio: state.player.hp_ratio(),
            enemy_hp_ratio: state.enemy.hp_ratio(),
            accuracy: typing.accuracy,
            wpm: typing.wpm,
            combo: typing.combo,
            event: TriggerEvent::ModuleUse,
            categories: module.category.flags(),
            enemy_has_debuff: state.enemy.effects.has_debuff(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ChainEffect, HpFormula, ModuleCategory, StatKind};
    use crate::battle::enemy::{EnemyActionSpec, EnemyType};
    use crate::effect::{EffectColumn, EffectTemplate};
    use crate::passive::PassiveSkill;

    struct Bestiary {
        types: Vec<EnemyType>,
    }

    impl EnemyOracle for Bestiary {
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

    fn attack_spec(name: &str, charge_time: f64) -> EnemyActionSpec {
        EnemyActionSpec {
            name: name.into(),
            kind: EnemyActionKind::Attack { power: 1.0 },
            weight: 1,
            charge_time,
        }
    }

    fn bestiary(charge_time: f64) -> Bestiary {
        Bestiary {
            types: vec![EnemyType {
                id: 1,
                name: "drone".into(),
                min_level: 1,
                max_level: 10,
                hp_base: 1000,
                hp_per_level: 0,
                attack_base: 30,
                attack_per_level: 0,
                voltage_rise_per_10s: 20.0,
                passives: vec![],
                actions: vec![attack_spec("jab", charge_time)],
                enhanced_actions: vec![attack_spec("rampage", charge_time)],
            }],
        }
    }

    fn bestiary_with(actions: Vec<EnemyActionSpec>) -> Bestiary {
        Bestiary {
            types: vec![EnemyType {
                id: 1,
                name: "drone".into(),
                min_level: 1,
                max_level: 10,
                hp_base: 1000,
                hp_per_level: 0,
                attack_base: 30,
                attack_per_level: 0,
                voltage_rise_per_10s: 20.0,
                passives: vec![],
                actions,
                enhanced_actions: vec![],
            }],
        }
    }

    fn strike() -> Module {
        Module {
            id: 1,
            name: "strike".into(),
            category: ModuleCategory::Attack,
            target: ModuleTarget::Enemy,
            hp_formula: HpFormula {
                stat: StatKind::Str,
                coefficient: 10.0,
                base: 0.0,
            },
            cooldown: 5.0,
            chain: None,
        }
    }

    fn mend() -> Module {
        Module {
            id: 2,
            name: "mend".into(),
            category: ModuleCategory::Heal,
            target: ModuleTarget::Player,
            hp_formula: HpFormula {
                stat: StatKind::Con,
                coefficient: 8.0,
                base: 0.0,
            },
            cooldown: 8.0,
            chain: None,
        }
    }

    fn agent() -> Agent {
        Agent {
            id: 1,
            name: "vanguard".into(),
            core_level: 3,
            stats: AgentStats {
                str: 10,
                con: 10,
                dex: 10,
                int: 10,
                wil: 10,
                ego: 10,
            },
            passive: None,
            modules: [strike(), mend()].into_iter().collect(),
        }
    }

    fn perfect_typing() -> TypingOutcome {
        TypingOutcome {
            accuracy: 100.0,
            wpm: 60.0,
            combo: 5,
        }
    }

    fn start(charge_time: f64) -> (BattleEngine, BattleState) {
        let mut engine = BattleEngine::new(7);
        let state = engine
            .initialize_battle(3, &[agent()], &bestiary(charge_time))
            .unwrap();
        (engine, state)
    }

    #[test]
    fn empty_squad_cannot_start() {
        let mut engine = BattleEngine::new(1);
        let err = engine.initialize_battle(3, &[], &bestiary(60.0));
        assert_eq!(err.unwrap_err(), BattleError::NoAgentsEquipped);
    }

    #[test]
    fn uncovered_level_cannot_start() {
        let mut engine = BattleEngine::new(1);
        let err = engine.initialize_battle(99, &[agent()], &bestiary(60.0));
        assert_eq!(err.unwrap_err(), BattleError::LevelOutOfRange { level: 99 });
    }

    #[test]
    fn initialization_sets_baselines() {
        let (_, state) = start(60.0);
        assert_eq!(state.player.max_hp, 650);
        assert_eq!(state.player.hp, 650);
        assert_eq!(state.enemy.voltage, 100.0);
        assert_eq!(state.enemy.phase, Phase::Normal);
        assert!(matches!(state.enemy.wait, WaitMode::Charging { .. }));
        let action = state.next_action.as_ref().unwrap();
        assert_eq!(action.expected_value, Some(30));
    }

    #[test]
    fn module_damage_scales_with_voltage() {
        let (mut engine, mut state) = start(60.0);
        // STR 10 × coefficient 10 at base voltage.
        let first = engine.apply_module_effect(&mut state, 0, 0, &perfect_typing());
        assert_eq!(first, 100);

        // Five seconds at 20 per ten seconds raises voltage to 110%.
        engine.update_effects(&mut state, 5.0);
        assert_eq!(state.enemy.voltage, 110.0);
        let second = engine.apply_module_effect(&mut state, 0, 0, &perfect_typing());
        assert_eq!(second, 110);
        assert_eq!(state.stats.damage_dealt, 210);
    }

    #[test]
    fn healing_ignores_voltage() {
        let (mut engine, mut state) = start(60.0);
        engine.update_effects(&mut state, 20.0);
        assert!(state.enemy.voltage > 100.0);

        state.player.apply_damage(200);
        let healed = engine.apply_module_effect(&mut state, 0, 1, &perfect_typing());
        assert_eq!(healed, 80);
        assert_eq!(state.stats.healing_done, 80);
    }

    #[test]
    fn phase_transition_fires_once_at_half_hp() {
        let (_, mut state) = start(60.0);
        state.enemy.apply_damage(499);
        assert!(!BattleEngine::check_and_transition_phase(&mut state));

        state.enemy.apply_damage(1);
        assert!(BattleEngine::check_and_transition_phase(&mut state));
        assert_eq!(state.enemy.phase, Phase::Enhanced);
        assert_eq!(state.enemy.current_pattern()[0].name, "rampage");

        // Irreversible even if HP recovers past the threshold.
        state.enemy.hp = state.enemy.max_hp;
        assert!(!BattleEngine::check_and_transition_phase(&mut state));
        assert_eq!(state.enemy.phase, Phase::Enhanced);
    }

    #[test]
    fn enemy_attack_resolves_after_charge() {
        let (mut engine, mut state) = start(2.0);
        engine.update_effects(&mut state, 2.5);
        assert_eq!(state.player.hp, 650 - 30);
        assert_eq!(state.stats.damage_taken, 30);
        // The next action is already winding up.
        assert!(matches!(state.enemy.wait, WaitMode::Charging { .. }));
        assert!(state.next_action.is_some());
    }

    #[test]
    fn non_positive_delta_is_ignored() {
        let (mut engine, mut state) = start(60.0);
        engine.update_effects(&mut state, 0.0);
        engine.update_effects(&mut state, -1.0);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.enemy.voltage, 100.0);
    }

    #[test]
    fn out_of_range_slots_resolve_to_zero() {
        let (mut engine, mut state) = start(60.0);
        assert_eq!(engine.apply_module_effect(&mut state, 9, 0, &perfect_typing()), 0);
        assert_eq!(engine.apply_module_effect(&mut state, 0, 9, &perfect_typing()), 0);
        assert_eq!(state.stats.modules_used, 0);
    }

    #[test]
    fn finished_battles_reject_modules() {
        let (mut engine, mut state) = start(60.0);
        state.enemy.apply_damage(1000);
        assert_eq!(engine.apply_module_effect(&mut state, 0, 0, &perfect_typing()), 0);
        assert_eq!(state.stats.modules_used, 0);
    }

    #[test]
    fn finish_reports_victory_and_defeat() {
        let (_, mut state) = start(60.0);
        assert_eq!(BattleEngine::finish(&state), None);

        state.enemy.apply_damage(1000);
        let result = BattleEngine::finish(&state).unwrap();
        assert!(result.is_victory);

        let (_, mut state) = start(60.0);
        state.player.apply_damage(650);
        let result = BattleEngine::finish(&state).unwrap();
        assert!(!result.is_victory);
    }

    #[test]
    fn shield_stance_reduces_module_damage() {
        let (mut engine, mut state) = start(60.0);
        state.enemy.wait = WaitMode::Defending {
            remaining: 5.0,
            defense: DefenseKind::Shield,
            value: 0.5,
        };
        let dealt = engine.apply_module_effect(&mut state, 0, 0, &perfect_typing());
        assert_eq!(dealt, 50);
    }

    #[test]
    fn counter_stance_returns_damage() {
        let (mut engine, mut state) = start(60.0);
        state.enemy.wait = WaitMode::Defending {
            remaining: 5.0,
            defense: DefenseKind::Counter,
            value: 0.3,
        };
        let dealt = engine.apply_module_effect(&mut state, 0, 0, &perfect_typing());
        assert_eq!(dealt, 100);
        assert_eq!(state.player.hp, 650 - 30);
        assert_eq!(state.stats.damage_taken, 30);
    }

    #[test]
    fn enemy_buff_action_lands_in_its_own_table() {
        let actions = vec![EnemyActionSpec {
            name: "frenzy".into(),
            kind: EnemyActionKind::Buff {
                effect: EffectTemplate {
                    name: "frenzy".into(),
                    values: vec![(EffectColumn::DamageMultiplier, 1.5)],
                    flags: vec![],
                    duration: Some(10.0),
                    probability: 1.0,
                },
            },
            weight: 1,
            charge_time: 2.0,
        }];
        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[agent()], &bestiary_with(actions))
            .unwrap();

        engine.update_effects(&mut state, 2.5);
        assert_eq!(state.enemy.effects.len(), 1);
        assert!(
            state
                .enemy
                .effects
                .iter()
                .any(|e| e.source == SourceKind::Buff)
        );
        // The next action is already winding up again.
        assert!(matches!(state.enemy.wait, WaitMode::Charging { .. }));
    }

    #[test]
    fn enemy_debuff_action_weakens_player_healing() {
        let actions = vec![EnemyActionSpec {
            name: "entropy field".into(),
            kind: EnemyActionKind::Debuff {
                effect: EffectTemplate {
                    name: "entropy".into(),
                    values: vec![(EffectColumn::HealMultiplier, 0.5)],
                    flags: vec![],
                    duration: Some(30.0),
                    probability: 1.0,
                },
            },
            weight: 1,
            charge_time: 2.0,
        }];
        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[agent()], &bestiary_with(actions))
            .unwrap();

        engine.update_effects(&mut state, 2.5);
        assert!(state.player.effects.has_debuff());

        // CON 10 × coefficient 8 would restore 80; entropy halves it.
        state.player.apply_damage(200);
        let healed = engine.apply_module_effect(&mut state, 0, 1, &perfect_typing());
        assert_eq!(healed, 40);
    }

    #[test]
    fn defending_stance_expires_and_reselects() {
        let actions = vec![EnemyActionSpec {
            name: "harden".into(),
            kind: EnemyActionKind::Defend {
                defense: DefenseKind::Shield,
                duration: 3.0,
                value: 0.5,
            },
            weight: 1,
            charge_time: 1.0,
        }];
        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[agent()], &bestiary_with(actions))
            .unwrap();

        engine.update_effects(&mut state, 1.5);
        assert!(matches!(state.enemy.wait, WaitMode::Defending { .. }));
        assert!(state.next_action.is_none());

        // The stance holds while its timer runs.
        engine.update_effects(&mut state, 2.0);
        assert!(matches!(state.enemy.wait, WaitMode::Defending { .. }));

        // Expiry returns the enemy to selection.
        engine.update_effects(&mut state, 1.5);
        assert!(matches!(state.enemy.wait, WaitMode::Charging { .. }));
        assert!(state.next_action.is_some());
    }

    #[test]
    fn chain_durations_extend_with_the_matching_column() {
        let mut squad_member = agent();
        squad_member.passive = Some(PassiveSkill {
            id: 8,
            name: "lingering touch".into(),
            trigger: TriggerType::Permanent,
            condition: None,
            values: vec![
                (EffectColumn::DebuffExtend, 4.0),
                (EffectColumn::BuffExtend, 2.0),
            ],
            flags: vec![],
            probability: 1.0,
            max_stacks: 0,
            stack_increment: 0.0,
            uses_per_battle: 0,
        });
        squad_member.modules[0].chain = Some(ChainEffect {
            id: 11,
            target: ChainTarget::Enemy,
            template: EffectTemplate {
                name: "corrode".into(),
                values: vec![(EffectColumn::DamageCut, -0.2)],
                flags: vec![],
                duration: Some(6.0),
                probability: 1.0,
            },
        });
        squad_member.modules[1].chain = Some(ChainEffect {
            id: 12,
            target: ChainTarget::Player,
            template: EffectTemplate {
                name: "surge".into(),
                values: vec![(EffectColumn::DamageMultiplier, 1.2)],
                flags: vec![],
                duration: Some(4.0),
                probability: 1.0,
            },
        });

        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[squad_member], &bestiary(60.0))
            .unwrap();

        engine.apply_module_effect(&mut state, 0, 0, &perfect_typing());
        let corrode = state
            .enemy
            .effects
            .iter()
            .find(|e| e.name == "corrode")
            .unwrap();
        assert_eq!(corrode.duration, Some(10.0));

        engine.apply_module_effect(&mut state, 0, 1, &perfect_typing());
        let surge = state
            .player
            .effects
            .iter()
            .find(|e| e.name == "surge")
            .unwrap();
        assert_eq!(surge.duration, Some(6.0));
    }

    #[test]
    fn chain_effect_lands_in_enemy_table() {
        let mut module = strike();
        module.chain = Some(ChainEffect {
            id: 11,
            target: ChainTarget::Enemy,
            template: EffectTemplate {
                name: "corrode".into(),
                values: vec![(EffectColumn::DamageCut, -0.2)],
                flags: vec![],
                duration: Some(6.0),
                probability: 1.0,
            },
        });
        let mut squad_member = agent();
        squad_member.modules[0] = module;

        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[squad_member], &bestiary(60.0))
            .unwrap();
        engine.apply_module_effect(&mut state, 0, 0, &perfect_typing());
        assert!(state.enemy.effects.has_debuff());
        assert_eq!(state.enemy.effects.len(), 1);
    }

    #[test]
    fn regen_heals_whole_points_over_ticks() {
        let mut squad_member = agent();
        squad_member.passive = Some(PassiveSkill {
            id: 5,
            name: "recovery field".into(),
            trigger: TriggerType::Permanent,
            condition: None,
            values: vec![(EffectColumn::Regen, 10.0)],
            flags: vec![],
            probability: 1.0,
            max_stacks: 0,
            stack_increment: 0.0,
            uses_per_battle: 0,
        });
        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[squad_member], &bestiary(60.0))
            .unwrap();
        state.player.apply_damage(100);

        engine.update_effects(&mut state, 1.0);
        assert_eq!(state.player.hp, 650 - 100 + 10);
        assert_eq!(state.stats.healing_done, 10);
    }

    #[test]
    fn challenge_modifiers_come_from_the_player_table() {
        let mut squad_member = agent();
        squad_member.passive = Some(PassiveSkill {
            id: 6,
            name: "focus lattice".into(),
            trigger: TriggerType::Permanent,
            condition: None,
            values: vec![
                (EffectColumn::TimeExtend, 3.0),
                (EffectColumn::AutoCorrect, 1.0),
                (EffectColumn::CooldownReduce, 0.2),
            ],
            flags: vec![],
            probability: 1.0,
            max_stacks: 0,
            stack_increment: 0.0,
            uses_per_battle: 0,
        });
        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[squad_member], &bestiary(60.0))
            .unwrap();
        let modifiers = engine.challenge_modifiers(&state);
        assert_eq!(
            modifiers,
            ChallengeModifiers {
                time_extend: 3.0,
                auto_correct: 1.0,
                cooldown_reduce: 0.2,
            }
        );
    }

    #[test]
    fn stack_passive_grows_with_module_use() {
        let mut squad_member = agent();
        squad_member.passive = Some(PassiveSkill {
            id: 7,
            name: "momentum".into(),
            trigger: TriggerType::Stack,
            condition: None,
            values: vec![(EffectColumn::DamageBonus, 10.0)],
            flags: vec![],
            probability: 1.0,
            max_stacks: 3,
            stack_increment: 5.0,
            uses_per_battle: 0,
        });
        let mut engine = BattleEngine::new(7);
        let mut state = engine
            .initialize_battle(3, &[squad_member], &bestiary(60.0))
            .unwrap();

        assert_eq!(engine.apply_module_effect(&mut state, 0, 0, &perfect_typing()), 110);
        assert_eq!(engine.apply_module_effect(&mut state, 0, 0, &perfect_typing()), 115);
        assert_eq!(engine.apply_module_effect(&mut state, 0, 0, &perfect_typing()), 120);
        // Clamped at the stack ceiling.
        assert_eq!(engine.apply_module_effect(&mut state, 0, 0, &perfect_typing()), 120);
    }
}
