//! The battle session task.
//!
//! A session is a background task with exclusive ownership of one
//! [`BattleEngine`] and its [`BattleState`]. The UI layer drives it through
//! [`SessionHandle`] with discrete commands (elapsed time, completed typing
//! challenges, snapshot queries) and observes it through the event bus.
//! Nothing else can reach the state, so battle mutation stays single-writer
//! without locks.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use game_core::{
    Agent, BattleEngine, BattleResult, BattleState, ChallengeModifiers, EnemyOracle,
    NextEnemyAction, Phase, TypingOutcome,
};

use crate::error::{Result, RuntimeError};
use crate::events::{BattleEvent, EventBus};

/// Commands accepted by the session task.
pub enum SessionCommand {
    /// Advance the battle clock.
    Tick { delta_seconds: f64 },
    /// Resolve a module after its typing challenge completed. Replies with
    /// the realized HP delta.
    Module {
        agent_index: usize,
        module_index: usize,
        typing: TypingOutcome,
        reply: oneshot::Sender<i32>,
    },
    /// Query a read-only snapshot of the battle.
    Query {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    /// Stop the battle without a result.
    Abandon,
}

/// Read-only view of a running battle for presentation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BattleSnapshot {
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub enemy_name: String,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    pub voltage: f64,
    pub phase: Phase,
    pub elapsed: f64,
    pub next_action: Option<NextEnemyAction>,
    pub modifiers: ChallengeModifiers,
    pub is_over: bool,
}

/// What the session compares against to derive events from a command.
struct Observation {
    player_hp: i32,
    enemy_hp: i32,
    phase: Phase,
    pending_action: Option<String>,
}

impl Observation {
    fn of(state: &BattleState) -> Self {
        Self {
            player_hp: state.player.hp,
            enemy_hp: state.enemy.hp,
            phase: state.enemy.phase,
            pending_action: state.next_action.as_ref().map(|a| a.name.clone()),
        }
    }
}

/// Background task that owns one battle from start to finish.
pub struct BattleSession {
    engine: BattleEngine,
    state: BattleState,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_bus: EventBus,
}

impl BattleSession {
    /// Initializes a battle and spawns its session task.
    ///
    /// Initialization happens synchronously so configuration errors surface
    /// to the caller before any task exists.
    pub fn start(
        seed: u64,
        level: u32,
        agents: &[Agent],
        enemies: &dyn EnemyOracle,
    ) -> Result<SessionHandle> {
        let mut engine = BattleEngine::new(seed);
        let state = engine.initialize_battle(level, agents, enemies)?;
        info!(
            enemy = %state.enemy.name,
            level,
            player_hp = state.player.max_hp,
            "battle session starting"
        );

        let (command_tx, command_rx) = mpsc::channel(64);
        let event_bus = EventBus::new();
        let session = Self {
            engine,
            state,
            command_rx,
            event_bus: event_bus.clone(),
        };
        let task = tokio::spawn(session.run());

        Ok(SessionHandle {
            command_tx,
            event_bus,
            task,
        })
    }

    /// Main session loop. Runs until the battle ends, is abandoned, or every
    /// handle is dropped.
    async fn run(mut self) -> Option<BattleResult> {
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                SessionCommand::Tick { delta_seconds } => self.handle_tick(delta_seconds),
                SessionCommand::Module {
                    agent_index,
                    module_index,
                    typing,
                    reply,
                } => {
                    let delta = self.handle_module(agent_index, module_index, &typing);
                    if reply.send(delta).is_err() {
                        debug!("module reply channel closed (caller dropped)");
                    }
                }
                SessionCommand::Query { reply } => {
                    if reply.send(self.snapshot()).is_err() {
                        debug!("query reply channel closed (caller dropped)");
                    }
                }
                SessionCommand::Abandon => {
                    info!("battle abandoned");
                    return None;
                }
            }

            if let Some(result) = BattleEngine::finish(&self.state) {
                info!(is_victory = result.is_victory, "battle ended");
                self.event_bus.publish(BattleEvent::BattleEnded {
                    is_victory: result.is_victory,
                });
                return Some(result);
            }
        }
        None
    }

    fn handle_tick(&mut self, delta_seconds: f64) {
        let before = Observation::of(&self.state);
        self.engine.update_effects(&mut self.state, delta_seconds);
        self.publish_changes(&before);
    }

    fn handle_module(&mut self, agent_index: usize, module_index: usize, typing: &TypingOutcome) -> i32 {
        let before = Observation::of(&self.state);
        let delta = self
            .engine
            .apply_module_effect(&mut self.state, agent_index, module_index, typing);
        debug!(agent_index, module_index, delta, "module resolved");
        self.event_bus.publish(BattleEvent::ModuleResolved {
            agent_index,
            module_index,
            hp_delta: delta,
        });
        self.publish_changes(&before);
        delta
    }

    fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            player_hp: self.state.player.hp,
            player_max_hp: self.state.player.max_hp,
            enemy_name: self.state.enemy.name.clone(),
            enemy_hp: self.state.enemy.hp,
            enemy_max_hp: self.state.enemy.max_hp,
            voltage: self.state.enemy.voltage,
            phase: self.state.enemy.phase,
            elapsed: self.state.elapsed,
            next_action: self.state.next_action.clone(),
            modifiers: self.engine.challenge_modifiers(&self.state),
            is_over: self.state.is_over(),
        }
    }

    /// Publishes events for every difference between an observation and the
    /// current state.
    fn publish_changes(&self, before: &Observation) {
        let state = &self.state;
        if state.player.hp < before.player_hp {
            self.event_bus.publish(BattleEvent::PlayerDamaged {
                amount: before.player_hp - state.player.hp,
                hp: state.player.hp,
            });
        } else if state.player.hp > before.player_hp {
            self.event_bus.publish(BattleEvent::PlayerHealed {
                amount: state.player.hp - before.player_hp,
                hp: state.player.hp,
            });
        }
        if state.enemy.hp < before.enemy_hp {
            self.event_bus.publish(BattleEvent::EnemyDamaged {
                amount: before.enemy_hp - state.enemy.hp,
                hp: state.enemy.hp,
            });
        }
        if before.phase == Phase::Normal && state.enemy.phase == Phase::Enhanced {
            self.event_bus.publish(BattleEvent::PhaseShifted);
        }
        let pending = state.next_action.as_ref().map(|a| a.name.clone());
        if pending != before.pending_action
            && let Some(action) = &state.next_action
        {
            self.event_bus.publish(BattleEvent::EnemyActionSelected {
                name: action.name.clone(),
                charge_time: action.charge_time,
                expected_value: action.expected_value,
            });
        }
    }
}

/// The UI layer's grip on a running session.
#[derive(Debug)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    event_bus: EventBus,
    task: JoinHandle<Option<BattleResult>>,
}

impl SessionHandle {
    /// Advances the battle clock.
    pub async fn tick(&self, delta_seconds: f64) -> Result<()> {
        self.command_tx
            .send(SessionCommand::Tick { delta_seconds })
            .await
            .map_err(|_| RuntimeError::SessionClosed)
    }

    /// Resolves a module after its typing challenge. Returns the realized
    /// HP delta.
    pub async fn use_module(
        &self,
        agent_index: usize,
        module_index: usize,
        typing: TypingOutcome,
    ) -> Result<i32> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Module {
                agent_index,
                module_index,
                typing,
                reply,
            })
            .await
            .map_err(|_| RuntimeError::SessionClosed)?;
        rx.await.map_err(|_| RuntimeError::SessionClosed)
    }

    /// Queries a read-only snapshot of the battle.
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Query { reply })
            .await
            .map_err(|_| RuntimeError::SessionClosed)?;
        rx.await.map_err(|_| RuntimeError::SessionClosed)
    }

    /// Stops the battle without a result.
    pub async fn abandon(&self) -> Result<()> {
        self.command_tx
            .send(SessionCommand::Abandon)
            .await
            .map_err(|_| RuntimeError::SessionClosed)
    }

    /// Subscribes to the battle event stream.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<BattleEvent> {
        self.event_bus.subscribe()
    }

    /// Waits for the session to finish. `None` means the battle was
    /// abandoned or every command source went away before it ended.
    pub async fn outcome(self) -> Result<Option<BattleResult>> {
        self.task.await.map_err(|_| RuntimeError::SessionClosed)
    }
}
