//! Broadcast event bus for battle observers.
//!
//! Events are derived by the session from state observation and published
//! best-effort: a battle with no listeners runs exactly like one with many,
//! and a slow listener only loses its own backlog.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Observable moments of a running battle, for UI and logging consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BattleEvent {
    /// The player lost HP.
    PlayerDamaged { amount: i32, hp: i32 },
    /// The player recovered HP (heal modules, regen, life steal).
    PlayerHealed { amount: i32, hp: i32 },
    /// The enemy lost HP.
    EnemyDamaged { amount: i32, hp: i32 },
    /// A player module finished resolving. `hp_delta` is damage dealt or HP
    /// restored depending on the module's target.
    ModuleResolved {
        agent_index: usize,
        module_index: usize,
        hp_delta: i32,
    },
    /// The enemy crossed into its Enhanced phase.
    PhaseShifted,
    /// The enemy started winding up a new action.
    EnemyActionSelected {
        name: String,
        charge_time: f64,
        expected_value: Option<i32>,
    },
    /// The battle is over.
    BattleEnded { is_victory: bool },
}

/// Broadcast channel wrapper shared between the session and its observers.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<BattleEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with the given backlog capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: BattleEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("no subscribers for battle event");
        }
    }

    /// Subscribe to the battle event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.tx.subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
