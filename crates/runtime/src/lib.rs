//! Async orchestration for the combat core.
//!
//! This crate wires a battle into an application: each battle runs as a
//! session task with exclusive ownership of its engine and state, driven by
//! discrete commands from the UI layer and observed through a broadcast
//! event bus.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session task and its handle
//! - [`events`] provides the broadcast event bus for observers
//! - [`telemetry`] installs the tracing subscriber
pub mod error;
pub mod events;
pub mod session;
pub mod telemetry;

pub use error::{Result, RuntimeError};
pub use events::{BattleEvent, EventBus};
pub use session::{BattleSession, BattleSnapshot, SessionCommand, SessionHandle};
pub use telemetry::init_tracing;
