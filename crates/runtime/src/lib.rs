//! Frame-driven orc controller built on the layered state machine.
//!
//! The crate wires the engine-agnostic pieces from `npc-core` into a running
//! NPC: an [`OrcController`] owns a [`StateMachine`](state_machine::StateMachine)
//! of [`OrcState`]s plus the always-on [`OrcGlobalState`], and the [`Orc`]
//! blackboard those states read and write. Hosts drive it with two clocks:
//! [`OrcController::update`] once per rendered frame and
//! [`OrcController::fixed_update`] on the physics step.
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the controller, its blackboard and lifecycle events
//! - [`states`] holds the concrete behavior states and the global state
//! - [`messaging`] provides the category-addressed telegram bus
//! - [`env`] bundles the host providers a controller talks to
pub mod controller;
pub mod env;
pub mod error;
pub mod messaging;
pub mod states;

pub use controller::{AttackKind, Orc, OrcController};
pub use env::OrcEnv;
pub use error::{Result, RuntimeError};
pub use messaging::{HandlerRef, MessageDispatcher, MessageHandler};
pub use states::{OrcGlobalState, OrcState, StateKind};
