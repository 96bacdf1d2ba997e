//! Layered finite-state machine for real-time agents.
//!
//! This library provides a small, deterministic state machine with two layers:
//! a **global** state that runs every tick regardless of what the agent is
//! doing, and a **current** state that is swapped by transitions.
//!
//! - **Capability-based states**: [`State`] hooks (`enter`, `execute`, `exit`,
//!   `on_message`) all default to no-ops
//! - **Paired transitions**: `exit` on the outgoing state always runs before
//!   `enter` on the incoming one, and never interleaves with `execute`
//! - **Layered messages**: the global state sees every message first
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`State`]: Core trait for all states, generic over a context type `C`
//! - [`Transitions`]: Context capability that hands pending transitions to the machine
//! - [`StateMachine`]: Owns the global and current states and routes hooks to them

pub mod machine;
pub mod state;

// Re-export core types for ergonomic API
pub use machine::StateMachine;
pub use state::{State, Transitions};
