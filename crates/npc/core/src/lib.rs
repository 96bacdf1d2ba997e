//! Engine-agnostic building blocks for real-time NPC controllers.
//!
//! `npc-core` defines the data types and pure algorithms an NPC controller is
//! made of: field-of-view perception, stuck detection for patrol movement,
//! keyed delayed actions, owned-object tracking and the message records sent
//! between entity categories. Everything the controller needs from the host
//! engine (navigation, ray casts, health, animation, audio) is expressed as a
//! provider trait in [`env`], so the logic here never touches engine types.
pub mod config;
pub mod env;
pub mod error;
pub mod ids;
pub mod ownership;
pub mod perception;
pub mod scheduler;
pub mod stuck;
pub mod telegram;

pub use config::{AttackConfig, ConfigError, OrcConfig};
pub use env::{
    AnimationSink, AudioSink, HealthOracle, NavAgent, PathDistance, ProgressTracker,
    ProjectileOracle, SoundCue, SpatialQuery, TargetOracle, VisualEffect,
};
pub use error::{ErrorSeverity, NpcError};
pub use ids::{EntityCategory, EntityId};
pub use ownership::OwnedObjects;
pub use perception::FieldOfView;
pub use scheduler::{DelayScheduler, TimerHandle};
pub use stuck::{StuckConfig, StuckMonitor, StuckVerdict};
pub use telegram::{MessageType, Payload, Telegram};

pub use glam::{Quat, Vec3};
