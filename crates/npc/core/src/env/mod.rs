//! Traits describing the host engine collaborators.
//!
//! The controller drives an agent it does not simulate: path finding, ray
//! casts, health bookkeeping, animation, audio and quest progress all live in
//! the host. Each concern is a narrow provider trait so a host can plug in its
//! own engine bindings and tests can plug in recording fakes.
mod feedback;
mod health;
mod navigation;
mod world;

pub use feedback::{AnimationSink, AudioSink, ProgressTracker, SoundCue, VisualEffect};
pub use health::HealthOracle;
pub use navigation::{NavAgent, PathDistance};
pub use world::{ProjectileOracle, SpatialQuery, TargetOracle};
