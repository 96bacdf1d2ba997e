//! Host providers bundled per controller.
//!
//! Every collaborator the controller needs from the engine is a boxed trait
//! object, so one controller can run against engine bindings, a sandbox world
//! or recording test doubles without being generic over eight parameters.
use npc_core::{
    AnimationSink, AudioSink, HealthOracle, NavAgent, ProgressTracker, ProjectileOracle,
    SpatialQuery, TargetOracle,
};

/// Providers owned by one [`OrcController`](crate::OrcController).
pub struct OrcEnv {
    pub nav: Box<dyn NavAgent>,
    pub spatial: Box<dyn SpatialQuery>,
    pub targets: Box<dyn TargetOracle>,
    pub health: Box<dyn HealthOracle>,
    pub animation: Box<dyn AnimationSink>,
    pub audio: Box<dyn AudioSink>,
    pub progress: Box<dyn ProgressTracker>,
    pub projectiles: Box<dyn ProjectileOracle>,
}

impl OrcEnv {
    /// Builds a bundle from a single value implementing every provider trait.
    ///
    /// Sandbox worlds and test doubles usually share one handle across all
    /// concerns; this clones it into each slot.
    pub fn from_shared<W>(world: &W) -> Self
    where
        W: NavAgent
            + SpatialQuery
            + TargetOracle
            + HealthOracle
            + AnimationSink
            + AudioSink
            + ProgressTracker
            + ProjectileOracle
            + Clone
            + 'static,
    {
        Self {
            nav: Box::new(world.clone()),
            spatial: Box::new(world.clone()),
            targets: Box::new(world.clone()),
            health: Box::new(world.clone()),
            animation: Box::new(world.clone()),
            audio: Box::new(world.clone()),
            progress: Box::new(world.clone()),
            projectiles: Box::new(world.clone()),
        }
    }
}

impl std::fmt::Debug for OrcEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrcEnv")
            .field("position", &self.nav.position())
            .field("health", &self.health.current())
            .finish_non_exhaustive()
    }
}
