//! Spatial queries and externally owned entities.

use glam::Vec3;

use crate::ids::EntityId;

/// Physics-side ray casting.
pub trait SpatialQuery {
    /// Casts a single ray from `origin` along `direction` and returns the
    /// first entity hit within `max_distance`, or `None` when nothing was hit.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<EntityId>;
}

/// Resolves target ids to world positions.
///
/// Targets are owned by the host; a destroyed target simply stops resolving.
pub trait TargetOracle {
    fn position(&self, target: EntityId) -> Option<Vec3>;
}

/// Spawns and destroys projectiles thrown by the NPC.
pub trait ProjectileOracle {
    /// Spawns a stone at `origin` aimed at `target_point` and returns its id.
    fn spawn_stone(&mut self, origin: Vec3, target_point: Vec3) -> EntityId;

    /// Returns true if `projectile` has not been destroyed yet.
    fn is_alive(&self, projectile: EntityId) -> bool;

    fn destroy(&mut self, projectile: EntityId);
}
