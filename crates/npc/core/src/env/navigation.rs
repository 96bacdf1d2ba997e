//! Navigation agent interface.

use glam::{Quat, Vec3};

/// Remaining distance along the agent's current path.
///
/// Path computation is asynchronous in most engines; `Pending` means the
/// value is not known yet and must not be acted on as a real distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathDistance {
    Pending,
    Remaining(f32),
}

impl PathDistance {
    /// Returns the remaining distance, or `None` while the path is pending.
    pub fn known(self) -> Option<f32> {
        match self {
            Self::Pending => None,
            Self::Remaining(distance) => Some(distance),
        }
    }

    /// Returns true if the path is computed and at most `tolerance` away
    /// from its end.
    pub fn within(self, tolerance: f32) -> bool {
        self.known().is_some_and(|distance| distance <= tolerance)
    }
}

/// Navmesh-style agent that owns the NPC's transform and moves it along paths.
pub trait NavAgent {
    /// Current world position of the agent.
    fn position(&self) -> Vec3;

    /// Current orientation of the agent.
    fn rotation(&self) -> Quat;

    /// Overrides the orientation (used when turning toward a target).
    fn set_rotation(&mut self, rotation: Quat);

    /// Requests a path to `destination`.
    fn set_destination(&mut self, destination: Vec3);

    /// Remaining distance along the current path.
    fn remaining_distance(&self) -> PathDistance;

    fn is_stopped(&self) -> bool;

    fn set_stopped(&mut self, stopped: bool);

    fn set_speed(&mut self, speed: f32);

    /// Enables or disables path following entirely.
    fn set_enabled(&mut self, enabled: bool);

    /// Moves the agent by `offset` without path finding, staying on the
    /// navigable surface.
    fn move_by(&mut self, offset: Vec3);

    /// Snaps `point` onto the navigable surface, searching at most
    /// `max_distance` away.
    ///
    /// Returns `None` if no navigable point was found.
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Forward direction derived from [`NavAgent::rotation`].
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }
}
