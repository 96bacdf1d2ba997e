//! Field-of-view target detection.
//!
//! A target is visible when it lies inside the view cone, within detection
//! range and, optionally, when a single ray cast toward it hits the target
//! first. Both the angle and the range boundary are inclusive.

use glam::Vec3;

use crate::env::SpatialQuery;
use crate::ids::EntityId;

/// View cone of an NPC.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldOfView {
    /// Full opening angle of the cone in degrees.
    pub view_angle: f32,
    /// Farthest distance at which a target can be seen.
    pub detection_range: f32,
    /// Require an unobstructed ray toward the target.
    pub requires_line_of_sight: bool,
}

impl FieldOfView {
    pub const fn new(view_angle: f32, detection_range: f32) -> Self {
        Self {
            view_angle,
            detection_range,
            requires_line_of_sight: false,
        }
    }

    /// Builder toggle for the occlusion check.
    #[must_use]
    pub const fn with_line_of_sight(mut self, required: bool) -> Self {
        self.requires_line_of_sight = required;
        self
    }

    /// Cosine of the half view angle; a direction whose dot product with the
    /// forward vector is at least this value is inside the cone.
    pub fn cos_half_angle(&self) -> f32 {
        (self.view_angle * 0.5).to_radians().cos()
    }

    /// Returns true if `target` is visible from `eye` looking along `forward`.
    ///
    /// `forward` must be normalized. A missing target is never visible.
    ///
    /// With line of sight required, a ray cast that reports no hit at all is
    /// treated as blocked: the target was already known to be in range, so a
    /// miss means the query could not confirm it.
    pub fn is_target_in_sight<Q>(
        &self,
        eye: Vec3,
        forward: Vec3,
        target: Option<(EntityId, Vec3)>,
        spatial: &Q,
    ) -> bool
    where
        Q: SpatialQuery + ?Sized,
    {
        let Some((target_id, target_position)) = target else {
            return false;
        };

        let to_target = target_position - eye;
        let dot = forward.dot(to_target.normalize_or_zero());
        if dot < self.cos_half_angle() {
            return false;
        }

        if to_target.length() > self.detection_range {
            return false;
        }

        if !self.requires_line_of_sight {
            return true;
        }

        spatial.raycast(eye, to_target, self.detection_range) == Some(target_id)
    }

    /// Returns the left and right horizontal edges of the cone, for debug
    /// overlays.
    pub fn view_edges(&self, forward: Vec3) -> [Vec3; 2] {
        let yaw = forward.x.atan2(forward.z).to_degrees();
        let half = self.view_angle * 0.5;
        [direction_from_yaw(yaw - half), direction_from_yaw(yaw + half)]
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::new(90.0, 10.0)
    }
}

fn direction_from_yaw(degrees: f32) -> Vec3 {
    let radians = degrees.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: EntityId = EntityId(7);
    const WALL: EntityId = EntityId(99);

    struct FixedRay(Option<EntityId>);

    impl SpatialQuery for FixedRay {
        fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<EntityId> {
            self.0
        }
    }

    fn sees(fov: FieldOfView, target: Vec3, ray: Option<EntityId>) -> bool {
        fov.is_target_in_sight(Vec3::ZERO, Vec3::Z, Some((TARGET, target)), &FixedRay(ray))
    }

    #[test]
    fn missing_target_is_not_visible() {
        let fov = FieldOfView::default();
        assert!(!fov.is_target_in_sight(Vec3::ZERO, Vec3::Z, None, &FixedRay(None)));
    }

    #[test]
    fn target_ahead_within_range_is_visible() {
        assert!(sees(FieldOfView::default(), Vec3::new(0.0, 0.0, 5.0), None));
    }

    #[test]
    fn target_behind_is_not_visible() {
        assert!(!sees(FieldOfView::default(), Vec3::new(0.0, 0.0, -5.0), None));
    }

    #[test]
    fn angle_boundary_is_inclusive() {
        // A zero-degree cone has a threshold of exactly cos(0) = 1.
        let fov = FieldOfView::new(0.0, 10.0);
        assert_eq!(fov.cos_half_angle(), 1.0);
        assert!(sees(fov, Vec3::new(0.0, 0.0, 4.0), None));
        assert!(!sees(fov, Vec3::new(0.1, 0.0, 4.0), None));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let fov = FieldOfView::new(90.0, 10.0);
        assert!(sees(fov, Vec3::new(0.0, 0.0, 10.0), None));
        assert!(!sees(fov, Vec3::new(0.0, 0.0, 11.0), None));
    }

    #[test]
    fn occluder_hit_first_blocks_sight() {
        let fov = FieldOfView::default().with_line_of_sight(true);
        assert!(!sees(fov, Vec3::new(0.0, 0.0, 5.0), Some(WALL)));
    }

    #[test]
    fn ray_hitting_target_confirms_sight() {
        let fov = FieldOfView::default().with_line_of_sight(true);
        assert!(sees(fov, Vec3::new(0.0, 0.0, 5.0), Some(TARGET)));
    }

    #[test]
    fn ray_without_hit_counts_as_blocked() {
        let fov = FieldOfView::default().with_line_of_sight(true);
        assert!(!sees(fov, Vec3::new(0.0, 0.0, 5.0), None));
    }

    #[test]
    fn occlusion_is_not_queried_when_disabled() {
        assert!(sees(FieldOfView::default(), Vec3::new(0.0, 0.0, 5.0), Some(WALL)));
    }

    #[test]
    fn view_edges_are_symmetric_around_forward() {
        let [left, right] = FieldOfView::new(90.0, 10.0).view_edges(Vec3::Z);
        assert!((left.x + right.x).abs() < 1e-5);
        assert!((left.z - right.z).abs() < 1e-5);
        assert!(left.x < 0.0 && right.x > 0.0);
    }
}
