//! Random destinations on the navigable surface.
use glam::Vec3;
use npc_core::NavAgent;
use rand::Rng;

/// Uniformly distributed point inside the unit ball.
pub fn inside_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}

/// Picks a random point within `distance` of `origin` and snaps it onto the
/// navigable surface.
///
/// Falls back to `origin` when sampling finds nothing, so callers always get
/// a usable destination.
pub fn random_nav_point<R, N>(rng: &mut R, nav: &N, origin: Vec3, distance: f32) -> Vec3
where
    R: Rng + ?Sized,
    N: NavAgent + ?Sized,
{
    let candidate = origin + inside_unit_sphere(rng) * distance;
    nav.sample_position(candidate, distance).unwrap_or(origin)
}
