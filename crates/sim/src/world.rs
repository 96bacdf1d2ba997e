//! Flat square arena with a single pillar, implementing every host provider.
//!
//! The arena is shared through `Rc<RefCell<_>>`; each monster gets a
//! [`BodyHandle`] that implements the provider traits for its own body.
//! [`Arena::step`] advances everything the controllers do not drive
//! themselves (agent movement, the wandering player, flying stones, attack
//! clips) and reports what happened as [`ArenaEvent`]s.
use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec2, Vec3};
use npc_core::{
    AnimationSink, AudioSink, EntityCategory, EntityId, HealthOracle, NavAgent, PathDistance,
    ProgressTracker, ProjectileOracle, SoundCue, SpatialQuery, TargetOracle, VisualEffect,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

const HALF_EXTENT: f32 = 20.0;
const PILLAR: EntityId = EntityId(1);
const PILLAR_CENTER: Vec3 = Vec3::ZERO;
const PILLAR_RADIUS: f32 = 2.0;
const BODY_RADIUS: f32 = 0.5;

const PLAYER_SPEED: f32 = 1.5;
const STRIKE_INTERVAL: f32 = 1.5;
const STRIKE_RANGE: f32 = 2.0;
const STRIKE_DAMAGE: f32 = 30.0;

const STONE_SPEED: f32 = 10.0;
const ATTACK_CLIP_LENGTH: f32 = 1.2;

/// Something the host loop has to forward to a controller.
#[derive(Clone, Debug, PartialEq)]
pub enum ArenaEvent {
    /// An attack clip finished playing on `body`.
    ClipFinished { body: usize, clip: &'static str },
    /// A stone reached its target point and was removed.
    StoneLanded { owner: usize, stone: EntityId },
    /// The player hit `body`.
    Struck { body: usize, damage: f32 },
}

#[derive(Debug)]
struct Clip {
    name: &'static str,
    remaining: f32,
}

#[derive(Debug)]
pub struct Body {
    pub id: EntityId,
    pub category: EntityCategory,
    spawn: Vec3,
    position: Vec3,
    rotation: Quat,
    destination: Option<Vec3>,
    stopped: bool,
    enabled: bool,
    speed: f32,
    health: f32,
    max_health: f32,
    clip: Option<Clip>,
}

impl Body {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn health(&self) -> f32 {
        self.health
    }
}

#[derive(Debug)]
struct Stone {
    id: EntityId,
    owner: usize,
    position: Vec3,
    target: Vec3,
}

#[derive(Debug)]
pub struct Arena {
    player: Vec3,
    player_goal: Vec3,
    strike_cooldown: f32,
    bodies: Vec<Body>,
    stones: Vec<Stone>,
    kills: Vec<EntityCategory>,
    next_id: u32,
    rng: StdRng,
}

impl Arena {
    pub fn new(seed: u64) -> Self {
        Self {
            player: Vec3::new(0.0, 0.0, -HALF_EXTENT * 0.5),
            player_goal: Vec3::new(0.0, 0.0, -HALF_EXTENT * 0.5),
            strike_cooldown: STRIKE_INTERVAL,
            bodies: Vec::new(),
            stones: Vec::new(),
            kills: Vec::new(),
            next_id: 100,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn player(&self) -> Vec3 {
        self.player
    }

    pub fn body(&self, index: usize) -> &Body {
        &self.bodies[index]
    }

    pub fn kills(&self) -> &[EntityCategory] {
        &self.kills
    }

    pub fn stones_in_flight(&self) -> usize {
        self.stones.len()
    }

    /// Adds a body at `spawn` facing the arena center and returns its index.
    pub fn add_body(&mut self, category: EntityCategory, spawn: Vec3) -> usize {
        let id = self.allocate_id();
        let facing = Quat::from_rotation_y((-spawn.x).atan2(-spawn.z));
        self.bodies.push(Body {
            id,
            category,
            spawn,
            position: spawn,
            rotation: facing,
            destination: None,
            stopped: true,
            enabled: true,
            speed: 0.0,
            health: 100.0,
            max_health: 100.0,
            clip: None,
        });
        self.bodies.len() - 1
    }

    /// Moves a pooled body back to its spawn point.
    pub fn respawn(&mut self, index: usize) {
        let body = &mut self.bodies[index];
        body.position = body.spawn;
        body.destination = None;
        body.clip = None;
    }

    /// Advances the arena by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Vec<ArenaEvent> {
        let mut events = Vec::new();
        self.step_player(dt, &mut events);
        self.step_bodies(dt, &mut events);
        self.step_stones(dt, &mut events);
        events
    }

    fn step_player(&mut self, dt: f32, events: &mut Vec<ArenaEvent>) {
        if self.player.distance(self.player_goal) < 0.1 {
            self.player_goal = self.random_open_point();
        }
        self.player = move_toward(self.player, self.player_goal, PLAYER_SPEED * dt);

        self.strike_cooldown -= dt;
        if self.strike_cooldown > 0.0 {
            return;
        }
        let player = self.player;
        let nearest = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.health > 0.0)
            .map(|(index, body)| (index, body.position.distance(player)))
            .filter(|(_, distance)| *distance <= STRIKE_RANGE)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((index, _)) = nearest {
            let body = &mut self.bodies[index];
            body.health = (body.health - STRIKE_DAMAGE).max(0.0);
            events.push(ArenaEvent::Struck {
                body: index,
                damage: STRIKE_DAMAGE,
            });
            self.strike_cooldown = STRIKE_INTERVAL;
        }
    }

    fn step_bodies(&mut self, dt: f32, events: &mut Vec<ArenaEvent>) {
        for (index, body) in self.bodies.iter_mut().enumerate() {
            if let Some(clip) = body.clip.as_mut() {
                clip.remaining -= dt;
                if clip.remaining <= 0.0 {
                    events.push(ArenaEvent::ClipFinished {
                        body: index,
                        clip: clip.name,
                    });
                    body.clip = None;
                }
            }

            let Some(destination) = body.destination else {
                continue;
            };
            if body.stopped || !body.enabled || body.health <= 0.0 {
                continue;
            }
            let next = move_toward(body.position, destination, body.speed * dt);
            if is_open(next) {
                body.position = next;
            }
        }
    }

    fn step_stones(&mut self, dt: f32, events: &mut Vec<ArenaEvent>) {
        let mut landed = Vec::new();
        for stone in &mut self.stones {
            stone.position = move_toward(stone.position, stone.target, STONE_SPEED * dt);
            if stone.position.distance(stone.target) < 0.05 {
                landed.push((stone.owner, stone.id));
            }
        }
        for (owner, stone) in landed {
            self.stones.retain(|flying| flying.id != stone);
            events.push(ArenaEvent::StoneLanded { owner, stone });
        }
    }

    fn random_open_point(&mut self) -> Vec3 {
        loop {
            let point = Vec3::new(
                self.rng.gen_range(-HALF_EXTENT..=HALF_EXTENT),
                0.0,
                self.rng.gen_range(-HALF_EXTENT..=HALF_EXTENT),
            );
            if is_open(point) {
                return point;
            }
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn target_position(&self, target: EntityId) -> Option<Vec3> {
        if target.is_player() {
            return Some(self.player);
        }
        self.bodies
            .iter()
            .find(|body| body.id == target && body.health > 0.0)
            .map(|body| body.position)
    }
}

fn move_toward(from: Vec3, to: Vec3, step: f32) -> Vec3 {
    let offset = to - from;
    if offset.length() <= step {
        to
    } else {
        from + offset.normalize() * step
    }
}

fn clamp_to_arena(point: Vec3) -> Vec3 {
    Vec3::new(
        point.x.clamp(-HALF_EXTENT, HALF_EXTENT),
        0.0,
        point.z.clamp(-HALF_EXTENT, HALF_EXTENT),
    )
}

fn is_open(point: Vec3) -> bool {
    let flat = Vec3::new(point.x, 0.0, point.z);
    flat.distance(PILLAR_CENTER) >= PILLAR_RADIUS + BODY_RADIUS
        && point.x.abs() <= HALF_EXTENT
        && point.z.abs() <= HALF_EXTENT
}

/// Distance along a horizontal ray to a vertical cylinder, if it is hit.
fn ray_circle(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let direction = Vec2::new(direction.x, direction.z).normalize_or_zero();
    if direction == Vec2::ZERO {
        return None;
    }
    let to_center = Vec2::new(center.x - origin.x, center.z - origin.z);
    let along = to_center.dot(direction);
    let miss_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if miss_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - miss_sq).sqrt();
    let near = along - half_chord;
    let hit = if near >= 0.0 { near } else { along + half_chord };
    (hit >= 0.0).then_some(hit)
}

/// Provider view of one body in a shared [`Arena`].
#[derive(Clone, Debug)]
pub struct BodyHandle {
    arena: Rc<RefCell<Arena>>,
    index: usize,
}

impl BodyHandle {
    pub fn new(arena: Rc<RefCell<Arena>>, index: usize) -> Self {
        Self { arena, index }
    }

    fn read<R>(&self, f: impl FnOnce(&Body) -> R) -> R {
        f(&self.arena.borrow().bodies[self.index])
    }

    fn write<R>(&self, f: impl FnOnce(&mut Body) -> R) -> R {
        f(&mut self.arena.borrow_mut().bodies[self.index])
    }

    fn category(&self) -> EntityCategory {
        self.read(|body| body.category)
    }
}

impl NavAgent for BodyHandle {
    fn position(&self) -> Vec3 {
        self.read(|body| body.position)
    }

    fn rotation(&self) -> Quat {
        self.read(|body| body.rotation)
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.write(|body| body.rotation = rotation);
    }

    fn set_destination(&mut self, destination: Vec3) {
        self.write(|body| body.destination = Some(clamp_to_arena(destination)));
    }

    fn remaining_distance(&self) -> PathDistance {
        self.read(|body| {
            let remaining = body
                .destination
                .map_or(0.0, |destination| body.position.distance(destination));
            PathDistance::Remaining(remaining)
        })
    }

    fn is_stopped(&self) -> bool {
        self.read(|body| body.stopped)
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.write(|body| body.stopped = stopped);
    }

    fn set_speed(&mut self, speed: f32) {
        self.write(|body| body.speed = speed);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.write(|body| body.enabled = enabled);
    }

    fn move_by(&mut self, offset: Vec3) {
        self.write(|body| {
            let next = clamp_to_arena(body.position + offset);
            if is_open(next) {
                body.position = next;
            }
        });
    }

    fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
        let snapped = clamp_to_arena(point);
        is_open(snapped).then_some(snapped)
    }
}

impl SpatialQuery for BodyHandle {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<EntityId> {
        let arena = self.arena.borrow();
        let pillar = ray_circle(origin, direction, PILLAR_CENTER, PILLAR_RADIUS)
            .map(|distance| (distance, PILLAR));
        let player = ray_circle(origin, direction, arena.player, BODY_RADIUS)
            .map(|distance| (distance, EntityId::PLAYER));

        [pillar, player]
            .into_iter()
            .flatten()
            .filter(|(distance, _)| *distance <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }
}

impl TargetOracle for BodyHandle {
    fn position(&self, target: EntityId) -> Option<Vec3> {
        self.arena.borrow().target_position(target)
    }
}

impl HealthOracle for BodyHandle {
    fn current(&self) -> f32 {
        self.read(|body| body.health)
    }

    fn maximum(&self) -> f32 {
        self.read(|body| body.max_health)
    }

    fn set_current(&mut self, value: f32) {
        self.write(|body| body.health = value);
    }
}

impl AnimationSink for BodyHandle {
    fn set_trigger(&mut self, name: &'static str) {
        trace!(target: "sim", category = %self.category(), name, "Animator trigger");
        if matches!(name, "MeleeAttack" | "Rush" | "Throw") {
            self.write(|body| {
                body.clip = Some(Clip {
                    name,
                    remaining: ATTACK_CLIP_LENGTH,
                })
            });
        }
    }

    fn start_effect(&mut self, effect: VisualEffect) {
        debug!(target: "sim", category = %self.category(), %effect, "Effect started");
    }
}

impl AudioSink for BodyHandle {
    fn play(&mut self, cue: SoundCue) {
        trace!(target: "sim", category = %self.category(), %cue, "Sound");
    }
}

impl ProgressTracker for BodyHandle {
    fn add_kill(&mut self, category: EntityCategory) {
        self.arena.borrow_mut().kills.push(category);
    }
}

impl ProjectileOracle for BodyHandle {
    fn spawn_stone(&mut self, origin: Vec3, target_point: Vec3) -> EntityId {
        let mut arena = self.arena.borrow_mut();
        let id = arena.allocate_id();
        arena.stones.push(Stone {
            id,
            owner: self.index,
            position: origin,
            target: target_point,
        });
        id
    }

    fn is_alive(&self, projectile: EntityId) -> bool {
        self.arena
            .borrow()
            .stones
            .iter()
            .any(|stone| stone.id == projectile)
    }

    fn destroy(&mut self, projectile: EntityId) {
        self.arena
            .borrow_mut()
            .stones
            .retain(|stone| stone.id != projectile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_the_pillar_front_face() {
        let origin = Vec3::new(0.0, 0.0, -10.0);
        let hit = ray_circle(origin, Vec3::Z, PILLAR_CENTER, PILLAR_RADIUS);
        assert_eq!(hit, Some(8.0));
    }

    #[test]
    fn ray_misses_a_circle_behind_the_origin() {
        let origin = Vec3::new(0.0, 0.0, 10.0);
        assert_eq!(ray_circle(origin, Vec3::Z, PILLAR_CENTER, PILLAR_RADIUS), None);
    }

    #[test]
    fn pillar_blocks_the_player_behind_it() {
        let arena = Rc::new(RefCell::new(Arena::new(1)));
        arena.borrow_mut().player = Vec3::new(0.0, 0.0, 6.0);
        let body = arena
            .borrow_mut()
            .add_body(EntityCategory::Orc, Vec3::new(0.0, 0.0, -6.0));
        let handle = BodyHandle::new(Rc::clone(&arena), body);

        let hit = handle.raycast(Vec3::new(0.0, 0.0, -6.0), Vec3::Z, 20.0);
        assert_eq!(hit, Some(PILLAR));

        arena.borrow_mut().player = Vec3::new(6.0, 0.0, -6.0);
        let hit = handle.raycast(Vec3::new(0.0, 0.0, -6.0), Vec3::X, 20.0);
        assert_eq!(hit, Some(EntityId::PLAYER));
    }

    #[test]
    fn bodies_cannot_enter_the_pillar() {
        let arena = Rc::new(RefCell::new(Arena::new(1)));
        let body = arena
            .borrow_mut()
            .add_body(EntityCategory::Orc, Vec3::new(0.0, 0.0, -3.0));
        let mut handle = BodyHandle::new(Rc::clone(&arena), body);

        handle.move_by(Vec3::new(0.0, 0.0, 1.0));

        assert_eq!(NavAgent::position(&handle), Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(handle.sample_position(Vec3::ZERO, 5.0), None);
    }

    #[test]
    fn landed_stones_are_reported_and_removed() {
        let arena = Rc::new(RefCell::new(Arena::new(1)));
        let body = arena
            .borrow_mut()
            .add_body(EntityCategory::Orc, Vec3::new(10.0, 0.0, 10.0));
        let mut handle = BodyHandle::new(Rc::clone(&arena), body);
        let stone = handle.spawn_stone(Vec3::new(10.0, 1.5, 10.0), Vec3::new(10.0, 0.0, 14.0));

        let events = arena.borrow_mut().step(1.0);

        assert!(events.contains(&ArenaEvent::StoneLanded { owner: body, stone }));
        assert!(!handle.is_alive(stone));
    }
}
