//! Recording test world shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use npc_core::{
    AnimationSink, AudioSink, EntityCategory, EntityId, HealthOracle, NavAgent, OrcConfig,
    PathDistance, ProgressTracker, ProjectileOracle, Quat, SoundCue, SpatialQuery, TargetOracle,
    Vec3, VisualEffect,
};
use npc_runtime::{MessageDispatcher, OrcController, OrcEnv};

pub const DT: f32 = 0.1;

/// Plain world state; every provider trait reads and writes it.
#[derive(Debug)]
pub struct World {
    pub position: Vec3,
    pub rotation: Quat,
    pub destination: Option<Vec3>,
    pub destinations: Vec<Vec3>,
    pub path_pending: bool,
    pub stopped: bool,
    pub enabled: bool,
    pub speed: f32,
    pub moved: Vec<Vec3>,
    /// Samples outside the walkable area fail when false.
    pub walkable: bool,

    pub targets: HashMap<EntityId, Vec3>,
    /// Entity every ray cast reports; `None` means "whatever target is asked".
    pub occluder: Option<EntityId>,

    pub health: f32,
    pub max_health: f32,

    pub triggers: Vec<&'static str>,
    pub effects: Vec<VisualEffect>,
    pub sounds: Vec<SoundCue>,
    pub kills: Vec<EntityCategory>,

    pub stones_alive: BTreeSet<EntityId>,
    pub stones_destroyed: Vec<EntityId>,
    pub stones_spawned: Vec<(Vec3, Vec3)>,
    next_stone: u32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            destination: None,
            destinations: Vec::new(),
            path_pending: false,
            stopped: false,
            enabled: true,
            speed: 0.0,
            moved: Vec::new(),
            walkable: true,
            targets: HashMap::new(),
            occluder: None,
            health: 100.0,
            max_health: 100.0,
            triggers: Vec::new(),
            effects: Vec::new(),
            sounds: Vec::new(),
            kills: Vec::new(),
            stones_alive: BTreeSet::new(),
            stones_destroyed: Vec::new(),
            stones_spawned: Vec::new(),
            next_stone: 1000,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SharedWorld(pub Rc<RefCell<World>>);

impl SharedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn place_player(&self, position: Vec3) {
        self.with(|w| w.targets.insert(EntityId::PLAYER, position));
    }

    pub fn remove_player(&self) {
        self.with(|w| w.targets.remove(&EntityId::PLAYER));
    }

    pub fn kill(&self) {
        self.with(|w| w.health = 0.0);
    }

    pub fn last_trigger(&self) -> Option<&'static str> {
        self.with(|w| w.triggers.last().copied())
    }

    pub fn count_sound(&self, cue: SoundCue) -> usize {
        self.with(|w| w.sounds.iter().filter(|s| **s == cue).count())
    }

    pub fn count_trigger(&self, name: &str) -> usize {
        self.with(|w| w.triggers.iter().filter(|t| **t == name).count())
    }

    /// Moves the agent toward its destination at its speed unless stopped.
    pub fn step(&self, dt: f32) {
        self.with(|w| {
            let Some(destination) = w.destination else {
                return;
            };
            if w.stopped || !w.enabled {
                return;
            }
            let to = destination - w.position;
            let step = w.speed * dt;
            w.position = if to.length() <= step {
                destination
            } else {
                w.position + to.normalize() * step
            };
        });
    }
}

impl NavAgent for SharedWorld {
    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn rotation(&self) -> Quat {
        self.0.borrow().rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.0.borrow_mut().rotation = rotation;
    }

    fn set_destination(&mut self, destination: Vec3) {
        let mut world = self.0.borrow_mut();
        world.destination = Some(destination);
        world.destinations.push(destination);
    }

    fn remaining_distance(&self) -> PathDistance {
        let world = self.0.borrow();
        if world.path_pending {
            return PathDistance::Pending;
        }
        let remaining = world
            .destination
            .map_or(0.0, |destination| world.position.distance(destination));
        PathDistance::Remaining(remaining)
    }

    fn is_stopped(&self) -> bool {
        self.0.borrow().stopped
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.0.borrow_mut().stopped = stopped;
    }

    fn set_speed(&mut self, speed: f32) {
        self.0.borrow_mut().speed = speed;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }

    fn move_by(&mut self, offset: Vec3) {
        let mut world = self.0.borrow_mut();
        world.position += offset;
        world.moved.push(offset);
    }

    fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
        self.0
            .borrow()
            .walkable
            .then_some(Vec3::new(point.x, 0.0, point.z))
    }
}

impl SpatialQuery for SharedWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<EntityId> {
        let world = self.0.borrow();
        if let Some(occluder) = world.occluder {
            return Some(occluder);
        }
        // First target lying on the ray within range.
        world
            .targets
            .iter()
            .filter(|(_, position)| {
                let to = **position - origin;
                to.length() <= max_distance
                    && to.normalize_or_zero().dot(direction.normalize_or_zero()) > 0.999
            })
            .min_by(|a, b| {
                origin
                    .distance(*a.1)
                    .total_cmp(&origin.distance(*b.1))
            })
            .map(|(id, _)| *id)
    }
}

impl TargetOracle for SharedWorld {
    fn position(&self, target: EntityId) -> Option<Vec3> {
        self.0.borrow().targets.get(&target).copied()
    }
}

impl HealthOracle for SharedWorld {
    fn current(&self) -> f32 {
        self.0.borrow().health
    }

    fn maximum(&self) -> f32 {
        self.0.borrow().max_health
    }

    fn set_current(&mut self, value: f32) {
        self.0.borrow_mut().health = value;
    }
}

impl AnimationSink for SharedWorld {
    fn set_trigger(&mut self, name: &'static str) {
        self.0.borrow_mut().triggers.push(name);
    }

    fn start_effect(&mut self, effect: VisualEffect) {
        self.0.borrow_mut().effects.push(effect);
    }
}

impl AudioSink for SharedWorld {
    fn play(&mut self, cue: SoundCue) {
        self.0.borrow_mut().sounds.push(cue);
    }
}

impl ProgressTracker for SharedWorld {
    fn add_kill(&mut self, category: EntityCategory) {
        self.0.borrow_mut().kills.push(category);
    }
}

impl ProjectileOracle for SharedWorld {
    fn spawn_stone(&mut self, origin: Vec3, target_point: Vec3) -> EntityId {
        let mut world = self.0.borrow_mut();
        let stone = EntityId(world.next_stone);
        world.next_stone += 1;
        world.stones_alive.insert(stone);
        world.stones_spawned.push((origin, target_point));
        stone
    }

    fn is_alive(&self, projectile: EntityId) -> bool {
        self.0.borrow().stones_alive.contains(&projectile)
    }

    fn destroy(&mut self, projectile: EntityId) {
        let mut world = self.0.borrow_mut();
        world.stones_alive.remove(&projectile);
        world.stones_destroyed.push(projectile);
    }
}

/// Config with timers long enough that nothing fires unless a test asks.
pub fn calm_config() -> OrcConfig {
    let mut config = OrcConfig::default();
    config.idle_duration = 100.0;
    config
}

pub fn controller(world: &SharedWorld, config: OrcConfig) -> OrcController {
    let bus = Rc::new(MessageDispatcher::new());
    OrcController::new(config, OrcEnv::from_shared(world), bus, 7)
        .expect("valid test config")
}

/// Runs `ticks` frame ticks, stepping the world between them.
pub fn run(controller: &mut OrcController, world: &SharedWorld, ticks: usize) {
    for _ in 0..ticks {
        controller.update(DT);
        world.step(DT);
    }
}
