//! Blackboard shared by the orc's states.
//!
//! [`Orc`] is the context every [`OrcState`] hook receives. It owns the host
//! providers, the delayed-action scheduler and all per-life bookkeeping, and
//! exposes the small vocabulary states are written in: look at the target,
//! change speed, arm a keyed delay, request a transition.
use std::rc::Rc;

use glam::{Quat, Vec3};
use npc_core::{
    DelayScheduler, EntityCategory, EntityId, MessageType, OrcConfig, OwnedObjects, PathDistance,
    Payload, SoundCue, StuckMonitor, Telegram, TimerHandle,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use state_machine::Transitions;
use tracing::{debug, trace};

use super::cooldowns::{AttackKind, Cooldowns};
use super::navigation::random_nav_point;
use crate::env::OrcEnv;
use crate::messaging::MessageDispatcher;
use crate::states::{OrcState, StateKind};

/// Height above the agent's feet at which thrown stones are spawned.
const HAND_HEIGHT: f32 = 1.5;

pub struct Orc {
    pub(crate) config: OrcConfig,
    pub(crate) env: OrcEnv,
    pub(crate) bus: Rc<MessageDispatcher>,
    pub(crate) scheduler: DelayScheduler<Orc>,
    pub(crate) owned: OwnedObjects,
    pub(crate) stuck: StuckMonitor,
    pub(crate) cooldowns: Cooldowns,
    pub(crate) dead: bool,
    pub(crate) state: Option<StateKind>,
    rng: StdRng,
    target: Option<EntityId>,
    move_speed: f32,
    patrol_destination: Vec3,
    attack_delay: f32,
    not_attack: bool,
    distance_to_target: Option<f32>,
    delta_time: f32,
    pending: Option<OrcState>,
}

impl Orc {
    pub(crate) fn new(config: OrcConfig, env: OrcEnv, bus: Rc<MessageDispatcher>, seed: u64) -> Self {
        let position = env.nav.position();
        let move_speed = config.move_speed;
        Self {
            config,
            env,
            bus,
            scheduler: DelayScheduler::new(),
            owned: OwnedObjects::new(),
            stuck: StuckMonitor::new(position),
            cooldowns: Cooldowns::default(),
            dead: false,
            state: None,
            rng: StdRng::seed_from_u64(seed),
            target: Some(EntityId::PLAYER),
            move_speed,
            patrol_destination: position,
            attack_delay: 0.0,
            not_attack: false,
            distance_to_target: None,
            delta_time: 0.0,
            pending: None,
        }
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &OrcConfig {
        &self.config
    }

    pub fn category(&self) -> EntityCategory {
        self.config.category
    }

    pub fn position(&self) -> Vec3 {
        self.env.nav.position()
    }

    pub fn forward(&self) -> Vec3 {
        self.env.nav.forward()
    }

    pub fn rotation(&self) -> Quat {
        self.env.nav.rotation()
    }

    /// Kind of the state currently active, or `None` before the first enter.
    pub fn current_state(&self) -> Option<StateKind> {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Frame delta of the tick being processed.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Scheduler time in seconds.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn patrol_destination(&self) -> Vec3 {
        self.patrol_destination
    }

    pub fn attack_delay(&self) -> f32 {
        self.attack_delay
    }

    pub fn owned(&self) -> &OwnedObjects {
        &self.owned
    }

    /// Number of delayed actions still armed.
    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_action_pending(&self, key: &str) -> bool {
        self.scheduler.is_key_pending(key)
    }

    // ------------------------------------------------------------------
    // Target
    // ------------------------------------------------------------------

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        if self.target != target {
            debug!(
                target: "runtime::controller",
                category = %self.config.category,
                ?target,
                "Target changed"
            );
        }
        self.target = target;
    }

    /// World position of the target, if it still resolves.
    pub fn target_position(&self) -> Option<Vec3> {
        self.target.and_then(|id| self.env.targets.position(id))
    }

    /// Straight-line distance to the target.
    pub fn distance_to_target(&self) -> Option<f32> {
        self.target_position()
            .map(|target| self.position().distance(target))
    }

    /// Distance recorded by the global state at the start of this tick.
    pub fn recorded_distance(&self) -> Option<f32> {
        self.distance_to_target
    }

    pub(crate) fn record_distance(&mut self) {
        self.distance_to_target = self.distance_to_target();
    }

    /// Remaining distance along the agent's current path.
    pub fn remaining_distance(&self) -> PathDistance {
        self.env.nav.remaining_distance()
    }

    pub fn is_target_in_sight(&self) -> bool {
        let target = self
            .target
            .and_then(|id| self.env.targets.position(id).map(|position| (id, position)));
        self.config.sight.is_target_in_sight(
            self.position(),
            self.forward(),
            target,
            self.env.spatial.as_ref(),
        )
    }

    /// Turns toward the target on the horizontal plane.
    ///
    /// The turn is a slerp from the current rotation by
    /// `rotation_speed * delta_time`, clamped to a full turn per tick.
    pub fn look_at_target(&mut self) {
        let Some(target) = self.target_position() else {
            return;
        };
        let mut direction = target - self.position();
        direction.y = 0.0;
        if direction.length_squared() <= f32::EPSILON {
            return;
        }

        let look = Quat::from_rotation_y(direction.x.atan2(direction.z));
        let t = (self.config.rotation_speed * self.delta_time).clamp(0.0, 1.0);
        let rotation = self.rotation().slerp(look, t);
        self.env.nav.set_rotation(rotation);
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Sets the agent speed; applied to the navigation agent every tick.
    pub fn change_speed(&mut self, speed: f32) {
        self.move_speed = speed;
    }

    pub(crate) fn sync_speed(&mut self) {
        self.env.nav.set_speed(self.move_speed);
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.env.nav.set_destination(destination);
    }

    pub fn set_patrol_destination(&mut self, destination: Vec3) {
        self.patrol_destination = destination;
    }

    pub fn move_by(&mut self, offset: Vec3) {
        self.env.nav.move_by(offset);
    }

    /// Random navigable point within `radius` of `origin`, or `origin` itself.
    pub fn random_nav_point(&mut self, origin: Vec3, radius: f32) -> Vec3 {
        random_nav_point(&mut self.rng, self.env.nav.as_ref(), origin, radius)
    }

    // ------------------------------------------------------------------
    // Delayed actions and transitions
    // ------------------------------------------------------------------

    /// Arms a delayed action; see [`DelayScheduler::delay`].
    pub fn delay_action(
        &mut self,
        duration: f32,
        key: Option<&str>,
        action: impl FnOnce(&mut Orc) + 'static,
    ) -> TimerHandle {
        trace!(
            target: "runtime::controller",
            duration,
            key,
            "Delayed action armed"
        );
        self.scheduler.delay(duration, key, action)
    }

    pub fn cancel_action(&mut self, key: &str) -> bool {
        self.scheduler.cancel_key(key)
    }

    /// Requests a transition; it is applied as soon as the running hook or
    /// delayed action returns. A later request in the same hook wins.
    ///
    /// The transition is not visible inside the requesting hook: code after
    /// this call still runs against the outgoing state, and
    /// [`current_state`](Self::current_state) keeps reporting it until the
    /// hook returns. Field changes made through `Orc` are immediate.
    pub fn change_state(&mut self, state: OrcState) {
        if let Some(superseded) = self.pending.replace(state) {
            trace!(
                target: "runtime::fsm",
                superseded = %superseded.kind(),
                "Pending transition replaced"
            );
        }
    }

    // ------------------------------------------------------------------
    // Attacks
    // ------------------------------------------------------------------

    pub fn cooldown_ready(&self, kind: AttackKind) -> bool {
        self.cooldowns.is_ready(kind, self.now())
    }

    pub fn start_cooldown(&mut self, kind: AttackKind) {
        let duration = kind.cooldown(&self.config);
        let now = self.now();
        self.cooldowns.start(kind, now, duration);
    }

    /// Ends the current attack: stores the post-attack delay and moves to
    /// AttackDelay.
    pub fn finish_attack(&mut self, delay: f32) {
        self.attack_delay = delay;
        self.change_state(OrcState::attack_delay());
    }

    /// Gives up an attack whose start condition no longer holds; AttackDelay
    /// then returns to Chase without waiting.
    pub fn abort_attack(&mut self) {
        self.not_attack = true;
        self.change_state(OrcState::attack_delay());
    }

    pub(crate) fn take_not_attack(&mut self) -> bool {
        std::mem::take(&mut self.not_attack)
    }

    /// Spawns a stone aimed at the target and registers it as owned.
    pub fn throw_stone(&mut self) -> Option<EntityId> {
        let target = self.target_position()?;
        let origin = self.position() + Vec3::Y * HAND_HEIGHT;
        let stone = self.env.projectiles.spawn_stone(origin, target);
        self.owned.register(stone);
        debug!(
            target: "runtime::controller",
            category = %self.config.category,
            %stone,
            "Stone thrown"
        );
        Some(stone)
    }

    pub fn register_stone(&mut self, stone: EntityId) -> bool {
        self.owned.register(stone)
    }

    pub fn unregister_stone(&mut self, stone: EntityId) -> bool {
        self.owned.unregister(stone)
    }

    // ------------------------------------------------------------------
    // Feedback and messaging
    // ------------------------------------------------------------------

    pub fn set_trigger(&mut self, name: &'static str) {
        self.env.animation.set_trigger(name);
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.env.audio.play(cue);
    }

    /// Sends a telegram from this orc's category through the shared bus.
    pub fn send_message(
        &self,
        receiver: EntityCategory,
        message: MessageType,
        delay: f32,
        payload: Option<Payload>,
    ) -> bool {
        let mut telegram = Telegram::new(self.config.category, receiver, message).with_delay(delay);
        telegram.payload = payload;
        self.bus.dispatch(telegram)
    }

    pub(crate) fn set_delta_time(&mut self, dt: f32) {
        self.delta_time = dt;
    }

    /// Clears per-life bookkeeping when the controller is (re)activated.
    pub(crate) fn reset_life(&mut self) {
        self.dead = false;
        self.state = None;
        self.pending = None;
        self.not_attack = false;
        self.attack_delay = 0.0;
        self.distance_to_target = None;
        self.cooldowns.clear();
        self.scheduler.clear();
        let position = self.position();
        self.stuck.reset(position);
        self.patrol_destination = position;
    }
}

impl Transitions<OrcState> for Orc {
    fn take_transition(&mut self) -> Option<OrcState> {
        self.pending.take()
    }
}

impl std::fmt::Debug for Orc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orc")
            .field("category", &self.config.category)
            .field("state", &self.state)
            .field("target", &self.target)
            .field("dead", &self.dead)
            .field("move_speed", &self.move_speed)
            .field("scheduler", &self.scheduler)
            .field("owned", &self.owned)
            .finish_non_exhaustive()
    }
}
