//! The orc controller and its lifecycle.
//!
//! [`OrcController`] pairs the layered state machine with the [`Orc`]
//! blackboard. The machine never lives inside the blackboard: states only
//! see `&mut Orc`, request transitions through it, and the controller applies
//! them between hooks.
//!
//! One frame tick ([`update`](OrcController::update)) runs, in order:
//! 1. global then current `execute`
//! 2. speed and navigation sync (only Patrol and Chase move)
//! 3. the death check
//! 4. delayed actions that became due
//!
//! A dead orc skips steps 1 and 4 until it is activated again: death cancels
//! every delayed action, and telegrams and animation events are ignored.
mod cooldowns;
mod navigation;
mod orc;

pub use cooldowns::AttackKind;
pub use navigation::{inside_unit_sphere, random_nav_point};
pub use orc::Orc;

use std::cell::RefCell;
use std::rc::Rc;

use npc_core::{EntityId, OrcConfig, SoundCue, StuckVerdict, Telegram, VisualEffect};
use state_machine::{StateMachine, Transitions};
use tracing::{debug, info, trace};

use crate::env::OrcEnv;
use crate::error::Result;
use crate::messaging::{MessageDispatcher, MessageHandler};
use crate::states::{OrcGlobalState, OrcState, StateKind};

pub struct OrcController {
    fsm: StateMachine<OrcState, OrcGlobalState>,
    orc: Orc,
}

impl OrcController {
    /// Builds a controller, plays the spawn cue and enters Idle.
    ///
    /// `seed` feeds the wander-destination generator.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidConfig`](crate::RuntimeError::InvalidConfig)
    /// if `config` fails validation.
    pub fn new(
        config: OrcConfig,
        env: OrcEnv,
        bus: Rc<MessageDispatcher>,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;

        let mut controller = Self {
            fsm: StateMachine::with_global(OrcGlobalState),
            orc: Orc::new(config, env, bus, seed),
        };
        controller.orc.play(SoundCue::Spawn);
        controller.activate();

        info!(
            target: "runtime::controller",
            category = %controller.orc.category(),
            position = ?controller.orc.position(),
            "Orc spawned"
        );
        Ok(controller)
    }

    /// Builds a controller and registers it on `bus` under its category.
    ///
    /// The bus only keeps a weak handle; dropping the returned `Rc` turns
    /// telegrams addressed to the category into no-ops.
    pub fn spawn(
        config: OrcConfig,
        env: OrcEnv,
        bus: &Rc<MessageDispatcher>,
        seed: u64,
    ) -> Result<Rc<RefCell<Self>>> {
        let category = config.category;
        let controller = Rc::new(RefCell::new(Self::new(config, env, Rc::clone(bus), seed)?));

        let handler: Rc<RefCell<dyn MessageHandler>> = controller.clone();
        bus.register_handler(category, Rc::downgrade(&handler));
        Ok(controller)
    }

    // ------------------------------------------------------------------
    // Clock entry points
    // ------------------------------------------------------------------

    /// Frame tick.
    pub fn update(&mut self, dt: f32) {
        self.orc.set_delta_time(dt);
        if !self.orc.dead {
            self.fsm.update(&mut self.orc);
            self.orc.sync_speed();
        }

        self.update_ai_path();
        self.check_death();
        self.run_delayed_actions(dt);
    }

    /// Fixed physics tick: stuck detection while patrolling and alive.
    pub fn fixed_update(&mut self, dt: f32) {
        if self.orc.dead || !self.fsm.is_in(|state| matches!(state, OrcState::Patrol(_))) {
            return;
        }

        let position = self.orc.position();
        let verdict = self
            .orc
            .stuck
            .fixed_tick(dt, position, &self.orc.config.stuck);
        if verdict != StuckVerdict::Reroute {
            return;
        }

        let radius = self.orc.config.stuck.reroute_radius;
        let destination = self.orc.random_nav_point(position, radius);
        self.orc.set_patrol_destination(destination);
        self.orc.set_destination(destination);
        info!(
            target: "runtime::controller",
            category = %self.orc.category(),
            ?position,
            ?destination,
            "Stuck while patrolling; rerouting"
        );
    }

    // ------------------------------------------------------------------
    // Lifecycle events
    // ------------------------------------------------------------------

    /// Starts a fresh life: full health, navigation on, Idle.
    ///
    /// The previous state is discarded without running its exit hook, and
    /// every delayed action of the previous life is cancelled.
    pub fn activate(&mut self) {
        self.orc.reset_life();
        let max = self.orc.env.health.maximum();
        self.orc.env.health.set_current(max);
        self.orc.env.nav.set_enabled(true);
        self.orc.env.nav.set_stopped(false);

        let speed = self.orc.config.move_speed;
        self.orc.change_speed(speed);
        self.orc.sync_speed();

        if let Some(discarded) = self.fsm.reset() {
            debug!(
                target: "runtime::fsm",
                category = %self.orc.category(),
                discarded = %discarded.kind(),
                "State discarded on activation"
            );
        }
        self.fsm.change_state(&mut self.orc, OrcState::idle());
    }

    /// Returns the controller to its pool: cancels delayed actions and
    /// disables navigation.
    pub fn deactivate(&mut self) {
        let cancelled = self.orc.scheduler.len();
        self.orc.scheduler.clear();
        self.orc.env.nav.set_enabled(false);
        debug!(
            target: "runtime::controller",
            category = %self.orc.category(),
            cancelled,
            "Orc deactivated"
        );
    }

    /// Health hook: plays the damage cue while alive.
    pub fn on_damaged(&mut self) {
        if !self.orc.dead {
            self.orc.play(SoundCue::Damage);
        }
    }

    /// Animation-event hook fired at the end of an attack clip.
    ///
    /// Stores `delay` as the post-attack pause and switches to AttackDelay.
    /// Ignored once the orc is dead.
    pub fn on_animation_end(&mut self, delay: f32, clip: &str) {
        if self.orc.dead {
            return;
        }
        debug!(
            target: "runtime::controller",
            category = %self.orc.category(),
            clip,
            delay,
            "Attack animation ended"
        );
        self.orc.finish_attack(delay);
        self.apply_pending();
    }

    // ------------------------------------------------------------------
    // Commands and queries
    // ------------------------------------------------------------------

    /// Switches state immediately, running exit and enter hooks.
    pub fn change_state(&mut self, state: OrcState) {
        self.fsm.change_state(&mut self.orc, state);
    }

    pub fn current_state(&self) -> Option<StateKind> {
        self.fsm.current().map(OrcState::kind)
    }

    pub fn state(&self) -> Option<&OrcState> {
        self.fsm.current()
    }

    pub fn orc(&self) -> &Orc {
        &self.orc
    }

    pub fn orc_mut(&mut self) -> &mut Orc {
        &mut self.orc
    }

    pub fn is_dead(&self) -> bool {
        self.orc.is_dead()
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.orc.set_target(target);
    }

    /// Registers an externally spawned stone as owned by this orc.
    pub fn register_stone(&mut self, stone: EntityId) -> bool {
        self.orc.register_stone(stone)
    }

    /// Forgets a stone that was destroyed elsewhere.
    pub fn unregister_stone(&mut self, stone: EntityId) -> bool {
        self.orc.unregister_stone(stone)
    }

    // ------------------------------------------------------------------
    // Tick internals
    // ------------------------------------------------------------------

    fn update_ai_path(&mut self) {
        let moving = self
            .fsm
            .current()
            .is_some_and(|state| state.kind().is_moving());
        self.orc.env.nav.set_stopped(self.orc.dead || !moving);
    }

    /// Latches death and runs its side effects exactly once per life.
    fn check_death(&mut self) -> bool {
        if self.orc.dead || !self.orc.env.health.is_dead() {
            return false;
        }

        self.orc.dead = true;
        let cancelled = self.orc.scheduler.len();
        self.orc.scheduler.clear();
        let destroyed = self
            .orc
            .owned
            .destroy_all(self.orc.env.projectiles.as_mut());
        let category = self.orc.category();
        self.orc.env.progress.add_kill(category);
        self.orc.env.animation.set_trigger("Die");
        self.orc.env.animation.start_effect(VisualEffect::Dissolve);
        self.orc.play(SoundCue::Death);
        self.orc.env.nav.set_stopped(true);

        info!(
            target: "runtime::controller",
            %category,
            destroyed,
            cancelled,
            "Orc died"
        );
        true
    }

    fn run_delayed_actions(&mut self, dt: f32) {
        self.orc.scheduler.advance(dt);
        if self.orc.dead {
            return;
        }
        while let Some(action) = self.orc.scheduler.pop_due() {
            action(&mut self.orc);
            self.apply_pending();
        }
    }

    fn apply_pending(&mut self) {
        if let Some(next) = self.orc.take_transition() {
            self.fsm.change_state(&mut self.orc, next);
        }
    }
}

impl MessageHandler for OrcController {
    fn handle_message(&mut self, telegram: &Telegram) -> bool {
        if self.orc.dead {
            trace!(
                target: "runtime::messaging",
                category = %self.orc.category(),
                message = %telegram.message,
                "Dead receiver ignored telegram"
            );
            return false;
        }
        self.fsm.handle_message(&mut self.orc, telegram)
    }
}

impl std::fmt::Debug for OrcController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrcController")
            .field("state", &self.current_state())
            .field("orc", &self.orc)
            .finish()
    }
}
