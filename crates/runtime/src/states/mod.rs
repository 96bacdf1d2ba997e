//! Behavior states of the orc.
//!
//! Each state lives in its own module as a small struct implementing
//! [`State<Orc>`]. [`OrcState`] is the closed sum the controller's machine
//! runs, and [`OrcGlobalState`] is the always-on layer executed before it.
//!
//! States talk to the world only through the [`Orc`] blackboard and request
//! transitions with [`Orc::change_state`]; delayed work such as the idle
//! timeout or the stone release is armed as a keyed delayed action and
//! cancelled on exit.
mod attack_delay;
mod chase;
mod global;
mod idle;
mod melee_attack;
mod patrol;
mod rush_attack;
mod stone_throw;

pub use attack_delay::AttackDelay;
pub use chase::Chase;
pub use global::OrcGlobalState;
pub use idle::Idle;
pub use melee_attack::MeleeAttack;
pub use patrol::Patrol;
pub use rush_attack::RushAttack;
pub use stone_throw::StoneThrow;

use npc_core::Telegram;
use state_machine::State;
use tracing::debug;

use crate::controller::Orc;

/// Delayed-action keys owned by the states.
pub mod keys {
    pub const IDLE: &str = "idle";
    pub const ATTACK_DELAY: &str = "attack-delay";
    pub const ATTACK_TIMEOUT: &str = "attack-timeout";
    pub const STONE_RELEASE: &str = "stone-release";
}

/// Name of a behavior state, for queries and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum StateKind {
    Idle,
    Patrol,
    Chase,
    AttackDelay,
    StoneThrow,
    RushAttack,
    MeleeAttack,
}

impl StateKind {
    /// States in which the navigation agent follows its path.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Patrol | Self::Chase)
    }

    /// States that have not engaged a target yet.
    pub fn is_calm(self) -> bool {
        matches!(self, Self::Idle | Self::Patrol)
    }
}

/// Every behavior state an orc can be in.
#[derive(Clone, Debug, PartialEq)]
pub enum OrcState {
    Idle(Idle),
    Patrol(Patrol),
    Chase(Chase),
    AttackDelay(AttackDelay),
    StoneThrow(StoneThrow),
    RushAttack(RushAttack),
    MeleeAttack(MeleeAttack),
}

impl OrcState {
    pub fn idle() -> Self {
        Self::Idle(Idle)
    }

    pub fn patrol() -> Self {
        Self::Patrol(Patrol)
    }

    pub fn chase() -> Self {
        Self::Chase(Chase)
    }

    pub fn attack_delay() -> Self {
        Self::AttackDelay(AttackDelay)
    }

    pub fn stone_throw() -> Self {
        Self::StoneThrow(StoneThrow)
    }

    pub fn rush_attack() -> Self {
        Self::RushAttack(RushAttack::default())
    }

    pub fn melee_attack() -> Self {
        Self::MeleeAttack(MeleeAttack)
    }

    pub fn kind(&self) -> StateKind {
        match self {
            Self::Idle(_) => StateKind::Idle,
            Self::Patrol(_) => StateKind::Patrol,
            Self::Chase(_) => StateKind::Chase,
            Self::AttackDelay(_) => StateKind::AttackDelay,
            Self::StoneThrow(_) => StateKind::StoneThrow,
            Self::RushAttack(_) => StateKind::RushAttack,
            Self::MeleeAttack(_) => StateKind::MeleeAttack,
        }
    }
}

/// Arms the fallback that ends an attack when its animation-end event never
/// arrives.
fn arm_attack_timeout(orc: &mut Orc) {
    let attacks = &orc.config().attacks;
    let (timeout, fallback) = (attacks.attack_timeout, attacks.fallback_attack_delay);
    orc.delay_action(timeout, Some(keys::ATTACK_TIMEOUT), move |orc| {
        debug!(
            target: "runtime::fsm",
            category = %orc.category(),
            state = ?orc.current_state(),
            "Attack timed out without an animation event"
        );
        orc.finish_attack(fallback);
    });
}

macro_rules! dispatch {
    ($state:expr, $inner:ident => $body:expr) => {
        match $state {
            OrcState::Idle($inner) => $body,
            OrcState::Patrol($inner) => $body,
            OrcState::Chase($inner) => $body,
            OrcState::AttackDelay($inner) => $body,
            OrcState::StoneThrow($inner) => $body,
            OrcState::RushAttack($inner) => $body,
            OrcState::MeleeAttack($inner) => $body,
        }
    };
}

impl State<Orc> for OrcState {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        let kind = self.kind();
        debug!(
            target: "runtime::fsm",
            category = %orc.category(),
            from = ?orc.state,
            to = %kind,
            "State changed"
        );
        orc.state = Some(kind);
        dispatch!(self, state => state.enter(orc))
    }

    fn execute(&mut self, orc: &mut Orc) {
        dispatch!(self, state => state.execute(orc))
    }

    fn exit(&mut self, orc: &mut Orc) {
        dispatch!(self, state => state.exit(orc))
    }

    fn on_message(&mut self, orc: &mut Orc, telegram: &Telegram) -> bool {
        dispatch!(self, state => state.on_message(orc, telegram))
    }
}
