use npc_core::{MessageType, Payload, Telegram};
use state_machine::State;
use tracing::debug;

use super::OrcState;
use crate::controller::{AttackKind, Orc};

/// Runs after the target and decides when to attack.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Chase;

impl Chase {
    /// First attack, in priority order, whose range window contains
    /// `distance` and whose cooldown has elapsed.
    ///
    /// A stone throw additionally needs the target in sight.
    pub fn select_attack(orc: &Orc, distance: f32) -> Option<AttackKind> {
        AttackKind::PRIORITY.into_iter().find(|&kind| {
            kind.in_range(orc.config(), distance)
                && orc.cooldown_ready(kind)
                && (kind != AttackKind::Throw || orc.is_target_in_sight())
        })
    }
}

impl State<Orc> for Chase {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        orc.set_trigger("Run");
        let speed = orc.config().chase_speed;
        orc.change_speed(speed);
    }

    fn execute(&mut self, orc: &mut Orc) {
        let (Some(target), Some(target_position)) = (orc.target(), orc.target_position()) else {
            orc.change_state(OrcState::idle());
            return;
        };

        orc.look_at_target();

        let distance = orc.position().distance(target_position);
        if distance > orc.config().lose_range {
            debug!(
                target: "runtime::controller",
                category = %orc.category(),
                %target,
                distance,
                "Lost target"
            );
            orc.send_message(
                orc.category(),
                MessageType::TargetLost,
                0.0,
                Some(Payload::Entity(target)),
            );
            orc.change_state(OrcState::idle());
            return;
        }

        if let Some(attack) = Self::select_attack(orc, distance) {
            let next = match attack {
                AttackKind::Melee => OrcState::melee_attack(),
                AttackKind::Rush => OrcState::rush_attack(),
                AttackKind::Throw => OrcState::stone_throw(),
            };
            orc.change_state(next);
            return;
        }

        if distance > orc.config().attack_range {
            orc.set_destination(target_position);
        }
    }
}
