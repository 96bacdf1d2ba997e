use npc_core::Telegram;
use state_machine::State;

use super::{OrcState, keys};
use crate::controller::Orc;

/// Recovery pause between an attack and the next chase.
///
/// The pause length is the delay reported by the attack's animation-end
/// event. An aborted attack skips the pause entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackDelay;

impl State<Orc> for AttackDelay {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        if orc.take_not_attack() {
            orc.change_state(OrcState::chase());
            return;
        }

        orc.set_trigger("Idle");
        let delay = orc.attack_delay();
        orc.delay_action(delay, Some(keys::ATTACK_DELAY), |orc| {
            orc.change_state(OrcState::chase());
        });
    }

    fn execute(&mut self, orc: &mut Orc) {
        orc.look_at_target();
    }

    fn exit(&mut self, orc: &mut Orc) {
        orc.cancel_action(keys::ATTACK_DELAY);
    }
}
