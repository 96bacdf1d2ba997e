use npc_core::Telegram;
use state_machine::State;

use super::arm_attack_timeout;
use super::keys;
use crate::controller::{AttackKind, Orc};

/// Close-range swing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeleeAttack;

impl State<Orc> for MeleeAttack {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        let in_range = orc
            .distance_to_target()
            .is_some_and(|distance| AttackKind::Melee.in_range(orc.config(), distance));
        if !in_range {
            orc.abort_attack();
            return;
        }

        orc.look_at_target();
        orc.set_trigger("MeleeAttack");
        orc.start_cooldown(AttackKind::Melee);
        arm_attack_timeout(orc);
    }

    fn execute(&mut self, orc: &mut Orc) {
        orc.look_at_target();
    }

    fn exit(&mut self, orc: &mut Orc) {
        orc.cancel_action(keys::ATTACK_TIMEOUT);
    }
}
