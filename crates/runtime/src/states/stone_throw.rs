use npc_core::Telegram;
use state_machine::State;

use super::arm_attack_timeout;
use super::keys;
use crate::controller::{AttackKind, Orc};

/// Ranged attack: the stone leaves the hand partway through the animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StoneThrow;

impl State<Orc> for StoneThrow {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        let in_range = orc
            .distance_to_target()
            .is_some_and(|distance| AttackKind::Throw.in_range(orc.config(), distance));
        if !in_range || !orc.is_target_in_sight() {
            orc.abort_attack();
            return;
        }

        orc.look_at_target();
        orc.set_trigger("Throw");
        orc.start_cooldown(AttackKind::Throw);

        let release = orc.config().attacks.stone_release_time;
        orc.delay_action(release, Some(keys::STONE_RELEASE), |orc| {
            orc.throw_stone();
        });
        arm_attack_timeout(orc);
    }

    fn execute(&mut self, orc: &mut Orc) {
        orc.look_at_target();
    }

    fn exit(&mut self, orc: &mut Orc) {
        orc.cancel_action(keys::STONE_RELEASE);
        orc.cancel_action(keys::ATTACK_TIMEOUT);
    }
}
