use glam::Vec3;
use npc_core::Telegram;
use state_machine::State;

use super::arm_attack_timeout;
use super::keys;
use crate::controller::{AttackKind, Orc};

/// Straight-line charge at the point where the target stood when the rush
/// started.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RushAttack {
    /// Remaining charge goal; cleared once reached.
    charge_point: Option<Vec3>,
}

impl RushAttack {
    pub fn charge_point(&self) -> Option<Vec3> {
        self.charge_point
    }
}

impl State<Orc> for RushAttack {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        let Some(target) = orc.target_position() else {
            orc.abort_attack();
            return;
        };
        let distance = orc.position().distance(target);
        if !AttackKind::Rush.in_range(orc.config(), distance) {
            orc.abort_attack();
            return;
        }

        self.charge_point = Some(target);
        orc.set_trigger("Rush");
        orc.start_cooldown(AttackKind::Rush);
        arm_attack_timeout(orc);
    }

    fn execute(&mut self, orc: &mut Orc) {
        let Some(goal) = self.charge_point else {
            return;
        };

        let mut to_goal = goal - orc.position();
        to_goal.y = 0.0;
        let step = orc.config().attacks.rush_speed * orc.delta_time();
        if to_goal.length() <= step {
            orc.move_by(to_goal);
            self.charge_point = None;
        } else {
            orc.move_by(to_goal.normalize() * step);
        }
    }

    fn exit(&mut self, orc: &mut Orc) {
        orc.cancel_action(keys::ATTACK_TIMEOUT);
    }
}
