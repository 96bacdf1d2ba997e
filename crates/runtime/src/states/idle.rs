use npc_core::{MessageType, Telegram};
use state_machine::State;

use super::{OrcState, keys};
use crate::controller::Orc;

/// Stands still, picks the next wander destination and waits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Idle;

impl State<Orc> for Idle {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        orc.set_trigger("Idle");

        let origin = orc.position();
        let radius = orc.config().wander_radius;
        let destination = orc.random_nav_point(origin, radius);
        orc.set_patrol_destination(destination);

        let duration = orc.config().idle_duration;
        orc.delay_action(duration, Some(keys::IDLE), |orc| {
            orc.change_state(OrcState::patrol());
        });
    }

    fn execute(&mut self, orc: &mut Orc) {
        if orc.is_target_in_sight() {
            orc.change_state(OrcState::chase());
        }
    }

    fn exit(&mut self, orc: &mut Orc) {
        orc.cancel_action(keys::IDLE);
    }

    fn on_message(&mut self, orc: &mut Orc, telegram: &Telegram) -> bool {
        investigate_alert(orc, telegram)
    }
}

/// Sends a calm orc to the point carried by an `Alert`.
pub(super) fn investigate_alert(orc: &mut Orc, telegram: &Telegram) -> bool {
    if telegram.message != MessageType::Alert {
        return false;
    }
    let Some(point) = telegram.point() else {
        return false;
    };

    orc.set_patrol_destination(point);
    orc.change_state(OrcState::patrol());
    true
}
