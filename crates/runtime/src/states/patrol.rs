use npc_core::Telegram;
use state_machine::State;

use super::OrcState;
use super::idle::investigate_alert;
use crate::controller::Orc;

/// Walks to the patrol destination.
///
/// Stuck detection for this state runs on the fixed tick in the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Patrol;

impl State<Orc> for Patrol {
    type Message = Telegram;

    fn enter(&mut self, orc: &mut Orc) {
        orc.set_trigger("Walk");
        let speed = orc.config().move_speed;
        orc.change_speed(speed);
        let destination = orc.patrol_destination();
        orc.set_destination(destination);
    }

    fn execute(&mut self, orc: &mut Orc) {
        if orc.is_target_in_sight() {
            orc.change_state(OrcState::chase());
            return;
        }

        // A pending path is never treated as arrival.
        let tolerance = orc.config().arrival_tolerance;
        if orc.remaining_distance().within(tolerance) {
            orc.change_state(OrcState::idle());
        }
    }

    fn on_message(&mut self, orc: &mut Orc, telegram: &Telegram) -> bool {
        investigate_alert(orc, telegram)
    }
}
