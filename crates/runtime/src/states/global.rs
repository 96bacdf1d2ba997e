use npc_core::{MessageType, SoundCue, Telegram};
use state_machine::State;
use tracing::debug;

use super::OrcState;
use crate::controller::Orc;

/// Always-on layer executed before the current state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrcGlobalState;

impl State<Orc> for OrcGlobalState {
    type Message = Telegram;

    fn execute(&mut self, orc: &mut Orc) {
        orc.record_distance();
    }

    fn on_message(&mut self, orc: &mut Orc, telegram: &Telegram) -> bool {
        match telegram.message {
            MessageType::Damaged => {
                orc.play(SoundCue::Damage);
                if let Some(attacker) = telegram.entity() {
                    orc.set_target(Some(attacker));
                }
                if orc.current_state().is_some_and(|state| state.is_calm()) {
                    orc.change_state(OrcState::chase());
                }
                true
            }
            MessageType::Taunt => {
                let Some(taunter) = telegram.entity() else {
                    return false;
                };
                debug!(
                    target: "runtime::controller",
                    category = %orc.category(),
                    %taunter,
                    "Taunted"
                );
                orc.set_target(Some(taunter));
                true
            }
            MessageType::Alert | MessageType::TargetLost => false,
        }
    }
}
