use typed_fsm::{state_machine, Transition};

use crate::config::ServoTravel;
use crate::switch::SwitchPosition;

// FSM Context
pub struct ServoContext {
    pub travel: ServoTravel,
    pub sample: u8,           // Latest potentiometer reading, refreshed before each dispatch
    pub command: Option<u16>, // Compare value to write after this dispatch
}

impl ServoContext {
    pub fn new(travel: ServoTravel) -> Self {
        Self { travel, sample: 0, command: None }
    }

    fn command_center(&mut self) {
        self.command = Some(self.travel.center);
    }

    fn command_sample(&mut self) {
        self.command = Some(self.travel.scale(self.sample));
    }
}

// FSM Events
#[derive(Clone, Copy, Debug)]
pub enum ServoEvent {
    SwitchRead(SwitchPosition),
}

// State Machine Definition
state_machine! {
    Name: ServoFsm,
    Context: ServoContext,
    Event: ServoEvent,
    States: {
        // State: Settling, switch not observed yet
        Settling => {
            entry: |ctx| {
                ctx.command = None; // Leave the initializer's center pulse alone
            }
            process: |_ctx, evt| {
                // The first reading always counts as a change of position
                match evt {
                    ServoEvent::SwitchRead(SwitchPosition::Center) => Transition::To(ServoFsm::Center),
                    ServoEvent::SwitchRead(SwitchPosition::Manual) => Transition::To(ServoFsm::Manual),
                }
            }
        },

        // State: Center, written once on entry
        Center => {
            entry: |ctx| {
                ctx.command_center();
            }
            process: |_ctx, evt| {
                match evt {
                    ServoEvent::SwitchRead(SwitchPosition::Center) => Transition::None, // Register holds the center value
                    ServoEvent::SwitchRead(SwitchPosition::Manual) => Transition::To(ServoFsm::Manual),
                }
            }
        },

        // State: Manual, follows the potentiometer on every reading
        Manual => {
            entry: |ctx| {
                ctx.command_sample();
            }
            process: |ctx, evt| {
                match evt {
                    ServoEvent::SwitchRead(SwitchPosition::Center) => Transition::To(ServoFsm::Center),
                    ServoEvent::SwitchRead(SwitchPosition::Manual) => {
                        ctx.command_sample(); // Rewritten even if the sample did not move
                        Transition::None
                    }
                }
            }
        }
    }
}

impl ServoFsm {
    /// Switch position the machine is currently acting on.
    pub fn position(&self) -> Option<SwitchPosition> {
        match self {
            ServoFsm::Settling => None,
            ServoFsm::Center => Some(SwitchPosition::Center),
            ServoFsm::Manual => Some(SwitchPosition::Manual),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAVEL: ServoTravel = ServoTravel::new(1_000, 1_500, 2_000);

    fn started() -> (ServoFsm, ServoContext) {
        let mut ctx = ServoContext::new(TRAVEL);
        let mut fsm = ServoFsm::Settling;
        fsm.init(&mut ctx);
        (fsm, ctx)
    }

    fn read(fsm: &mut ServoFsm, ctx: &mut ServoContext, position: SwitchPosition, sample: u8) -> Option<u16> {
        ctx.sample = sample;
        fsm.dispatch(ctx, &ServoEvent::SwitchRead(position));
        ctx.command.take()
    }

    #[test]
    fn init_commands_nothing() {
        let (fsm, ctx) = started();
        assert!(ctx.command.is_none());
        assert_eq!(fsm.position(), None);
    }

    #[test]
    fn first_center_reading_writes_center() {
        let (mut fsm, mut ctx) = started();
        assert_eq!(read(&mut fsm, &mut ctx, SwitchPosition::Center, 255), Some(1_500));
        assert_eq!(fsm.position(), Some(SwitchPosition::Center));
    }

    #[test]
    fn first_manual_reading_writes_scaled_sample() {
        let (mut fsm, mut ctx) = started();
        assert_eq!(read(&mut fsm, &mut ctx, SwitchPosition::Manual, 0), Some(1_000));
        assert_eq!(fsm.position(), Some(SwitchPosition::Manual));
    }

    #[test]
    fn center_is_edge_triggered() {
        let (mut fsm, mut ctx) = started();
        assert_eq!(read(&mut fsm, &mut ctx, SwitchPosition::Center, 10), Some(1_500));
        for sample in [10, 99, 255] {
            assert_eq!(read(&mut fsm, &mut ctx, SwitchPosition::Center, sample), None);
        }
    }

    #[test]
    fn manual_is_level_triggered() {
        let (mut fsm, mut ctx) = started();
        for _ in 0..5 {
            assert_eq!(read(&mut fsm, &mut ctx, SwitchPosition::Manual, 255), Some(2_000));
        }
    }

    #[test]
    fn return_to_center_ignores_sample() {
        let (mut fsm, mut ctx) = started();
        read(&mut fsm, &mut ctx, SwitchPosition::Manual, 255);
        assert_eq!(read(&mut fsm, &mut ctx, SwitchPosition::Center, 255), Some(1_500));
    }
}
