//! Control loop
//!
//! One iteration reads the mode switch and the latest potentiometer sample,
//! runs them through [`ServoFsm`] and writes the resulting compare value, if
//! any, to the servo PWM channel.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::config::ServoTravel;
use crate::sample::AnalogSample;
use crate::servo_fsm::{ServoContext, ServoEvent, ServoFsm};
use crate::switch::SwitchPosition;

/// Failure of one of the pins the loop drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlError<S, P> {
    Switch(S),
    Pwm(P),
}

/// Outcome of a single iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Step {
    pub position: SwitchPosition,
    /// Set when this reading moved the controller into a new mode.
    pub mode_changed: bool,
    /// Compare value written to the PWM channel, if any.
    pub written: Option<u16>,
}

pub struct ControlLoop<'a, S, P> {
    switch: S,
    servo: P,
    sample: &'a AnalogSample,
    fsm: ServoFsm,
    ctx: ServoContext,
}

impl<'a, S, P> ControlLoop<'a, S, P>
where
    S: InputPin,
    P: SetDutyCycle,
{
    /// Builds the loop without touching the PWM channel, so the center pulse
    /// programmed at init stays in place until the first [`step`](Self::step).
    pub fn new(switch: S, servo: P, sample: &'a AnalogSample, travel: ServoTravel) -> Self {
        let mut ctx = ServoContext::new(travel);
        let mut fsm = ServoFsm::Settling;
        fsm.init(&mut ctx);

        Self { switch, servo, sample, fsm, ctx }
    }

    pub fn step(&mut self) -> Result<Step, ControlError<S::Error, P::Error>> {
        let position = SwitchPosition::read(&mut self.switch).map_err(ControlError::Switch)?;
        let previous = self.fsm.position();

        self.ctx.sample = self.sample.load();
        self.fsm.dispatch(&mut self.ctx, &ServoEvent::SwitchRead(position));

        let written = self.ctx.command.take();
        if let Some(compare) = written {
            self.servo.set_duty_cycle(compare).map_err(ControlError::Pwm)?;
        }

        Ok(Step {
            position,
            mode_changed: previous != self.fsm.position(),
            written,
        })
    }

    /// Mode the controller is in, `None` before the first step.
    pub fn position(&self) -> Option<SwitchPosition> {
        self.fsm.position()
    }

    pub fn release(self) -> (S, P) {
        (self.switch, self.servo)
    }
}
