//! PWM mode: raw duty cycle per wheel

use super::{assign, OperationalMode};
use crate::core::actuator::Actuator;
use crate::core::types::WheelSet;
use crate::wire::{Document, Feedback, PwmFeedback};

/// Direct duty-cycle control
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PwmMode {
    duty: WheelSet<i16>,
}

impl PwmMode {
    pub fn duty_cycles(&self) -> WheelSet<i16> {
        self.duty
    }
}

impl OperationalMode for PwmMode {
    const NAME: &'static str = "PWM";

    fn process(&mut self, doc: &Document<'_>) {
        let payload = doc.payload();
        assign(Self::NAME, "fl", &mut self.duty.fl, payload.integer("fl"));
        assign(Self::NAME, "fr", &mut self.duty.fr, payload.integer("fr"));
        assign(Self::NAME, "rl", &mut self.duty.rl, payload.integer("rl"));
        assign(Self::NAME, "rr", &mut self.duty.rr, payload.integer("rr"));
    }

    fn execute<A: Actuator>(&self, actuator: &mut A) {
        actuator.apply_duty_cycles(self.duty);
    }

    fn feedback(&self) -> Feedback {
        Feedback::new(
            Self::NAME,
            PwmFeedback {
                fl_pwm: self.duty.fl,
                fr_pwm: self.duty.fr,
                rl_pwm: self.duty.rl,
                rr_pwm: self.duty.rr,
            },
        )
    }
}
