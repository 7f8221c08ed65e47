//! CFL mode: closed-loop wheel angular velocity targets

use super::{assign, OperationalMode};
use crate::core::actuator::Actuator;
use crate::core::types::WheelSet;
use crate::wire::{CflFeedback, Document, Feedback};

/// Per-wheel angular velocity control (rad/s)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CflMode {
    velocities: WheelSet<f64>,
}

impl CflMode {
    pub fn wheel_velocities(&self) -> WheelSet<f64> {
        self.velocities
    }
}

impl OperationalMode for CflMode {
    const NAME: &'static str = "CFL";

    fn process(&mut self, doc: &Document<'_>) {
        let payload = doc.payload();
        assign(Self::NAME, "fl", &mut self.velocities.fl, payload.number("fl"));
        assign(Self::NAME, "fr", &mut self.velocities.fr, payload.number("fr"));
        assign(Self::NAME, "rl", &mut self.velocities.rl, payload.number("rl"));
        assign(Self::NAME, "rr", &mut self.velocities.rr, payload.number("rr"));
    }

    fn execute<A: Actuator>(&self, actuator: &mut A) {
        actuator.apply_wheel_velocities(self.velocities);
    }

    fn feedback(&self) -> Feedback {
        Feedback::new(
            Self::NAME,
            CflFeedback {
                fl_ang_v: self.velocities.fl,
                fr_ang_v: self.velocities.fr,
                rl_ang_v: self.velocities.rl,
                rr_ang_v: self.velocities.rr,
            },
        )
    }
}
