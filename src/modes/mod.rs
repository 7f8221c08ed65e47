//! Chassis operational modes
//!
//! Each mode is a different way of commanding the drive train. All of them
//! implement [`OperationalMode`] and are driven by the
//! [`ModeRunner`](crate::runner::ModeRunner).
//!
//! ## Available Modes
//!
//! | Mode | Command payload | State |
//! |------|-----------------|-------|
//! | **PWM** | `fl`, `fr`, `rl`, `rr` integers | raw duty cycle per wheel |
//! | **CFL** | `fl`, `fr`, `rl`, `rr` numbers | wheel angular velocity (rad/s) |
//! | **ROS** | `linear`, `angular` 3-arrays | body twist (m/s, rad/s) |
//!
//! ## Field Updates
//!
//! A payload field that is missing, of the wrong type or out of range leaves
//! the corresponding state untouched. Other fields of the same message are
//! still applied.

pub mod cfl;
pub mod pwm;
pub mod ros;

pub use cfl::CflMode;
pub use pwm::PwmMode;
pub use ros::RosMode;

use crate::core::actuator::Actuator;
use crate::wire::{Document, Feedback};
use std::fmt;

/// Operational mode contract
///
/// ## Lifecycle
///
/// One instance per mode lives for the whole process. State changes only in
/// `process()`; `execute()` and `feedback()` read it.
pub trait OperationalMode {
    /// Name reported in feedback (uppercase)
    const NAME: &'static str;

    /// Update state from a command document
    fn process(&mut self, doc: &Document<'_>);

    /// Hand the current set-point to the actuator (called every tick)
    fn execute<A: Actuator>(&self, actuator: &mut A);

    /// Status snapshot of the current state
    fn feedback(&self) -> Feedback;
}

/// Identifies one of the operational modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModeKind {
    #[default]
    Pwm,
    Cfl,
    Ros,
}

impl ModeKind {
    pub const ALL: [ModeKind; 3] = [ModeKind::Pwm, ModeKind::Cfl, ModeKind::Ros];

    /// Resolve a requested mode name
    ///
    /// Only the all-lowercase and all-uppercase spellings are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pwm" | "PWM" => Some(ModeKind::Pwm),
            "cfl" | "CFL" => Some(ModeKind::Cfl),
            "ros" | "ROS" => Some(ModeKind::Ros),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ModeKind::Pwm => PwmMode::NAME,
            ModeKind::Cfl => CflMode::NAME,
            ModeKind::Ros => RosMode::NAME,
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Overwrite `field` only when a valid value was extracted
#[inline]
fn assign<T>(mode: &str, key: &str, field: &mut T, value: Option<T>) {
    match value {
        Some(v) => *field = v,
        None => log::trace!("{}: payload field '{}' missing or invalid, keeping", mode, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_both_spellings() {
        for kind in ModeKind::ALL {
            let upper = kind.name();
            let lower = upper.to_lowercase();
            assert_eq!(ModeKind::from_name(upper), Some(kind));
            assert_eq!(ModeKind::from_name(&lower), Some(kind));
        }
    }

    #[test]
    fn test_from_name_rejects_other_spellings() {
        for name in ["Pwm", "pWm", "Cfl", "Ros", "", " pwm", "pwm ", "drive"] {
            assert_eq!(ModeKind::from_name(name), None, "{:?}", name);
        }
    }

    #[test]
    fn test_default_is_pwm() {
        assert_eq!(ModeKind::default(), ModeKind::Pwm);
        assert_eq!(ModeKind::Pwm.to_string(), "PWM");
    }
}
