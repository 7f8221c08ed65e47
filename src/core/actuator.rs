//! Actuator trait definition

use crate::core::types::{Twist, WheelSet};

/// Hardware abstraction for the chassis drive train
///
/// Each operational mode hands its current set-point to exactly one of these
/// methods on every control tick. Implementations must not block: the control
/// loop calls them from its only thread.
///
/// All methods default to doing nothing, so an implementation only needs to
/// override the set-points its hardware understands.
pub trait Actuator {
    /// Apply raw motor duty cycles
    fn apply_duty_cycles(&mut self, _duty: WheelSet<i16>) {}

    /// Track per-wheel angular velocity targets (rad/s)
    fn apply_wheel_velocities(&mut self, _velocities: WheelSet<f64>) {}

    /// Track a body twist command
    fn apply_twist(&mut self, _twist: Twist) {}
}

/// Actuator used until a hardware layer is plugged in
#[derive(Debug, Clone, Copy, Default)]
pub struct NullActuator;

impl Actuator for NullActuator {}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    fn apply_duty_cycles(&mut self, duty: WheelSet<i16>) {
        (**self).apply_duty_cycles(duty);
    }

    fn apply_wheel_velocities(&mut self, velocities: WheelSet<f64>) {
        (**self).apply_wheel_velocities(velocities);
    }

    fn apply_twist(&mut self, twist: Twist) {
        (**self).apply_twist(twist);
    }
}
