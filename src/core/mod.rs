//! Core abstractions shared by the operational modes.
//!
//! - [`actuator::Actuator`]: Trait to implement for real chassis hardware
//! - [`types`]: Per-wheel and twist value types

pub mod actuator;
pub mod types;
