//! Chassis Controller - mode-switchable drive controller over a serial link
//!
//! Receives one JSON command per line, routes it to the active operational
//! mode (PWM duty cycles, CFL wheel velocities or ROS twist) and answers every
//! iteration with a JSON feedback snapshot.
//!
//! ## Modules
//!
//! - [`modes`]: the operational modes and their shared trait
//! - [`runner`]: mode registry and dispatch
//! - [`controller`]: the control loop
//! - [`wire`]: inbound documents, feedback encoding, line framing
//! - [`transport`]: serial and mock byte transports
//! - [`core`]: actuator hook and shared value types

pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod modes;
pub mod runner;
pub mod transport;
pub mod wire;

// Re-export commonly used types
pub use config::Config;
pub use controller::ChassisController;
pub use error::{Error, Result};
pub use modes::{ModeKind, OperationalMode};
pub use runner::ModeRunner;
