//! Outbound feedback document
//!
//! Every feedback message has the same two-level shape:
//!
//! ```json
//! {"eventType":"chassis","mode":"PWM","payload":{"fl_pwm":100,"fr_pwm":-100,"rl_pwm":50,"rr_pwm":-50}}
//! ```
//!
//! Field sets are fixed per mode, so the encoded size is bounded by
//! construction.

use crate::error::Result;
use serde::Serialize;

/// Value of the `eventType` field, used by gateways to route the stream
pub const EVENT_TYPE: &str = "chassis";

/// Terminator written after every feedback message
pub const MESSAGE_DELIMITER: &[u8] = b"\n\n";

/// Status snapshot of the active mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feedback {
    #[serde(rename = "eventType")]
    pub event_type: &'static str,
    pub mode: &'static str,
    pub payload: FeedbackPayload,
}

/// Mode-specific part of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeedbackPayload {
    Pwm(PwmFeedback),
    Cfl(CflFeedback),
    Ros(RosFeedback),
}

/// PWM mode payload: duty cycle per wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PwmFeedback {
    pub fl_pwm: i16,
    pub fr_pwm: i16,
    pub rl_pwm: i16,
    pub rr_pwm: i16,
}

/// CFL mode payload: angular velocity per wheel (rad/s)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CflFeedback {
    #[serde(rename = "fl_angV")]
    pub fl_ang_v: f64,
    #[serde(rename = "fr_angV")]
    pub fr_ang_v: f64,
    #[serde(rename = "rl_angV")]
    pub rl_ang_v: f64,
    #[serde(rename = "rr_angV")]
    pub rr_ang_v: f64,
}

/// ROS mode payload: twist as two 3-vectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosFeedback {
    pub linear_v: [f64; 3],
    pub angular_v: [f64; 3],
}

impl From<PwmFeedback> for FeedbackPayload {
    fn from(payload: PwmFeedback) -> Self {
        Self::Pwm(payload)
    }
}

impl From<CflFeedback> for FeedbackPayload {
    fn from(payload: CflFeedback) -> Self {
        Self::Cfl(payload)
    }
}

impl From<RosFeedback> for FeedbackPayload {
    fn from(payload: RosFeedback) -> Self {
        Self::Ros(payload)
    }
}

impl Feedback {
    pub fn new(mode: &'static str, payload: impl Into<FeedbackPayload>) -> Self {
        Self {
            event_type: EVENT_TYPE,
            mode,
            payload: payload.into(),
        }
    }

    /// Append the encoded message and its delimiter to `buf`
    ///
    /// `buf` keeps its capacity between calls, so a reused buffer does not
    /// allocate once it has grown to the largest message.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        serde_json::to_writer(&mut *buf, self)?;
        buf.extend_from_slice(MESSAGE_DELIMITER);
        Ok(())
    }

    /// Encode without the delimiter
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
