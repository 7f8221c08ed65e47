//! Serial wire protocol for the chassis link
//!
//! # Framing
//!
//! ```text
//! inbound:   {"mode":"PWM","payload":{...}}{"mode":"ros",...}   one JSON object per message
//! outbound:  {"eventType":"chassis",...}\n\n                     feedback + blank-line delimiter
//! ```
//!
//! - **Message boundary**: the end of the JSON value. Whitespace and newlines
//!   between messages are optional, so peers may reuse the `\n\n` delimiter
//! - **Inbound capacity**: 256 bytes per message
//! - **Incomplete messages**: closed by a newline, dropped on read timeout
//! - **Oversized messages**: dropped whole, reported once as `MessageTooLarge`
//! - **Malformed JSON**: reported by [`Document::from_slice`], the caller
//!   keeps its previous state

pub mod document;
pub mod feedback;
pub mod framing;
pub mod ring_buffer;

pub use document::{Document, Payload, DOCUMENT_CAPACITY};
pub use feedback::{
    CflFeedback, Feedback, FeedbackPayload, PwmFeedback, RosFeedback, EVENT_TYPE,
    MESSAGE_DELIMITER,
};
pub use framing::MessageReader;
