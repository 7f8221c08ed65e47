//! ROS mode: body twist command

use super::{assign, OperationalMode};
use crate::core::actuator::Actuator;
use crate::core::types::Twist;
use crate::wire::{Document, Feedback, RosFeedback};

/// Linear (m/s) and angular (rad/s) velocity control
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RosMode {
    twist: Twist,
}

impl RosMode {
    pub fn twist(&self) -> Twist {
        self.twist
    }
}

impl OperationalMode for RosMode {
    const NAME: &'static str = "ROS";

    fn process(&mut self, doc: &Document<'_>) {
        let payload = doc.payload();
        for i in 0..3 {
            assign(
                Self::NAME,
                "linear",
                &mut self.twist.linear[i],
                payload.element("linear", i),
            );
            assign(
                Self::NAME,
                "angular",
                &mut self.twist.angular[i],
                payload.element("angular", i),
            );
        }
    }

    fn execute<A: Actuator>(&self, actuator: &mut A) {
        actuator.apply_twist(self.twist);
    }

    fn feedback(&self) -> Feedback {
        Feedback::new(
            Self::NAME,
            RosFeedback {
                linear_v: self.twist.linear,
                angular_v: self.twist.angular,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::FeedbackPayload;

    fn doc(json: &str) -> Document<'_> {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_full_payload() {
        let mut mode = RosMode::default();
        mode.process(&doc(
            r#"{"payload":{"linear":[1.0,0.0,0.0],"angular":[0.0,0.0,0.5]}}"#,
        ));
        assert_eq!(mode.twist().linear, [1.0, 0.0, 0.0]);
        assert_eq!(mode.twist().angular, [0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_short_array_updates_prefix_only() {
        let mut mode = RosMode::default();
        mode.process(&doc(
            r#"{"payload":{"linear":[1.0,2.0,3.0],"angular":[4.0,5.0,6.0]}}"#,
        ));
        mode.process(&doc(r#"{"payload":{"linear":[-1.0],"angular":[null,-5.0]}}"#));
        assert_eq!(mode.twist().linear, [-1.0, 2.0, 3.0]);
        assert_eq!(mode.twist().angular, [4.0, -5.0, 6.0]);
    }

    #[test]
    fn test_non_array_ignored() {
        let mut mode = RosMode::default();
        mode.process(&doc(r#"{"payload":{"linear":0.3,"angular":{"z":1.0}}}"#));
        assert_eq!(mode.twist(), Twist::default());
    }

    #[test]
    fn test_feedback_shape() {
        let mut mode = RosMode::default();
        mode.process(&doc(r#"{"payload":{"linear":[0.1,0.2,0.3],"angular":[0.4,0.5,0.6]}}"#));
        let feedback = mode.feedback();
        assert_eq!(feedback.mode, "ROS");
        assert_eq!(
            feedback.payload,
            FeedbackPayload::Ros(RosFeedback {
                linear_v: [0.1, 0.2, 0.3],
                angular_v: [0.4, 0.5, 0.6]
            })
        );
    }
}
