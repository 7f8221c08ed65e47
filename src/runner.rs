//! Mode Runner
//!
//! Owns one instance of every operational mode and routes the control loop's
//! calls to whichever is active.
//!
//! ## Responsibilities
//!
//! - Resolve mode names to a [`ModeKind`] once, at selection time
//! - Forward `parse` / `run` / `generate_feedback` to the active mode
//! - Keep every mode's state across switches (switching never resets)
//!
//! Dispatch is a `match` on the selector, so the per-tick path is O(1) and
//! allocation-free.

use crate::core::actuator::{Actuator, NullActuator};
use crate::modes::{CflMode, ModeKind, OperationalMode, PwmMode, RosMode};
use crate::wire::{Document, Feedback};

/// Mode registry and dispatcher
pub struct ModeRunner<A: Actuator = NullActuator> {
    active: ModeKind,
    pwm: PwmMode,
    cfl: CflMode,
    ros: RosMode,
    actuator: A,
}

impl ModeRunner<NullActuator> {
    /// Runner with no hardware attached, PWM active
    pub fn new() -> Self {
        Self::with_actuator(NullActuator)
    }
}

impl Default for ModeRunner<NullActuator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Actuator> ModeRunner<A> {
    /// Runner driving `actuator`, PWM active
    pub fn with_actuator(actuator: A) -> Self {
        Self {
            active: ModeKind::default(),
            pwm: PwmMode::default(),
            cfl: CflMode::default(),
            ros: RosMode::default(),
            actuator,
        }
    }

    /// Switch to the mode named `name`
    ///
    /// Returns `false` and keeps the current mode when the name is absent or
    /// not one of the accepted spellings.
    pub fn select_mode(&mut self, name: Option<&str>) -> bool {
        let Some(name) = name else {
            return false;
        };

        match ModeKind::from_name(name) {
            Some(kind) => {
                self.select(kind);
                true
            }
            None => {
                log::warn!("Unknown mode '{}', staying in {}", name, self.active);
                false
            }
        }
    }

    /// Switch to `kind` (reselecting the active mode is a no-op)
    pub fn select(&mut self, kind: ModeKind) {
        if kind == self.active {
            log::debug!("Mode {} already active", kind);
            return;
        }
        log::info!("Mode transition: {} -> {}", self.active, kind);
        self.active = kind;
    }

    /// Feed a command document to the active mode
    pub fn parse(&mut self, doc: &Document<'_>) {
        match self.active {
            ModeKind::Pwm => self.pwm.process(doc),
            ModeKind::Cfl => self.cfl.process(doc),
            ModeKind::Ros => self.ros.process(doc),
        }
    }

    /// Run the active mode's control action
    #[inline]
    pub fn run(&mut self) {
        match self.active {
            ModeKind::Pwm => self.pwm.execute(&mut self.actuator),
            ModeKind::Cfl => self.cfl.execute(&mut self.actuator),
            ModeKind::Ros => self.ros.execute(&mut self.actuator),
        }
    }

    /// Status snapshot of the active mode
    pub fn generate_feedback(&self) -> Feedback {
        match self.active {
            ModeKind::Pwm => self.pwm.feedback(),
            ModeKind::Cfl => self.cfl.feedback(),
            ModeKind::Ros => self.ros.feedback(),
        }
    }

    pub fn active(&self) -> ModeKind {
        self.active
    }

    pub fn pwm(&self) -> &PwmMode {
        &self.pwm
    }

    pub fn cfl(&self) -> &CflMode {
        &self.cfl
    }

    pub fn ros(&self) -> &RosMode {
        &self.ros
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Twist, WheelSet};
    use crate::wire::{CflFeedback, FeedbackPayload, PwmFeedback};

    /// Records which set-point each tick delivered
    #[derive(Default)]
    struct RecordingActuator {
        duty: Vec<WheelSet<i16>>,
        velocities: Vec<WheelSet<f64>>,
        twists: Vec<Twist>,
    }

    impl Actuator for RecordingActuator {
        fn apply_duty_cycles(&mut self, duty: WheelSet<i16>) {
            self.duty.push(duty);
        }

        fn apply_wheel_velocities(&mut self, velocities: WheelSet<f64>) {
            self.velocities.push(velocities);
        }

        fn apply_twist(&mut self, twist: Twist) {
            self.twists.push(twist);
        }
    }

    fn doc(json: &str) -> Document<'_> {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_default_mode_is_pwm() {
        let runner = ModeRunner::new();
        assert_eq!(runner.active(), ModeKind::Pwm);
        assert_eq!(runner.generate_feedback().mode, "PWM");
    }

    #[test]
    fn test_select_each_mode_both_spellings() {
        let mut runner = ModeRunner::new();
        for kind in ModeKind::ALL {
            for name in [kind.name().to_string(), kind.name().to_lowercase()] {
                // Start from a different mode each time
                let other = ModeKind::ALL.into_iter().find(|k| *k != kind).unwrap();
                runner.select(other);

                assert!(runner.select_mode(Some(name.as_str())));
                assert_eq!(runner.active(), kind);
                assert_eq!(runner.generate_feedback().mode, kind.name());
            }
        }
    }

    #[test]
    fn test_unknown_names_keep_selection() {
        let mut runner = ModeRunner::new();
        assert!(runner.select_mode(Some("cfl")));

        for name in [Some("Cfl"), Some("Pwm"), Some("xyz"), Some(""), None] {
            assert!(!runner.select_mode(name));
            assert_eq!(runner.active(), ModeKind::Cfl);
            assert_eq!(runner.generate_feedback().mode, "CFL");
        }
    }

    #[test]
    fn test_parse_goes_to_active_mode_only() {
        let mut runner = ModeRunner::new();
        runner.parse(&doc(r#"{"payload":{"fl":7,"fr":7,"rl":7,"rr":7}}"#));
        assert_eq!(runner.pwm().duty_cycles(), WheelSet::new(7, 7, 7, 7));
        assert_eq!(runner.cfl().wheel_velocities(), WheelSet::default());
    }

    #[test]
    fn test_switching_preserves_mode_state() {
        let mut runner = ModeRunner::new();
        runner.parse(&doc(r#"{"payload":{"fl":1,"fr":2,"rl":3,"rr":4}}"#));

        runner.select_mode(Some("CFL"));
        runner.parse(&doc(r#"{"payload":{"fl":0.5,"fr":0.5,"rl":0.5,"rr":0.5}}"#));

        runner.select_mode(Some("pwm"));
        assert_eq!(
            runner.generate_feedback().payload,
            FeedbackPayload::Pwm(PwmFeedback {
                fl_pwm: 1,
                fr_pwm: 2,
                rl_pwm: 3,
                rr_pwm: 4
            })
        );

        // Self-transition keeps state too
        runner.select_mode(Some("PWM"));
        assert_eq!(runner.pwm().duty_cycles(), WheelSet::new(1, 2, 3, 4));

        runner.select_mode(Some("cfl"));
        assert_eq!(
            runner.generate_feedback().payload,
            FeedbackPayload::Cfl(CflFeedback {
                fl_ang_v: 0.5,
                fr_ang_v: 0.5,
                rl_ang_v: 0.5,
                rr_ang_v: 0.5
            })
        );
    }

    #[test]
    fn test_run_is_idempotent() {
        let mut runner = ModeRunner::with_actuator(RecordingActuator::default());
        runner.select_mode(Some("ros"));
        runner.parse(&doc(r#"{"payload":{"linear":[0.2,0.0,0.0],"angular":[0.0,0.0,0.1]}}"#));

        let before = runner.generate_feedback();
        for _ in 0..10 {
            runner.run();
        }
        assert_eq!(runner.generate_feedback(), before);
        assert_eq!(runner.actuator().twists.len(), 10);
        assert!(runner.actuator().twists.iter().all(|t| *t == runner.ros().twist()));
    }

    #[test]
    fn test_run_targets_active_mode() {
        let mut runner = ModeRunner::with_actuator(RecordingActuator::default());
        runner.parse(&doc(r#"{"payload":{"fl":10,"fr":20,"rl":30,"rr":40}}"#));
        runner.run();

        runner.select_mode(Some("CFL"));
        runner.run();
        runner.run();

        let actuator = runner.actuator();
        assert_eq!(actuator.duty, vec![WheelSet::new(10, 20, 30, 40)]);
        assert_eq!(actuator.velocities.len(), 2);
        assert!(actuator.twists.is_empty());
    }

    #[test]
    fn test_borrowed_actuator() {
        let mut recorder = RecordingActuator::default();
        {
            let mut runner = ModeRunner::with_actuator(&mut recorder);
            runner.run();
        }
        assert_eq!(recorder.duty.len(), 1);
    }
}
