//! Gesture-driven state machine
//!
//! ```text
//!   Idle ──began──► Tracking ──ended (offset > threshold)──► Finishing ──┐
//!    ▲                 │  └───ended (offset <= threshold)──► Cancelling ─┤
//!    │                 └─────failed / cancelled────────────► Cancelling ─┤
//!    └──────────────────────────── complete ─────────────────────────────┘
//! ```
//!
//! The machine is a plain value. Feeding it an event returns what the
//! interactive transition should do next; it performs no side effects.

use navigator_core::Point;

use crate::gesture::{Axis, GestureEvent, GestureSample};

/// Phase of an interactive transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No gesture in progress
    #[default]
    Idle,
    /// Finger down, progress follows the finger
    Tracking,
    /// Released past the threshold, completing
    Finishing,
    /// Released short of the threshold or aborted, reverting
    Cancelling,
}

/// What an event asks the transition to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// First interactive frame: start the underlying show/dismiss live
    Begin {
        /// Velocity at recognition
        velocity: Point,
    },
    /// Set the percent-driven progress
    Update(f64),
    /// Commit the transition
    Finish,
    /// Revert the transition
    Cancel,
    /// Event does not apply in the current phase
    Ignored,
}

/// Interactive transition state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureMachine {
    phase: GesturePhase,
    start: Point,
    percent: f64,
}

impl GestureMachine {
    /// Create an idle machine
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Whether a finger is driving the transition
    pub fn is_interactive(&self) -> bool {
        self.phase == GesturePhase::Tracking
    }

    /// Location where the gesture began
    pub fn start(&self) -> Point {
        self.start
    }

    /// Last reported progress
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Feed one recognizer event
    pub fn handle(&mut self, event: GestureEvent, axis: Axis) -> GestureOutcome {
        match (self.phase, event) {
            (GesturePhase::Idle, GestureEvent::Began(sample)) => {
                self.phase = GesturePhase::Tracking;
                self.start = sample.location;
                self.percent = 0.0;
                GestureOutcome::Begin {
                    velocity: sample.velocity,
                }
            }
            (GesturePhase::Tracking, GestureEvent::Changed(sample)) => {
                self.percent = progress(&sample, self.start, axis) / 2.0;
                GestureOutcome::Update(self.percent)
            }
            (GesturePhase::Tracking, GestureEvent::Ended(sample)) => {
                if commits(&sample, self.start, axis) {
                    self.phase = GesturePhase::Finishing;
                    GestureOutcome::Finish
                } else {
                    self.phase = GesturePhase::Cancelling;
                    GestureOutcome::Cancel
                }
            }
            (GesturePhase::Tracking, GestureEvent::Failed | GestureEvent::Cancelled) => {
                self.phase = GesturePhase::Cancelling;
                GestureOutcome::Cancel
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// The transition finished or reverted; back to idle
    pub fn complete(&mut self) {
        *self = Self::default();
    }
}

/// Completion ratio before halving
fn progress(sample: &GestureSample, start: Point, axis: Axis) -> f64 {
    match axis {
        Axis::Vertical if sample.surface.height > 0.0 => {
            sample.translation.y / sample.surface.height
        }
        Axis::Horizontal if sample.surface.width > 0.0 => {
            (sample.translation.x + start.x) / sample.surface.width
        }
        _ => 0.0,
    }
}

/// Whether a release commits the transition
fn commits(sample: &GestureSample, start: Point, axis: Axis) -> bool {
    match axis {
        Axis::Vertical => {
            let offset = sample
                .velocity
                .y
                .max(sample.translation.y - start.y / 2.0);
            offset > sample.surface.height / 4.0
        }
        Axis::Horizontal => {
            let offset = sample
                .velocity
                .x
                .max(sample.translation.x - start.x / 2.0);
            offset > sample.surface.width / 2.0
        }
    }
}
