//! Gesture recognizer events consumed by the engine
//!
//! The engine never hit-tests. The host's recognizer reports discrete events
//! in the coordinate space of the surface it is attached to.

use navigator_core::{Point, Size};
use serde::{Deserialize, Serialize};

/// One recognizer reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureSample {
    /// Touch location in the coordinate space of the surface's parent
    pub location: Point,
    /// Accumulated translation since the gesture began
    pub translation: Point,
    /// Current velocity in points per second
    pub velocity: Point,
    /// Size of the surface the recognizer is attached to
    pub surface: Size,
}

impl GestureSample {
    /// Create a sample
    pub fn new(location: Point, translation: Point, velocity: Point, surface: Size) -> Self {
        Self {
            location,
            translation,
            velocity,
            surface,
        }
    }
}

/// Discrete recognizer events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "sample", rename_all = "lowercase")]
pub enum GestureEvent {
    /// Recognition started
    Began(GestureSample),
    /// Finger moved
    Changed(GestureSample),
    /// Finger lifted
    Ended(GestureSample),
    /// Recognizer failed
    Failed,
    /// Recognizer was cancelled by the system
    Cancelled,
}

/// Axis along which progress is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

/// Requested orientation of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Vertical for modal transitions, horizontal for stacked ones
    #[default]
    Default,
    /// Always horizontal
    Horizontal,
    /// Always vertical
    Vertical,
}

impl Orientation {
    /// Resolve to an axis for a modal or stacked transition
    pub fn axis(&self, is_modal: bool) -> Axis {
        match self {
            Orientation::Horizontal => Axis::Horizontal,
            Orientation::Vertical => Axis::Vertical,
            Orientation::Default if is_modal => Axis::Vertical,
            Orientation::Default => Axis::Horizontal,
        }
    }
}

/// Recognizer the host should install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerKind {
    /// Free pan anywhere on the surface
    Pan,
    /// Pan starting at the left screen edge
    LeftEdgePan,
}

impl RecognizerKind {
    /// Recognizer used for an axis
    pub fn for_axis(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => RecognizerKind::Pan,
            Axis::Horizontal => RecognizerKind::LeftEdgePan,
        }
    }
}
