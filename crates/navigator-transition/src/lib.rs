//! Interactive transition engine
//!
//! Custom show/dismiss/push/pop animations that a drag gesture can drive,
//! interrupt, reverse or commit mid-flight.
//!
//! # Modules
//!
//! - [`engine`] - The [`Transition`] bound to a scene and its host seam
//! - [`state`] - Gesture state machine and threshold arithmetic
//! - [`gesture`] - Recognizer events, axes and recognizer kinds
//! - [`animator`] - Animation strategies and the transition context
//! - [`anchored`] - Overlay/popover strategies and the strategy registry
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod anchored;
pub mod animator;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod state;

pub use anchored::{Anchor, AnchoredTransition, TransitionRegistry, OVERLAY_KEY, POPOVER_KEY};
pub use animator::{
    FadeAnimator, FadeStep, ImmediateAnimator, SurfaceFrame, TransitionAnimator,
    TransitionContext, DEFAULT_DURATION,
};
pub use engine::{LiveAction, Transition, TransitionHost};
pub use error::{Result, TransitionError};
pub use gesture::{Axis, GestureEvent, GestureSample, Orientation, RecognizerKind};
pub use state::{GestureMachine, GestureOutcome, GesturePhase};
