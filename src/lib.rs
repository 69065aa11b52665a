//! Scene navigator
//!
//! Facade over the workspace crates:
//!
//! - [`model`] - Scenes, requests, stacks, the scene registry
//! - [`transition`] - Interactive custom transitions
//! - [`router`] - Navigators, the router forest and the host seam

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use navigator_core as model;
pub use navigator_router as router;
pub use navigator_transition as transition;

pub use navigator_core::{DataModel, Mode, SceneRegistry};
pub use navigator_router::{Navigator, Presenter, Router, RouterConfig};
