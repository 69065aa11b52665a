//! Core model for the scene navigator
//!
//! This crate holds the data the router reasons about: scenes and their
//! container hierarchy, navigation requests (including deep-link chains),
//! the per-navigator stack, and the identifier → scene registry.
//!
//! # Modules
//!
//! - [`scene`] - Scene handles, container kinds, modal links
//! - [`data_model`] - Request nodes and deep-link chains
//! - [`stack`] - Weakly-held navigation stack
//! - [`registry`] - Scene factory and registry
//! - [`mode`] - Presentation modes and host styles
//! - [`geometry`] - Points, sizes, rectangles
//! - [`error`] - Error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_model;
pub mod error;
pub mod geometry;
pub mod mode;
pub mod registry;
pub mod scene;
pub mod stack;

pub use data_model::{DataModel, DataModelSpec, Payload, SceneCreator};
pub use error::{NavigatorError, Result};
pub use geometry::{Point, Rect, Size};
pub use mode::{Mode, PresentationStyle, TransitionStyle};
pub use registry::{
    placeholder, Placeholder, SceneBlueprint, SceneFactory, SceneRegistry,
    PLACEHOLDER_IDENTIFIER,
};
pub use scene::{
    ContainerKind, DataReceiver, EmptyContent, NavigatorId, Scene, SceneContent, SceneId,
    SceneKind, SceneRef, WeakScene,
};
pub use stack::{NavigationStack, StackSlot};
