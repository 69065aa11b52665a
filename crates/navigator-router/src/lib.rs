//! Navigation router
//!
//! Resolves show, dismiss, goto and deep-link requests into scene hierarchy
//! changes and host presentation primitives.
//!
//! # Modules
//!
//! - [`forest`] - The [`Router`]: navigators, current pointer, transitions
//! - [`navigator`] - A [`Navigator`] and its show protocol
//! - [`dismiss`] - Dismiss protocol and back-data delivery
//! - [`goto`] - Switching to scenes that already exist
//! - [`deep_link`] - Deep-link chains and URL opening
//! - [`host`] - The [`Presenter`] seam and commit groups
//! - [`config`] - Router configuration
//! - [`testing`] - A recording presenter for tests
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use navigator_core::{ContainerKind, DataModel, EmptyContent, Mode, SceneRegistry};
//! use navigator_router::testing::RecordingPresenter;
//! use navigator_router::{Router, RouterConfig};
//!
//! let mut registry = SceneRegistry::new();
//! registry
//!     .register("Home", || EmptyContent)
//!     .register("Detail", || EmptyContent)
//!     .register_container("Navigation", ContainerKind::Navigation);
//!
//! let presenter = Rc::new(RecordingPresenter::new());
//! let router = Router::new(RouterConfig::default(), registry, presenter.clone());
//!
//! let root = router.root();
//! root.show(
//!     &DataModel::new("Home").with_mode(Mode::Reset).with_container("Navigation"),
//!     false,
//!     None,
//! );
//! root.show(&DataModel::new("Detail"), true, None);
//! assert_eq!(root.stack_identifiers(), vec!["Home", "Detail"]);
//!
//! root.dismiss(None, 0, true, None);
//! assert_eq!(root.stack_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod deep_link;
mod delivery;
pub mod dismiss;
pub mod forest;
pub mod goto;
pub mod host;
pub mod navigator;
pub mod testing;

pub use config::RouterConfig;
pub use deep_link::DeepLinkHandler;
pub use forest::Router;
pub use host::{CommitGroup, Completion, PopoverAnchor, Presenter, TransitionRole};
pub use navigator::Navigator;
