//! Error taxonomy for navigation requests
//!
//! None of these ever reach the end user. Public navigation entry points log
//! them and degrade to a no-op or to a fallback scene.

use thiserror::Error;

/// Navigation errors
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// No scene is registered under the identifier
    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    /// The identifier does not name a navigation container
    #[error("Navigation container not found: {0}")]
    ContainerNotFound(String),

    /// Goto target is not present in any reachable stack
    #[error("Goto target not found: {0}")]
    GotoTargetNotFound(String),

    /// `goto` can only be resolved through the goto entry point
    #[error("Goto mode cannot be shown directly: {0}")]
    GotoNotShowable(String),

    /// Dismiss level does not map onto the stack
    #[error("Dismiss level {level} is out of range for a stack of {len}")]
    LevelOutOfRange {
        /// Requested level
        level: i32,
        /// Stack length at request time
        len: usize,
    },

    /// Nothing on the stack
    #[error("Navigation stack is empty")]
    EmptyStack,

    /// A push was requested with no enclosing navigation container
    #[error("No navigation container encloses {0}")]
    NoNavigationContainer(String),

    /// The host released a scene the stack still referenced
    #[error("Scene was released without being dismissed: {0}")]
    ReleasedScene(String),

    /// Unknown transition strategy key
    #[error("Transition strategy not found: {0}")]
    TransitionNotFound(String),

    /// Configuration or request description could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigatorError>;
