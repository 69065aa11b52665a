//! Transition errors

use thiserror::Error;

/// Errors raised by the transition engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// No strategy registered under the key
    #[error("Transition strategy not found: {0}")]
    UnknownStrategy(String),
}

/// Result type for transition operations
pub type Result<T> = std::result::Result<T, TransitionError>;
