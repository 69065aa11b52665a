//! Router configuration

use navigator_core::{NavigatorError, Result, Size};
use serde::{Deserialize, Serialize};

/// Router-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Registry identifier of the navigation container used to wrap
    /// presented scenes
    pub default_container: String,
    /// Wrap presented scenes in `default_container` when the request names
    /// no container
    pub wrap_presented: bool,
    /// Scene shown when an identifier cannot be resolved and the request has
    /// no fallback of its own
    pub fallback_scene: Option<String>,
    /// Screen size used for anchored presentations when the host reports no
    /// bounds
    pub screen_size: Size,
    /// Whether custom transitions can be driven by drag gestures
    pub interactive_gestures: bool,
    /// Animation flag for requests that do not pass one (goto, URL opens)
    pub animated: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_container: "Navigation".to_string(),
            wrap_presented: true,
            fallback_scene: None,
            screen_size: Size::new(390.0, 844.0),
            interactive_gestures: true,
            animated: true,
        }
    }
}

impl RouterConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(NavigatorError::from)
    }

    /// Set the default navigation container
    pub fn default_container(mut self, identifier: impl Into<String>) -> Self {
        self.default_container = identifier.into();
        self
    }

    /// Set whether presented scenes are wrapped
    pub fn wrap_presented(mut self, wrap: bool) -> Self {
        self.wrap_presented = wrap;
        self
    }

    /// Set the router-wide fallback scene
    pub fn fallback_scene(mut self, identifier: impl Into<String>) -> Self {
        self.fallback_scene = Some(identifier.into());
        self
    }

    /// Set the screen size
    pub fn screen_size(mut self, size: Size) -> Self {
        self.screen_size = size;
        self
    }

    /// Enable or disable interactive gestures
    pub fn interactive_gestures(mut self, enabled: bool) -> Self {
        self.interactive_gestures = enabled;
        self
    }

    /// Set the default animation flag
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}
