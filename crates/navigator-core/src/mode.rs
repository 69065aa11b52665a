//! Presentation modes and host styles

use serde::{Deserialize, Serialize};

/// How a scene is brought on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Discard the stack and install the scene as root
    Reset,
    /// Switch to a scene that already exists somewhere in the forest
    Goto,
    /// Push onto the enclosing navigation container
    #[default]
    Push,
    /// Present modally
    Present,
    /// Modal with a bottom-anchored custom presentation
    Overlay,
    /// Modal with a centre-anchored custom presentation
    Popover,
}

impl Mode {
    /// Whether scenes shown in this mode are dismissed as modals
    pub fn is_modal(&self) -> bool {
        matches!(self, Mode::Present | Mode::Overlay | Mode::Popover)
    }

    /// Whether the mode forces a custom presentation style
    pub fn is_anchored(&self) -> bool {
        matches!(self, Mode::Overlay | Mode::Popover)
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Reset => "reset",
            Mode::Goto => "goto",
            Mode::Push => "push",
            Mode::Present => "present",
            Mode::Overlay => "overlay",
            Mode::Popover => "popover",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host modal presentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStyle {
    /// Covers the whole screen
    #[default]
    FullScreen,
    /// Page sheet
    PageSheet,
    /// Form sheet
    FormSheet,
    /// Over the current context only
    CurrentContext,
    /// Over the full screen without removing the presenter
    OverFullScreen,
    /// Anchored popover
    Popover,
    /// Driven by a custom transition
    Custom,
}

/// Host built-in modal transition style, used when no custom transition is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    /// Slide up from the bottom
    #[default]
    CoverVertical,
    /// Horizontal flip
    FlipHorizontal,
    /// Cross dissolve
    CrossDissolve,
    /// Page curl
    PartialCurl,
}
