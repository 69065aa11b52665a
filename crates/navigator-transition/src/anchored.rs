//! Anchored presentations and the strategy registry
//!
//! Overlay and popover requests present a surface pinned inside the screen:
//! overlays hug the bottom edge at full width, popovers sit centred. These
//! strategies shape the frame only and leave the animation to the host.

use std::collections::HashMap;
use std::rc::Rc;

use navigator_core::{Mode, Rect, Size};

use crate::animator::{FadeAnimator, TransitionAnimator};
use crate::engine::Transition;
use crate::error::{Result, TransitionError};

/// Registry key of the bottom-anchored strategy
pub const OVERLAY_KEY: &str = "overlay";
/// Registry key of the centre-anchored strategy
pub const POPOVER_KEY: &str = "popover";

/// Where an anchored surface is pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Bottom edge, full width
    Bottom,
    /// Centre of the screen
    Center,
}

impl Anchor {
    /// Anchor used by a mode, if the mode is anchored
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Overlay => Some(Anchor::Bottom),
            Mode::Popover => Some(Anchor::Center),
            _ => None,
        }
    }

    /// Source rect used when a request gives none
    pub fn default_source_rect(&self, screen: Size) -> Rect {
        match self {
            Anchor::Bottom => Rect::new(0.0, 0.0, 0.0, screen.height / 2.0),
            Anchor::Center => Rect::new(0.0, 0.0, screen.width - 20.0, screen.height / 3.0),
        }
    }

    /// Position a source rect inside `bounds`
    ///
    /// Bottom anchoring keeps only the height. Centre anchoring only moves
    /// rects whose origin is zero; an explicit origin is kept.
    pub fn resolve(&self, source: Rect, bounds: Size) -> Rect {
        match self {
            Anchor::Bottom => source.anchored_bottom(bounds),
            Anchor::Center if source.origin == navigator_core::Point::ZERO => {
                source.anchored_center(bounds)
            }
            Anchor::Center => source,
        }
    }
}

/// Strategy for anchored custom presentations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchoredTransition {
    anchor: Anchor,
    dismiss_on_outside_tap: bool,
}

impl AnchoredTransition {
    /// Bottom-anchored overlay
    pub fn bottom() -> Self {
        Self {
            anchor: Anchor::Bottom,
            dismiss_on_outside_tap: true,
        }
    }

    /// Centre-anchored popover
    pub fn center() -> Self {
        Self {
            anchor: Anchor::Center,
            dismiss_on_outside_tap: true,
        }
    }

    /// Set whether tapping outside the surface dismisses it
    pub fn dismiss_on_outside_tap(mut self, dismiss: bool) -> Self {
        self.dismiss_on_outside_tap = dismiss;
        self
    }

    /// Anchor of this strategy
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }
}

impl TransitionAnimator for AnchoredTransition {
    fn drives_animation(&self) -> bool {
        false
    }

    fn presentation_frame(&self, source_rect: Rect, bounds: Size) -> Rect {
        self.anchor.resolve(source_rect, bounds)
    }

    fn dismiss_on_outside_tap(&self) -> bool {
        self.dismiss_on_outside_tap
    }
}

type StrategyFactory = Rc<dyn Fn() -> Box<dyn TransitionAnimator>>;

/// Key → strategy table
///
/// Requests name their transition by key; each show gets a fresh
/// [`Transition`] wrapping a fresh strategy.
#[derive(Clone, Default)]
pub struct TransitionRegistry {
    factories: HashMap<String, StrategyFactory>,
}

impl TransitionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in anchored strategies
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(OVERLAY_KEY, AnchoredTransition::bottom)
            .register(POPOVER_KEY, AnchoredTransition::center);
        registry
    }

    /// Register a strategy constructor under `key`
    pub fn register<A, F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        A: TransitionAnimator + 'static,
        F: Fn() -> A + 'static,
    {
        self.factories.insert(
            key.into(),
            Rc::new(move || Box::new(factory()) as Box<dyn TransitionAnimator>),
        );
        self
    }

    /// Register a cross-fade strategy under `key`
    pub fn register_fade<D>(&mut self, key: impl Into<String>, driver: D) -> &mut Self
    where
        D: Fn(crate::animator::FadeStep, Box<dyn FnOnce(bool)>) + Clone + 'static,
    {
        self.register(key, move || FadeAnimator::new(driver.clone()))
    }

    /// Whether a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Build a transition for `key`
    pub fn create(&self, key: &str) -> Result<Transition> {
        self.factories
            .get(key)
            .map(|factory| Transition::new(key, factory()))
            .ok_or_else(|| TransitionError::UnknownStrategy(key.to_string()))
    }

    /// Registered keys
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.factories.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for TransitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
