//! Navigation requests and deep-link chains
//!
//! A [`DataModel`] describes one target scene plus how to show it. Nodes are
//! shared handles: cloning a `DataModel` yields the same node, which is what
//! lets `a >> b` return the head of the chain unchanged.
//!
//! ```rust
//! use navigator_core::{DataModel, Mode};
//!
//! let link = DataModel::new("Home").with_mode(Mode::Reset)
//!     >> DataModel::new("Profile")
//!     >> DataModel::new("Post");
//! assert_eq!(link.identifier(), "Home");
//! assert_eq!(link.len(), 3);
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::ops::Shr;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Rect;
use crate::mode::{Mode, PresentationStyle, TransitionStyle};
use crate::registry::SceneBlueprint;

/// Opaque data carried along a navigation
#[derive(Clone)]
pub struct Payload(Rc<dyn Any>);

impl Payload {
    /// Wrap any value
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether the value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.downcast_ref::<serde_json::Value>() {
            Some(value) => write!(f, "Payload({})", value),
            None => f.write_str("Payload(..)"),
        }
    }
}

/// Builds scene content directly, bypassing the registry lookup
pub type SceneCreator = Rc<dyn Fn() -> SceneBlueprint>;

struct Node {
    identifier: String,
    creator: Option<SceneCreator>,
    container: RefCell<Option<String>>,
    mode: Cell<Mode>,
    title: RefCell<Option<String>>,
    extra: RefCell<Option<Payload>>,
    transition: RefCell<Option<String>>,
    transition_style: Cell<TransitionStyle>,
    presentation_style: Cell<PresentationStyle>,
    source_rect: Cell<Option<Rect>>,
    source_bounds: Cell<Option<Rect>>,
    fallback: RefCell<Option<String>>,
    children: RefCell<Vec<DataModel>>,
    next: RefCell<Option<DataModel>>,
}

/// One navigation request node
#[derive(Clone)]
pub struct DataModel {
    node: Rc<Node>,
}

impl DataModel {
    /// Request the scene registered under `identifier`, pushed by default
    pub fn new(identifier: impl Into<String>) -> Self {
        Self::build(identifier.into(), None)
    }

    /// Request a scene built by `creator`; `identifier` names it on the stack
    pub fn with_creator(
        identifier: impl Into<String>,
        creator: impl Fn() -> SceneBlueprint + 'static,
    ) -> Self {
        Self::build(identifier.into(), Some(Rc::new(creator)))
    }

    fn build(identifier: String, creator: Option<SceneCreator>) -> Self {
        Self {
            node: Rc::new(Node {
                identifier,
                creator,
                container: RefCell::new(None),
                mode: Cell::new(Mode::Push),
                title: RefCell::new(None),
                extra: RefCell::new(None),
                transition: RefCell::new(None),
                transition_style: Cell::new(TransitionStyle::default()),
                presentation_style: Cell::new(PresentationStyle::default()),
                source_rect: Cell::new(None),
                source_bounds: Cell::new(None),
                fallback: RefCell::new(None),
                children: RefCell::new(Vec::new()),
                next: RefCell::new(None),
            }),
        }
    }

    /// Set the show mode
    pub fn with_mode(self, mode: Mode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Wrap the scene in the named navigation container
    pub fn with_container(self, container: impl Into<String>) -> Self {
        *self.node.container.borrow_mut() = Some(container.into());
        self
    }

    /// Set the title
    pub fn with_title(self, title: impl Into<String>) -> Self {
        *self.node.title.borrow_mut() = Some(title.into());
        self
    }

    /// Attach extra data
    pub fn with_extra<T: Any>(self, extra: T) -> Self {
        *self.node.extra.borrow_mut() = Some(Payload::new(extra));
        self
    }

    /// Attach an already wrapped payload
    pub fn with_payload(self, payload: Payload) -> Self {
        *self.node.extra.borrow_mut() = Some(payload);
        self
    }

    /// Use the custom transition registered under `key`
    pub fn with_transition(self, key: impl Into<String>) -> Self {
        self.set_transition(Some(key.into()));
        self
    }

    /// Built-in transition style used when no custom transition is set
    pub fn with_transition_style(self, style: TransitionStyle) -> Self {
        self.node.transition_style.set(style);
        self
    }

    /// Modal presentation style
    pub fn with_presentation_style(self, style: PresentationStyle) -> Self {
        self.node.presentation_style.set(style);
        self
    }

    /// Anchor rectangle for anchored presentations
    pub fn with_source_rect(self, rect: Rect) -> Self {
        self.node.source_rect.set(Some(rect));
        self
    }

    /// Bounds of the view that issued the request
    pub fn with_source_bounds(self, bounds: Rect) -> Self {
        self.node.source_bounds.set(Some(bounds));
        self
    }

    /// Scene to show if the identifier cannot be resolved
    pub fn with_fallback(self, fallback: impl Into<String>) -> Self {
        *self.node.fallback.borrow_mut() = Some(fallback.into());
        self
    }

    /// Children materialized into a container scene
    pub fn with_children(self, children: Vec<DataModel>) -> Self {
        *self.node.children.borrow_mut() = children;
        self
    }

    /// Target scene identifier
    pub fn identifier(&self) -> &str {
        &self.node.identifier
    }

    /// Direct scene creator, if any
    pub fn creator(&self) -> Option<SceneCreator> {
        self.node.creator.clone()
    }

    /// Navigation container identifier
    pub fn container(&self) -> Option<String> {
        self.node.container.borrow().clone()
    }

    /// Show mode
    pub fn mode(&self) -> Mode {
        self.node.mode.get()
    }

    /// Change the show mode
    pub fn set_mode(&self, mode: Mode) {
        self.node.mode.set(mode);
    }

    /// Title
    pub fn title(&self) -> Option<String> {
        self.node.title.borrow().clone()
    }

    /// Extra data
    pub fn extra(&self) -> Option<Payload> {
        self.node.extra.borrow().clone()
    }

    /// Custom transition key
    pub fn transition(&self) -> Option<String> {
        self.node.transition.borrow().clone()
    }

    /// Replace the custom transition key
    pub fn set_transition(&self, key: Option<String>) {
        *self.node.transition.borrow_mut() = key;
    }

    /// Built-in transition style
    pub fn transition_style(&self) -> TransitionStyle {
        self.node.transition_style.get()
    }

    /// Modal presentation style
    pub fn presentation_style(&self) -> PresentationStyle {
        self.node.presentation_style.get()
    }

    /// Anchor rectangle
    pub fn source_rect(&self) -> Option<Rect> {
        self.node.source_rect.get()
    }

    /// Replace the anchor rectangle
    pub fn set_source_rect(&self, rect: Option<Rect>) {
        self.node.source_rect.set(rect);
    }

    /// Bounds of the requesting view
    pub fn source_bounds(&self) -> Option<Rect> {
        self.node.source_bounds.get()
    }

    /// Fallback identifier
    pub fn fallback(&self) -> Option<String> {
        self.node.fallback.borrow().clone()
    }

    /// Container children
    pub fn children(&self) -> Vec<DataModel> {
        self.node.children.borrow().clone()
    }

    /// Successor in a deep-link chain
    pub fn next(&self) -> Option<DataModel> {
        self.node.next.borrow().clone()
    }

    /// Unlink the successor
    pub fn clear_next(&self) {
        self.node.next.borrow_mut().take();
    }

    /// Whether both handles name the same node
    pub fn ptr_eq(&self, other: &DataModel) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Iterate the chain starting at this node
    pub fn chain(&self) -> Chain {
        Chain {
            current: Some(self.clone()),
        }
    }

    /// Number of nodes in the chain starting at this node
    pub fn len(&self) -> usize {
        self.chain().count()
    }

    /// A chain always holds at least its head
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Last node of the chain
    pub fn tail(&self) -> DataModel {
        let mut current = self.clone();
        while let Some(next) = current.next() {
            current = next;
        }
        current
    }

    /// Append `next` to the end of this chain and return the head
    ///
    /// Linking a chain that already contains this head would close a loop;
    /// such requests are dropped.
    pub fn link(&self, next: DataModel) -> DataModel {
        if next.chain().any(|node| self.chain().any(|own| own.ptr_eq(&node))) {
            tracing::warn!(
                head = self.identifier(),
                next = next.identifier(),
                "Refusing to link a deep-link chain into itself"
            );
            return self.clone();
        }
        *self.tail().node.next.borrow_mut() = Some(next);
        self.clone()
    }
}

impl Shr for DataModel {
    type Output = DataModel;

    fn shr(self, next: DataModel) -> DataModel {
        self.link(next)
    }
}

impl std::fmt::Debug for DataModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataModel")
            .field("identifier", &self.identifier())
            .field("mode", &self.mode())
            .field("container", &self.container())
            .field("title", &self.title())
            .field("transition", &self.transition())
            .field("children", &self.node.children.borrow().len())
            .field("has_next", &self.node.next.borrow().is_some())
            .finish()
    }
}

impl std::fmt::Display for DataModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, node) in self.chain().enumerate() {
            if index > 0 {
                f.write_str(" -->\n")?;
            }
            write!(f, "{} ({})", node.identifier(), node.mode())?;
        }
        Ok(())
    }
}

/// Iterator over a deep-link chain
pub struct Chain {
    current: Option<DataModel>,
}

impl Iterator for Chain {
    type Item = DataModel;

    fn next(&mut self) -> Option<DataModel> {
        let current = self.current.take()?;
        self.current = current.next();
        Some(current)
    }
}

/// Serializable description of a request tree or chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModelSpec {
    /// Target scene identifier
    pub identifier: String,
    /// Navigation container identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Show mode
    #[serde(default)]
    pub mode: Mode,
    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Extra data, delivered as a `serde_json::Value` payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
    /// Custom transition key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    /// Fallback identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Container children
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DataModelSpec>,
    /// Deep-link successor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<DataModelSpec>>,
}

impl DataModelSpec {
    /// Parse a request description from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the request node (and its chain and children)
    pub fn into_model(self) -> DataModel {
        let mut model = DataModel::new(self.identifier).with_mode(self.mode);
        if let Some(container) = self.container {
            model = model.with_container(container);
        }
        if let Some(title) = self.title {
            model = model.with_title(title);
        }
        if let Some(extra) = self.extra {
            model = model.with_extra(extra);
        }
        if let Some(transition) = self.transition {
            model = model.with_transition(transition);
        }
        if let Some(fallback) = self.fallback {
            model = model.with_fallback(fallback);
        }
        if !self.children.is_empty() {
            model = model.with_children(
                self.children
                    .into_iter()
                    .map(DataModelSpec::into_model)
                    .collect(),
            );
        }
        match self.next {
            Some(next) => model >> next.into_model(),
            None => model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_composition_keeps_head() {
        let a = DataModel::new("A");
        let b = DataModel::new("B");
        let c = DataModel::new("C");

        let head = a.clone() >> b.clone() >> c.clone();
        assert!(head.ptr_eq(&a));
        assert!(head.next().unwrap().ptr_eq(&b));
        assert!(head.next().unwrap().next().unwrap().ptr_eq(&c));
        assert!(c.next().is_none());
    }

    #[test]
    fn test_link_appends_at_tail() {
        let head = DataModel::new("A");
        head.link(DataModel::new("B"));
        head.link(DataModel::new("C"));

        let names: Vec<_> = head.chain().map(|n| n.identifier().to_string()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(head.tail().identifier(), "C");
    }

    #[test]
    fn test_link_refuses_cycles() {
        let a = DataModel::new("A");
        let b = DataModel::new("B");
        let head = a.clone() >> b.clone();
        b.link(a.clone());

        assert_eq!(head.len(), 2);
        assert!(b.next().is_none());
    }

    #[test]
    fn test_clear_next() {
        let head = DataModel::new("A") >> DataModel::new("B");
        head.clear_next();
        assert!(head.next().is_none());
        assert_eq!(head.len(), 1);
    }

    #[test]
    fn test_payload_downcast() {
        let model = DataModel::new("A").with_extra(42u32);
        let extra = model.extra().unwrap();
        assert!(extra.is::<u32>());
        assert_eq!(extra.downcast_ref::<u32>(), Some(&42));
        assert!(extra.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_chain_display() {
        let head = DataModel::new("A").with_mode(Mode::Reset) >> DataModel::new("B");
        assert_eq!(head.to_string(), "A (reset) -->\nB (push)");
    }

    #[test]
    fn test_spec_builds_chain_and_children() {
        let json = r#"{
            "identifier": "Tabs",
            "mode": "reset",
            "children": [
                { "identifier": "Feed", "container": "Nav" },
                { "identifier": "Settings" }
            ],
            "next": {
                "identifier": "Feed",
                "next": { "identifier": "Post", "extra": { "id": 7 } }
            }
        }"#;

        let model = DataModelSpec::from_json(json).unwrap().into_model();
        assert_eq!(model.mode(), Mode::Reset);
        assert_eq!(model.children().len(), 2);
        assert_eq!(model.children()[0].container().as_deref(), Some("Nav"));
        assert_eq!(model.len(), 3);

        let post = model.tail();
        let extra = post.extra().unwrap();
        let value = extra.downcast_ref::<serde_json::Value>().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_spec_rejects_bad_json() {
        assert!(DataModelSpec::from_json("{ \"mode\": \"push\" }").is_err());
    }
}
