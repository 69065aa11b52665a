//! Scene handles and the container hierarchy
//!
//! A [`Scene`] is the router's view of one visual unit owned by the host.
//! The hierarchy mirrors what the host toolkit keeps: containers hold their
//! children strongly, a presenting scene holds its presented scene strongly,
//! and every upward link (parent, presenting) is weak. Navigation stacks only
//! ever hold [`WeakScene`]s, so a scene that drops out of the hierarchy reads
//! as a hole in every stack that still mentions it.
//!
//! Container behaviour is dispatched on [`ContainerKind`] rather than on the
//! concrete content type.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data_model::{DataModel, Payload};
use crate::mode::{Mode, PresentationStyle, TransitionStyle};

/// Shared handle to a scene
pub type SceneRef = Rc<Scene>;

/// Non-owning handle to a scene
pub type WeakScene = Weak<Scene>;

/// Unique scene identity, also used as the surface id by the transition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(Uuid);

impl SceneId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a navigator inside a router forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigatorId(u64);

impl NavigatorId {
    /// Allocate the next navigator id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value, for diagnostics
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NavigatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nav#{}", self.0)
    }
}

/// Kind of container scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Tab bar: children with one selected
    Tab,
    /// Split view: master and detail panes
    Split,
    /// Stacked navigation: ordered children, last is visible
    Navigation,
}

/// Whether a scene is plain content or a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "container")]
pub enum SceneKind {
    /// A leaf scene
    #[default]
    Content,
    /// A container hosting child scenes
    Container(ContainerKind),
}

/// Optional capability of scene content: receiving data along navigation
pub trait DataReceiver {
    /// Called right before the scene becomes visible
    fn before_show(&self, _data: &DataModel, _from: Option<&SceneRef>) {}

    /// Called on the scene about to become top again, before the pop/dismiss
    fn before_back(&self, _data: &Payload, _from: Option<&SceneRef>) {}

    /// Called on the new top scene once the dismiss animation completed
    fn after_back(&self, _data: &Payload) {}
}

/// Host-supplied content behind a scene
pub trait SceneContent {
    /// Data-receiving capability, if the content implements it
    fn data_receiver(&self) -> Option<&dyn DataReceiver> {
        None
    }

    /// Whether deep links must be ignored while this scene is on top
    fn ignores_deep_links(&self) -> bool {
        false
    }
}

/// Content for containers and other scenes with no behaviour of their own
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyContent;

impl SceneContent for EmptyContent {}

#[derive(Default)]
struct Links {
    parent: WeakScene,
    children: Vec<SceneRef>,
    selected: usize,
    presented: Option<SceneRef>,
    presenting: WeakScene,
}

/// One visual unit managed by the host
pub struct Scene {
    id: SceneId,
    identifier: String,
    kind: SceneKind,
    content: Box<dyn SceneContent>,
    title: RefCell<Option<String>>,
    mode: Cell<Mode>,
    navigator: Cell<Option<NavigatorId>>,
    presentation_style: Cell<PresentationStyle>,
    transition_style: Cell<TransitionStyle>,
    links: RefCell<Links>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("identifier", &self.identifier)
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("mode", &self.mode.get())
            .finish()
    }
}

impl Scene {
    /// Create a detached scene
    pub fn new(
        identifier: impl Into<String>,
        kind: SceneKind,
        content: Box<dyn SceneContent>,
    ) -> SceneRef {
        Rc::new(Self {
            id: SceneId::new(),
            identifier: identifier.into(),
            kind,
            content,
            title: RefCell::new(None),
            mode: Cell::new(Mode::Push),
            navigator: Cell::new(None),
            presentation_style: Cell::new(PresentationStyle::default()),
            transition_style: Cell::new(TransitionStyle::default()),
            links: RefCell::new(Links::default()),
        })
    }

    /// Create a container scene with no content of its own
    pub fn container(identifier: impl Into<String>, kind: ContainerKind) -> SceneRef {
        Self::new(identifier, SceneKind::Container(kind), Box::new(EmptyContent))
    }

    /// Unique id
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Registry identifier this scene was built from
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Content or container
    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Container kind, if this is a container
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self.kind {
            SceneKind::Container(kind) => Some(kind),
            SceneKind::Content => None,
        }
    }

    /// Whether this scene hosts children
    pub fn is_container(&self) -> bool {
        self.container_kind().is_some()
    }

    /// Whether this is a tab or split container
    pub fn is_tab_or_split(&self) -> bool {
        matches!(
            self.container_kind(),
            Some(ContainerKind::Tab) | Some(ContainerKind::Split)
        )
    }

    /// Whether this is a navigation container
    pub fn is_navigation(&self) -> bool {
        self.container_kind() == Some(ContainerKind::Navigation)
    }

    /// Host content
    pub fn content(&self) -> &dyn SceneContent {
        self.content.as_ref()
    }

    /// Data-receiving capability of the content
    pub fn data_receiver(&self) -> Option<&dyn DataReceiver> {
        self.content.data_receiver()
    }

    /// Title shown in chrome
    pub fn title(&self) -> Option<String> {
        self.title.borrow().clone()
    }

    /// Set the title
    pub fn set_title(&self, title: Option<String>) {
        *self.title.borrow_mut() = title;
    }

    /// Mode the scene was shown with
    pub fn navigator_mode(&self) -> Mode {
        self.mode.get()
    }

    /// Record the mode the scene was shown with
    pub fn set_navigator_mode(&self, mode: Mode) {
        self.mode.set(mode);
    }

    /// Navigator that owns this scene
    pub fn navigator(&self) -> Option<NavigatorId> {
        self.navigator.get()
    }

    /// Assign the owning navigator
    pub fn set_navigator(&self, navigator: Option<NavigatorId>) {
        self.navigator.set(navigator);
    }

    /// Modal presentation style
    pub fn presentation_style(&self) -> PresentationStyle {
        self.presentation_style.get()
    }

    /// Set the modal presentation style
    pub fn set_presentation_style(&self, style: PresentationStyle) {
        self.presentation_style.set(style);
    }

    /// Built-in modal transition style
    pub fn transition_style(&self) -> TransitionStyle {
        self.transition_style.get()
    }

    /// Set the built-in modal transition style
    pub fn set_transition_style(&self, style: TransitionStyle) {
        self.transition_style.set(style);
    }

    // -------------------------------------------------------------------------
    // Upward links
    // -------------------------------------------------------------------------

    /// Enclosing container
    pub fn parent(&self) -> Option<SceneRef> {
        self.links.borrow().parent.upgrade()
    }

    /// Nearest ancestor container of the given kind
    pub fn ancestor(&self, kind: ContainerKind) -> Option<SceneRef> {
        let mut current = self.parent();
        while let Some(scene) = current {
            if scene.container_kind() == Some(kind) {
                return Some(scene);
            }
            current = scene.parent();
        }
        None
    }

    /// Nearest enclosing navigation container
    pub fn navigation_container(&self) -> Option<SceneRef> {
        self.ancestor(ContainerKind::Navigation)
    }

    /// Nearest enclosing tab container
    pub fn tab_container(&self) -> Option<SceneRef> {
        self.ancestor(ContainerKind::Tab)
    }

    /// Nearest enclosing split container
    pub fn split_container(&self) -> Option<SceneRef> {
        self.ancestor(ContainerKind::Split)
    }

    /// Topmost ancestor (the scene itself when detached)
    pub fn outermost(self: &Rc<Self>) -> SceneRef {
        let mut current = Rc::clone(self);
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The scene itself when it is a navigation container, else its enclosing one
    pub fn navigation_wrapper(self: &Rc<Self>) -> Option<SceneRef> {
        if self.is_navigation() {
            Some(Rc::clone(self))
        } else {
            self.navigation_container()
        }
    }

    /// The scene that presented this scene (or the container it lives in)
    pub fn presenting_scene(self: &Rc<Self>) -> Option<SceneRef> {
        self.outermost().links.borrow().presenting.upgrade()
    }

    // -------------------------------------------------------------------------
    // Container interface
    // -------------------------------------------------------------------------

    /// Child scenes, in order
    pub fn children(&self) -> Vec<SceneRef> {
        self.links.borrow().children.clone()
    }

    /// Number of child scenes
    pub fn child_count(&self) -> usize {
        self.links.borrow().children.len()
    }

    /// Position of `scene` among the children
    pub fn index_of_child(&self, scene: &SceneRef) -> Option<usize> {
        self.links
            .borrow()
            .children
            .iter()
            .position(|child| Rc::ptr_eq(child, scene))
    }

    /// Children with navigation wrappers replaced by their root content
    pub fn content_children(&self) -> Vec<SceneRef> {
        self.children()
            .into_iter()
            .map(|child| {
                if child.is_navigation() {
                    child.first_child().unwrap_or(child)
                } else {
                    child
                }
            })
            .collect()
    }

    /// First child
    pub fn first_child(&self) -> Option<SceneRef> {
        self.links.borrow().children.first().cloned()
    }

    /// Last child (the visible one for navigation containers)
    pub fn top_child(&self) -> Option<SceneRef> {
        self.links.borrow().children.last().cloned()
    }

    /// Selected tab index; split and navigation containers report none
    pub fn selected_index(&self) -> Option<usize> {
        let links = self.links.borrow();
        match self.container_kind() {
            Some(ContainerKind::Tab) if !links.children.is_empty() => Some(links.selected),
            _ => None,
        }
    }

    /// Child currently on screen
    pub fn selected_child(&self) -> Option<SceneRef> {
        let links = self.links.borrow();
        match self.container_kind() {
            Some(ContainerKind::Tab) => links.children.get(links.selected).cloned(),
            Some(ContainerKind::Split) | Some(ContainerKind::Navigation) => {
                links.children.last().cloned()
            }
            None => None,
        }
    }

    /// Replace the children of a container
    ///
    /// Returns false (and embeds nothing) for content scenes.
    pub fn embed(self: &Rc<Self>, scenes: Vec<SceneRef>) -> bool {
        if !self.is_container() {
            return false;
        }
        for scene in &scenes {
            scene.links.borrow_mut().parent = Rc::downgrade(self);
        }
        let previous = {
            let mut links = self.links.borrow_mut();
            links.selected = 0;
            std::mem::replace(&mut links.children, scenes)
        };
        for scene in previous {
            if self.index_of_child(&scene).is_none() {
                scene.links.borrow_mut().parent = Weak::new();
            }
        }
        true
    }

    /// Select a child; only tab containers have a selection
    pub fn select(&self, index: usize) -> bool {
        if self.container_kind() != Some(ContainerKind::Tab) {
            return false;
        }
        let mut links = self.links.borrow_mut();
        if index >= links.children.len() {
            return false;
        }
        links.selected = index;
        true
    }

    /// Append to a navigation container
    pub fn push_child(self: &Rc<Self>, scene: &SceneRef) -> bool {
        if !self.is_navigation() {
            return false;
        }
        scene.links.borrow_mut().parent = Rc::downgrade(self);
        self.links.borrow_mut().children.push(Rc::clone(scene));
        true
    }

    /// Pop a navigation container until `target` is the last child
    ///
    /// Returns the removed scenes, or none when `target` is not a child.
    pub fn pop_to(&self, target: &SceneRef) -> Option<Vec<SceneRef>> {
        let index = self.index_of_child(target)?;
        Some(self.truncate_children(index + 1))
    }

    /// Pop a navigation container down to its first child
    pub fn pop_to_root(&self) -> Vec<SceneRef> {
        self.truncate_children(1)
    }

    fn truncate_children(&self, keep: usize) -> Vec<SceneRef> {
        let removed = {
            let mut links = self.links.borrow_mut();
            let keep = keep.min(links.children.len());
            links.children.split_off(keep)
        };
        for scene in &removed {
            scene.links.borrow_mut().parent = Weak::new();
        }
        removed
    }

    /// Show a scene in the detail pane of a split container
    pub fn show_detail(self: &Rc<Self>, scene: &SceneRef) -> bool {
        if self.container_kind() != Some(ContainerKind::Split) {
            return false;
        }
        scene.links.borrow_mut().parent = Rc::downgrade(self);
        let replaced = {
            let mut links = self.links.borrow_mut();
            if links.children.len() > 1 {
                links.children.pop()
            } else {
                None
            }
        };
        if let Some(old) = replaced {
            old.links.borrow_mut().parent = Weak::new();
        }
        self.links.borrow_mut().children.push(Rc::clone(scene));
        true
    }

    // -------------------------------------------------------------------------
    // Modal presentation
    // -------------------------------------------------------------------------

    /// Scene presented directly over this one
    pub fn presented(&self) -> Option<SceneRef> {
        self.links.borrow().presented.clone()
    }

    /// Whether this scene (or the container holding it) presents something
    pub fn is_presenting(self: &Rc<Self>) -> bool {
        self.outermost().presented().is_some()
    }

    /// Present `scene` modally
    ///
    /// Presentation always happens from the outermost container, on top of
    /// any modal chain already there. Returns the scene that actually
    /// presents.
    pub fn present(self: &Rc<Self>, scene: &SceneRef) -> SceneRef {
        let mut presenter = self.outermost();
        while let Some(next) = presenter.presented() {
            presenter = next;
        }
        scene.links.borrow_mut().presenting = Rc::downgrade(&presenter);
        presenter.links.borrow_mut().presented = Some(Rc::clone(scene));
        presenter
    }

    /// Scene whose presented chain a dismiss issued on this scene removes
    ///
    /// A scene that presents something dismisses what it presents; otherwise
    /// the request is forwarded to whoever presented it.
    pub fn dismiss_target(self: &Rc<Self>) -> Option<SceneRef> {
        let base = self.outermost();
        if base.presented().is_some() {
            Some(base)
        } else {
            base.links.borrow().presenting.upgrade()
        }
    }

    /// Remove the presented chain from this scene
    pub fn dismiss_presented(&self) -> Option<SceneRef> {
        let presented = self.links.borrow_mut().presented.take()?;
        presented.links.borrow_mut().presenting = Weak::new();
        Some(presented)
    }

    /// Depth-first search of the hierarchy below this scene
    pub fn find(self: &Rc<Self>, id: SceneId) -> Option<SceneRef> {
        if self.id == id {
            return Some(Rc::clone(self));
        }
        for child in self.children() {
            if let Some(found) = child.find(id) {
                return Some(found);
            }
        }
        self.presented().and_then(|presented| presented.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(name: &str) -> SceneRef {
        Scene::new(name, SceneKind::Content, Box::new(EmptyContent))
    }

    #[test]
    fn test_navigation_container_lookup() {
        let nav = Scene::container("Nav", ContainerKind::Navigation);
        let home = content("Home");
        assert!(nav.push_child(&home));

        let found = home.navigation_container().unwrap();
        assert!(Rc::ptr_eq(&found, &nav));
        assert!(home.tab_container().is_none());
        assert!(Rc::ptr_eq(&home.outermost(), &nav));
    }

    #[test]
    fn test_content_cannot_embed() {
        let leaf = content("Leaf");
        assert!(!leaf.embed(vec![content("Child")]));
        assert_eq!(leaf.child_count(), 0);
    }

    #[test]
    fn test_tab_selection() {
        let tabs = Scene::container("Tabs", ContainerKind::Tab);
        tabs.embed(vec![content("A"), content("B")]);

        assert_eq!(tabs.selected_index(), Some(0));
        assert!(tabs.select(1));
        assert_eq!(tabs.selected_child().unwrap().identifier(), "B");
        assert!(!tabs.select(2));
        assert_eq!(tabs.selected_index(), Some(1));
    }

    #[test]
    fn test_split_has_no_selection() {
        let split = Scene::container("Split", ContainerKind::Split);
        split.embed(vec![content("Master"), content("Detail")]);
        assert!(!split.select(0));
        assert_eq!(split.selected_index(), None);
        assert_eq!(split.selected_child().unwrap().identifier(), "Detail");
    }

    #[test]
    fn test_show_detail_replaces_last_pane() {
        let split = Scene::container("Split", ContainerKind::Split);
        split.embed(vec![content("Master"), content("Detail")]);
        let other = content("Other");
        assert!(split.show_detail(&other));

        let names: Vec<_> = split
            .children()
            .iter()
            .map(|s| s.identifier().to_string())
            .collect();
        assert_eq!(names, vec!["Master", "Other"]);
    }

    #[test]
    fn test_pop_to_releases_children() {
        let nav = Scene::container("Nav", ContainerKind::Navigation);
        let a = content("A");
        let b = content("B");
        let weak_b = Rc::downgrade(&b);
        nav.push_child(&a);
        nav.push_child(&b);
        drop(b);

        let removed = nav.pop_to(&a).unwrap();
        assert_eq!(removed.len(), 1);
        drop(removed);
        assert!(weak_b.upgrade().is_none());
        assert_eq!(nav.child_count(), 1);
    }

    #[test]
    fn test_content_children_unwraps_navigation() {
        let tabs = Scene::container("Tabs", ContainerKind::Tab);
        let nav = Scene::container("Nav", ContainerKind::Navigation);
        nav.push_child(&content("Feed"));
        tabs.embed(vec![nav, content("Settings")]);

        let names: Vec<_> = tabs
            .content_children()
            .iter()
            .map(|s| s.identifier().to_string())
            .collect();
        assert_eq!(names, vec!["Feed", "Settings"]);
    }

    #[test]
    fn test_present_from_contained_scene() {
        let nav = Scene::container("Nav", ContainerKind::Navigation);
        let home = content("Home");
        nav.push_child(&home);

        let modal = content("Modal");
        let presenter = home.present(&modal);
        assert!(Rc::ptr_eq(&presenter, &nav));
        assert!(home.is_presenting());
        assert!(Rc::ptr_eq(&modal.presenting_scene().unwrap(), &nav));

        let sheet = content("Sheet");
        let presenter = home.present(&sheet);
        assert!(Rc::ptr_eq(&presenter, &modal));
    }

    #[test]
    fn test_dismiss_target() {
        let root = content("Root");
        let modal = content("Modal");
        root.present(&modal);

        assert!(Rc::ptr_eq(&root.dismiss_target().unwrap(), &root));
        assert!(Rc::ptr_eq(&modal.dismiss_target().unwrap(), &root));

        let weak_modal = Rc::downgrade(&modal);
        drop(modal);
        root.dismiss_presented();
        assert!(weak_modal.upgrade().is_none());
        assert!(root.dismiss_target().is_none());
    }

    #[test]
    fn test_find_walks_children_and_modals() {
        let tabs = Scene::container("Tabs", ContainerKind::Tab);
        let a = content("A");
        tabs.embed(vec![Rc::clone(&a)]);
        let modal = content("Modal");
        a.present(&modal);

        let found = tabs.find(modal.id()).unwrap();
        assert!(Rc::ptr_eq(&found, &modal));
        assert!(tabs.find(SceneId::new()).is_none());
    }
}
