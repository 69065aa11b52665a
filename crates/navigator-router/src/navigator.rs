//! Navigator and the show protocol
//!
//! A [`Navigator`] owns one stack of scenes and turns requests into
//! hierarchy changes plus [`Presenter`](crate::host::Presenter) primitives.
//! Bookkeeping happens synchronously at request time; the user completion
//! runs once the host reports every primitive of the request as committed.
//!
//! The dismiss, goto and deep-link protocols live in their own modules as
//! further `impl Navigator` blocks.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use navigator_core::{
    placeholder, DataModel, Mode, NavigationStack, NavigatorError, NavigatorId, Payload,
    PresentationStyle, SceneFactory, SceneRef, WeakScene,
};
use navigator_transition::{Anchor, OVERLAY_KEY, POPOVER_KEY};
use tracing::{debug, warn};

use crate::delivery;
use crate::forest::{Router, RouterCore};
use crate::host::{CommitGroup, Completion, PopoverAnchor, TransitionRole};

/// One stack of scenes inside a router forest
pub struct Navigator {
    pub(crate) id: NavigatorId,
    pub(crate) me: Weak<Navigator>,
    pub(crate) router: Weak<RouterCore>,
    pub(crate) stack: RefCell<NavigationStack>,
    pub(crate) root: RefCell<WeakScene>,
    pub(crate) is_root: bool,
    pub(crate) owns_window: Cell<bool>,
    pub(crate) back_payload: RefCell<Option<Payload>>,
    pub(crate) outstanding: Rc<Cell<usize>>,
}

impl Navigator {
    pub(crate) fn new(router: Weak<RouterCore>, is_root: bool) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            id: NavigatorId::next(),
            me: me.clone(),
            router,
            stack: RefCell::new(NavigationStack::new()),
            root: RefCell::new(WeakScene::new()),
            is_root,
            owns_window: Cell::new(is_root),
            back_payload: RefCell::new(None),
            outstanding: Rc::new(Cell::new(0)),
        })
    }

    pub(crate) fn router(&self) -> Option<Router> {
        self.router.upgrade().map(Router::from_core)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Id inside the forest
    pub fn id(&self) -> NavigatorId {
        self.id
    }

    /// Whether this is the forest's root navigator
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether this navigator installed the window root last
    pub fn owns_window(&self) -> bool {
        self.owns_window.get()
    }

    /// Scene on top of the stack
    pub fn top_scene(&self) -> Option<SceneRef> {
        self.compact();
        self.stack.borrow().top()
    }

    /// Root of this navigator: the outermost scene it was reset to or seeded with
    pub fn root_scene(&self) -> Option<SceneRef> {
        self.root.borrow().upgrade()
    }

    /// Number of scenes on the stack
    pub fn stack_count(&self) -> usize {
        self.compact();
        self.stack.borrow().len()
    }

    /// Stack identifiers, bottom to top
    pub fn stack_identifiers(&self) -> Vec<String> {
        self.compact();
        self.stack.borrow().identifiers()
    }

    /// Scene at a stack index
    pub fn scene_at(&self, index: usize) -> Option<SceneRef> {
        self.stack.borrow().get(index)
    }

    /// Convert a dismiss level into a stack index
    ///
    /// Level 0 is the top, 1 the scene below it. Negative levels count from
    /// the root: `-1` maps to index 1, so dismissing it leaves the root on
    /// top. Levels that land outside the stack yield none.
    pub fn stack_level(&self, level: i32) -> Option<usize> {
        let len = self.stack.borrow().len() as i64;
        let level = i64::from(level);
        let index = if level >= 0 {
            len - level - 1
        } else {
            (level - 1).abs() - 1
        };
        (0..len).contains(&index).then_some(index as usize)
    }

    /// Dismiss level that removes `scene` (and everything above it)
    pub(crate) fn level_of(&self, scene: &SceneRef) -> Option<i32> {
        let stack = self.stack.borrow();
        let index = std::iter::once(Rc::clone(scene))
            .chain(scene.children())
            .find_map(|candidate| stack.position(&candidate))?;
        i32::try_from(stack.len() - index - 1).ok()
    }

    /// Drop stack slots whose scene the host released
    pub(crate) fn compact(&self) {
        let dropped = self.stack.borrow_mut().compact();
        for slot in dropped {
            warn!(
                navigator = %self.id,
                error = %NavigatorError::ReleasedScene(slot.identifier().to_string()),
                "Removing released scene from the stack"
            );
        }
    }

    pub(crate) fn begin_request(&self, completion: Option<Completion>) -> CommitGroup {
        let outstanding = Rc::clone(&self.outstanding);
        if outstanding.get() > 0 {
            debug!(
                navigator = %self.id,
                outstanding = outstanding.get(),
                "Request issued while a previous one is still committing"
            );
        }
        outstanding.set(outstanding.get() + 1);
        CommitGroup::new(completion)
            .on_settle(move || outstanding.set(outstanding.get().saturating_sub(1)))
    }

    // =========================================================================
    // Show protocol
    // =========================================================================

    /// Show the scene a request describes
    ///
    /// A `reset` request carrying a chain is resolved as a deep link; the
    /// head's `next` is cleared afterwards. `goto` requests are misuse here
    /// and go through [`Router::goto`]. Returns whether anything was shown;
    /// the completion only fires in that case.
    pub fn show(&self, data: &DataModel, animated: bool, completion: Option<Completion>) -> bool {
        let Some(router) = self.router() else {
            warn!(navigator = %self.id, "Router dropped; ignoring show");
            return false;
        };
        router.set_current(self.id);

        if data.mode() == Mode::Goto {
            let error = NavigatorError::GotoNotShowable(data.identifier().to_string());
            debug_assert!(false, "{error}");
            warn!(navigator = %self.id, error = %error, "Use Router::goto instead");
            return false;
        }

        let group = self.begin_request(completion);
        let shown = if data.next().is_some() && data.mode() == Mode::Reset {
            let shown = self.resolve_deep_link(data, animated, &group);
            data.clear_next();
            shown
        } else {
            self.show_scenes(&router, data, animated, &group)
        };

        if shown {
            group.close();
        } else {
            group.abandon();
        }
        shown
    }

    /// Build the requested scene (and declared children) and show it
    pub(crate) fn show_scenes(
        &self,
        router: &Router,
        data: &DataModel,
        animated: bool,
        group: &CommitGroup,
    ) -> bool {
        if self.root_scene().is_none() && data.mode() != Mode::Reset {
            debug!(navigator = %self.id, mode = %data.mode(), "No root yet; showing as reset");
            data.set_mode(Mode::Reset);
        }

        let (content, outer) = self.create_scene(router, data, data.mode());
        let children = data.children();
        if content.is_container() && !children.is_empty() {
            self.embed_children(router, &content, children);
        }
        self.show_scene(router, data, &content, &outer, animated, group)
    }

    /// Instantiate the scene for a request, wrapped in a container if asked
    ///
    /// Returns the content scene and the outermost scene to show.
    pub(crate) fn create_scene(
        &self,
        router: &Router,
        data: &DataModel,
        mode: Mode,
    ) -> (SceneRef, SceneRef) {
        let content = match data.creator() {
            Some(creator) => creator().instantiate(data.identifier()),
            None => match router.factory().instantiate(data.identifier()) {
                Ok(scene) => scene,
                Err(error) => self.fallback_scene(router, data, &error),
            },
        };
        content.set_navigator(Some(self.id));
        if let Some(title) = data.title() {
            content.set_title(Some(title));
        }

        let wrapper = match (mode, data.container()) {
            (Mode::Push, _) => None,
            (_, Some(container)) => Some(container),
            (Mode::Present, None) if router.config().wrap_presented => {
                Some(router.config().default_container.clone())
            }
            _ => None,
        };
        let outer = match wrapper {
            Some(identifier) if !content.is_container() => {
                self.wrap(router, &content, &identifier).unwrap_or_else(|| Rc::clone(&content))
            }
            _ => Rc::clone(&content),
        };
        (content, outer)
    }

    fn fallback_scene(&self, router: &Router, data: &DataModel, error: &NavigatorError) -> SceneRef {
        let candidates = data
            .fallback()
            .into_iter()
            .chain(router.config().fallback_scene.clone());
        let scene = candidates
            .filter_map(|identifier| router.factory().instantiate(&identifier).ok())
            .next()
            .unwrap_or_else(placeholder);
        warn!(
            navigator = %self.id,
            error = %error,
            fallback = scene.identifier(),
            "Showing fallback scene"
        );
        scene
    }

    fn wrap(&self, router: &Router, content: &SceneRef, identifier: &str) -> Option<SceneRef> {
        match router.factory().instantiate(identifier) {
            Ok(container) if container.is_navigation() => {
                container.embed(vec![Rc::clone(content)]);
                container.set_navigator(Some(self.id));
                Some(container)
            }
            _ => {
                warn!(
                    navigator = %self.id,
                    error = %NavigatorError::ContainerNotFound(identifier.to_string()),
                    scene = content.identifier(),
                    "Showing scene without a container"
                );
                None
            }
        }
    }

    /// Materialize the declared children of a container
    ///
    /// Every child of a tab or split container gets a navigator of its own,
    /// seeded with the child; the first one becomes current.
    pub(crate) fn embed_children(
        &self,
        router: &Router,
        container: &SceneRef,
        children: Vec<DataModel>,
    ) {
        let mut built = Vec::with_capacity(children.len());
        for child in children {
            let (content, outer) = self.create_scene(router, &child, Mode::Reset);
            delivery::before_show(&content, &child, Some(container));

            let grandchildren = child.children();
            if content.is_container() && !grandchildren.is_empty() {
                self.embed_children(router, &content, grandchildren);
            }
            built.push((content, outer));
        }
        if built.is_empty() {
            return;
        }

        container.embed(built.iter().map(|(_, outer)| Rc::clone(outer)).collect());

        if container.is_tab_or_split() {
            for (index, (content, outer)) in built.iter().enumerate() {
                let seed = if outer.is_navigation() {
                    outer.top_child().unwrap_or_else(|| Rc::clone(content))
                } else {
                    Rc::clone(outer)
                };
                let navigator = router.spawn_navigator(outer, &seed);
                if index == 0 {
                    router.set_current(navigator.id);
                }
            }
        }
    }

    /// Issue the primitive for a built scene and record it on the stack
    pub(crate) fn show_scene(
        &self,
        router: &Router,
        data: &DataModel,
        content: &SceneRef,
        outer: &SceneRef,
        animated: bool,
        group: &CommitGroup,
    ) -> bool {
        let mode = data.mode();
        outer.set_presentation_style(data.presentation_style());

        let top = self.top_scene();
        delivery::before_show(content, data, top.as_ref());

        let issued = match (mode, top) {
            (Mode::Reset, top) => {
                self.reset_to(router, top.as_ref(), outer);
                true
            }
            (Mode::Push, Some(top)) => self.push_scene(router, data, &top, outer, animated, group),
            (Mode::Present | Mode::Overlay | Mode::Popover, Some(top)) => {
                self.present_scene(router, data, &top, outer, animated, group)
            }
            (Mode::Goto, _) => {
                warn!(
                    navigator = %self.id,
                    error = %NavigatorError::GotoNotShowable(data.identifier().to_string()),
                    "Skipping goto step"
                );
                false
            }
            (_, None) => {
                warn!(navigator = %self.id, error = %NavigatorError::EmptyStack, "Nothing to show from");
                false
            }
        };
        if !issued {
            return false;
        }

        content.set_navigator_mode(mode);
        outer.set_navigator_mode(mode);
        self.stack.borrow_mut().push(content);
        true
    }

    fn reset_to(&self, router: &Router, top: Option<&SceneRef>, outer: &SceneRef) {
        let split = top
            .and_then(|top| top.split_container())
            .filter(|split| split.child_count() > 1);
        match split {
            Some(split) => {
                split.show_detail(outer);
                router.presenter().show_detail(&split, outer);
            }
            None => {
                self.owns_window.set(true);
                router.install_window(self.id, outer);
            }
        }

        self.stack.borrow_mut().pop_all();
        *self.root.borrow_mut() = Rc::downgrade(outer);
        outer.set_navigator(Some(self.id));
    }

    fn push_scene(
        &self,
        router: &Router,
        data: &DataModel,
        top: &SceneRef,
        outer: &SceneRef,
        animated: bool,
        group: &CommitGroup,
    ) -> bool {
        let Some(container) = top.navigation_wrapper() else {
            warn!(
                navigator = %self.id,
                error = %NavigatorError::NoNavigationContainer(top.identifier().to_string()),
                scene = data.identifier(),
                "Cannot push"
            );
            return false;
        };

        self.setup_transition(router, data, &container, TransitionRole::Navigation);
        container.push_child(outer);
        router
            .presenter()
            .push(&container, outer, animated, group.enter());
        true
    }

    fn present_scene(
        &self,
        router: &Router,
        data: &DataModel,
        top: &SceneRef,
        outer: &SceneRef,
        animated: bool,
        group: &CommitGroup,
    ) -> bool {
        let mode = data.mode();
        if mode.is_anchored() {
            if data.transition().is_none() {
                let key = if mode == Mode::Popover { POPOVER_KEY } else { OVERLAY_KEY };
                data.set_transition(Some(key.to_string()));
            }
            outer.set_presentation_style(PresentationStyle::Custom);
        }

        self.setup_transition(router, data, outer, TransitionRole::Modal);
        let presenting = top.present(outer);
        router
            .presenter()
            .present(&presenting, outer, animated, group.enter());
        true
    }

    /// Bind the requested transition to `target`, or apply the stock style
    fn setup_transition(
        &self,
        router: &Router,
        data: &DataModel,
        target: &SceneRef,
        role: TransitionRole,
    ) {
        let transition = data.transition().and_then(|key| {
            router
                .create_transition(&key)
                .map_err(|error| {
                    warn!(
                        navigator = %self.id,
                        error = %NavigatorError::TransitionNotFound(key.clone()),
                        cause = %error,
                        "Using the stock transition"
                    );
                })
                .ok()
        });

        match transition {
            Some(transition) => {
                let config = router.config();
                transition.set_host(&router.bridge());
                transition.set_interactive_gesture_enabled(config.interactive_gestures);

                let anchor = Anchor::for_mode(data.mode());
                let source = data
                    .source_rect()
                    .or_else(|| anchor.map(|anchor| anchor.default_source_rect(config.screen_size)));
                if let Some(source) = source {
                    let bounds = router
                        .presenter()
                        .bounds(target)
                        .unwrap_or(config.screen_size);
                    let resolved = match anchor {
                        Some(anchor) => anchor.resolve(source, bounds),
                        None => source,
                    };
                    transition.set_source_rect(resolved);
                }

                let transition = Rc::new(transition);
                router.bind_transition(target, &transition);
                router.presenter().install_transition(target, &transition, role);
            }
            None => target.set_transition_style(data.transition_style()),
        }

        if data.presentation_style() == PresentationStyle::Popover {
            router.presenter().anchor_popover(
                target,
                PopoverAnchor {
                    source_rect: data.source_rect(),
                    source_bounds: data.source_bounds(),
                },
            );
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("id", &self.id)
            .field("is_root", &self.is_root)
            .field("stack", &self.stack.borrow().identifiers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::testing::fixture::{self, fixture, root, tabs};
    use crate::testing::{Call, RecordingPresenter};
    use navigator_core::{Rect, Size};
    use std::cell::Cell;

    #[test]
    fn test_stack_level_mapping() {
        let f = fixture();
        f.stack("A", &["B", "C", "D"]);
        let navigator = f.router.root();

        assert_eq!(navigator.stack_level(0), Some(3));
        assert_eq!(navigator.stack_level(1), Some(2));
        assert_eq!(navigator.stack_level(3), Some(0));
        assert_eq!(navigator.stack_level(4), None);
        assert_eq!(navigator.stack_level(-1), Some(1));
        assert_eq!(navigator.stack_level(-2), Some(2));
    }

    #[test]
    fn test_first_show_becomes_root() {
        let f = fixture();
        let navigator = f.router.root();
        let data = DataModel::new("A").with_container("Navigation");

        assert!(navigator.show(&data, true, None));
        assert_eq!(data.mode(), Mode::Reset);
        assert_eq!(navigator.stack_identifiers(), vec!["A"]);
        assert_eq!(navigator.root_scene().unwrap().identifier(), "Navigation");
        assert!(navigator.owns_window());
        assert_eq!(f.presenter.calls(), vec![Call::SetRoot("Navigation".into())]);
        assert_eq!(f.log(), vec!["A:before_show:A"]);
    }

    #[test]
    fn test_push_goes_through_navigation_container() {
        let f = fixture();
        f.stack("A", &[]);
        let navigator = f.router.root();

        let fired = Rc::new(Cell::new(0));
        let sink = fired.clone();
        assert!(navigator.show(
            &DataModel::new("B"),
            true,
            Some(Box::new(move || sink.set(sink.get() + 1)))
        ));

        assert_eq!(fired.get(), 1);
        assert_eq!(navigator.stack_identifiers(), vec!["A", "B"]);
        assert_eq!(
            f.presenter.calls(),
            vec![Call::Push {
                container: "Navigation".into(),
                scene: "B".into(),
                animated: true,
            }]
        );
        let top = navigator.top_scene().unwrap();
        assert_eq!(top.navigator_mode(), Mode::Push);
        assert_eq!(top.navigation_container().unwrap().child_count(), 2);
    }

    #[test]
    fn test_push_completion_waits_for_host() {
        let f = fixture::with(RecordingPresenter::deferred(), RouterConfig::default());
        let navigator = f.router.root();
        navigator.show(&root("A"), false, None);

        let fired = Rc::new(Cell::new(0));
        let sink = fired.clone();
        navigator.show(
            &DataModel::new("B"),
            true,
            Some(Box::new(move || sink.set(sink.get() + 1))),
        );
        assert_eq!(fired.get(), 0);
        assert_eq!(navigator.stack_count(), 2);

        assert_eq!(f.presenter.flush(), 1);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_push_without_container_is_refused() {
        let f = fixture();
        let navigator = f.router.root();
        navigator.show(&DataModel::new("A").with_mode(Mode::Reset), false, None);

        let fired = Rc::new(Cell::new(false));
        let sink = fired.clone();
        let shown = navigator.show(
            &DataModel::new("B"),
            true,
            Some(Box::new(move || sink.set(true))),
        );

        assert!(!shown);
        assert!(!fired.get());
        assert_eq!(navigator.stack_identifiers(), vec!["A"]);
    }

    #[test]
    fn test_reset_replaces_stack() {
        let f = fixture();
        f.stack("A", &["B", "C"]);
        let navigator = f.router.root();

        assert!(navigator.show(&root("D"), false, None));
        assert_eq!(navigator.stack_identifiers(), vec!["D"]);
        assert_eq!(navigator.stack_count(), 1);
        assert_eq!(
            navigator.root_scene().unwrap().first_child().unwrap().identifier(),
            "D"
        );
        assert_eq!(navigator.top_scene().unwrap().navigator_mode(), Mode::Reset);
    }

    #[test]
    fn test_unknown_scene_falls_back() {
        let f = fixture();
        f.stack("A", &[]);
        let navigator = f.router.root();

        let (shown, warnings) =
            fixture::warnings(|| navigator.show(&DataModel::new("Missing"), false, None));
        assert!(shown);
        assert_eq!(navigator.stack_count(), 2);
        assert_eq!(navigator.top_scene().unwrap().identifier(), "Placeholder");
        assert_eq!(warnings, vec!["Showing fallback scene"]);

        let (shown, warnings) = fixture::warnings(|| {
            navigator.show(&DataModel::new("Missing").with_fallback("Fallback"), false, None)
        });
        assert!(shown);
        assert_eq!(navigator.stack_count(), 3);
        assert_eq!(navigator.top_scene().unwrap().identifier(), "Fallback");
        assert_eq!(warnings, vec!["Showing fallback scene"]);
    }

    #[test]
    fn test_failing_fallback_chain_warns_once() {
        let f = fixture::with(
            RecordingPresenter::new(),
            RouterConfig::default().fallback_scene("Also Missing"),
        );
        let navigator = f.router.root();
        navigator.show(&root("A"), false, None);

        let (shown, warnings) = fixture::warnings(|| {
            navigator.show(&DataModel::new("Missing").with_fallback("Gone"), false, None)
        });
        assert!(shown);
        assert_eq!(navigator.stack_identifiers(), vec!["A", "Placeholder"]);
        assert_eq!(warnings, vec!["Showing fallback scene"]);
    }

    #[test]
    fn test_router_fallback_scene() {
        let f = fixture::with(
            RecordingPresenter::new(),
            RouterConfig::default().fallback_scene("Fallback"),
        );
        let navigator = f.router.root();
        navigator.show(&root("A"), false, None);
        navigator.show(&DataModel::new("Missing"), false, None);
        assert_eq!(navigator.stack_identifiers(), vec!["A", "Fallback"]);
    }

    #[test]
    fn test_present_wraps_in_default_container() {
        let f = fixture();
        f.stack("A", &[]);
        let navigator = f.router.root();

        navigator.show(&DataModel::new("B").with_mode(Mode::Present), true, None);

        let top = navigator.top_scene().unwrap();
        assert_eq!(top.navigator_mode(), Mode::Present);
        assert!(top.parent().unwrap().is_navigation());
        assert_eq!(
            f.presenter.calls(),
            vec![Call::Present {
                presenter: "Navigation".into(),
                scene: "Navigation".into(),
                animated: true,
            }]
        );
    }

    #[test]
    fn test_present_without_wrapping() {
        let f = fixture::with(
            RecordingPresenter::new(),
            RouterConfig::default().wrap_presented(false),
        );
        let navigator = f.router.root();
        navigator.show(&root("A"), false, None);
        navigator.show(&DataModel::new("B").with_mode(Mode::Present), true, None);

        assert!(navigator.top_scene().unwrap().parent().is_none());
    }

    #[test]
    fn test_overlay_gets_anchored_transition() {
        let f = fixture();
        f.presenter.set_bounds("B", Size::new(400.0, 800.0));
        f.stack("A", &[]);
        let navigator = f.router.root();

        let data = DataModel::new("B").with_mode(Mode::Overlay);
        navigator.show(&data, true, None);

        let scene = navigator.top_scene().unwrap();
        assert_eq!(data.transition().as_deref(), Some(OVERLAY_KEY));
        assert_eq!(scene.presentation_style(), PresentationStyle::Custom);
        assert!(scene.parent().is_none());

        let transition = f.router.transition_for(&scene).unwrap();
        assert_eq!(transition.source_rect(), Rect::new(0.0, 378.0, 400.0, 422.0));
        assert!(f.presenter.calls().contains(&Call::InstallTransition {
            scene: "B".into(),
            key: OVERLAY_KEY.into(),
            role: TransitionRole::Modal,
        }));
    }

    #[test]
    fn test_popover_keeps_explicit_origin() {
        let f = fixture();
        f.stack("A", &[]);
        let navigator = f.router.root();

        let source = Rect::new(12.0, 40.0, 100.0, 80.0);
        let data = DataModel::new("B")
            .with_mode(Mode::Popover)
            .with_source_rect(source);
        navigator.show(&data, false, None);

        let scene = navigator.top_scene().unwrap();
        let transition = f.router.transition_for(&scene).unwrap();
        assert_eq!(transition.key(), POPOVER_KEY);
        assert_eq!(transition.source_rect(), source);
    }

    #[test]
    fn test_popover_style_anchors_host_popover() {
        let f = fixture();
        f.stack("A", &[]);
        let navigator = f.router.root();

        let source = Rect::new(10.0, 10.0, 20.0, 20.0);
        navigator.show(
            &DataModel::new("B")
                .with_mode(Mode::Present)
                .with_presentation_style(PresentationStyle::Popover)
                .with_source_rect(source),
            true,
            None,
        );

        assert!(f.presenter.calls().contains(&Call::AnchorPopover {
            scene: "Navigation".into(),
            anchor: PopoverAnchor {
                source_rect: Some(source),
                source_bounds: None,
            },
        }));
    }

    #[test]
    fn test_unknown_transition_uses_stock_style() {
        let f = fixture();
        f.stack("A", &[]);
        let navigator = f.router.root();

        navigator.show(
            &DataModel::new("B")
                .with_mode(Mode::Present)
                .with_transition("spin"),
            true,
            None,
        );
        let scene = navigator.top_scene().unwrap();
        assert!(f.router.transition_for(&scene.outermost()).is_none());
        assert_eq!(navigator.stack_count(), 2);
    }

    #[test]
    fn test_tab_children_get_navigators() {
        let f = fixture();
        let navigator = f.router.root();

        assert!(navigator.show(&tabs(&["Home", "Feed", "Profile"]), false, None));

        let tab = navigator.top_scene().unwrap();
        assert_eq!(tab.child_count(), 3);
        assert_eq!(f.router.navigators().len(), 4);

        let home = f.router.current();
        assert!(!home.is_root());
        assert_eq!(home.stack_identifiers(), vec!["Home"]);
        assert_eq!(home.root_scene().unwrap().identifier(), "Navigation");

        assert_eq!(
            f.log(),
            vec![
                "Home:before_show:Home",
                "Feed:before_show:Feed",
                "Profile:before_show:Profile",
            ]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Goto mode cannot be shown directly")]
    fn test_show_rejects_goto() {
        let f = fixture();
        f.stack("A", &[]);
        f.router
            .root()
            .show(&DataModel::new("B").with_mode(Mode::Goto), true, None);
    }
}
