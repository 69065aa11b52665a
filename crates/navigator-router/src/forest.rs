//! Router forest
//!
//! The [`Router`] owns the root [`Navigator`], one child navigator per tab or
//! split child, the "current" pointer, the scene factory, the transition
//! registry and every transition bound to a shown scene. Navigators reach the
//! router through a weak link, so dropping the last [`Router`] handle tears
//! the whole forest down.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use navigator_core::{ContainerKind, Mode, NavigatorId, SceneFactory, SceneId, SceneRef, WeakScene};
use navigator_transition::{
    FadeStep, LiveAction, RecognizerKind, Transition, TransitionAnimator, TransitionHost,
    TransitionRegistry,
};
use tracing::{debug, info, trace};
use url::Url;

use crate::config::RouterConfig;
use crate::host::Presenter;
use crate::navigator::Navigator;

pub(crate) struct RouterCore {
    config: RouterConfig,
    factory: Box<dyn SceneFactory>,
    presenter: Rc<dyn Presenter>,
    transitions: RefCell<TransitionRegistry>,
    bound: RefCell<Vec<(WeakScene, Rc<Transition>)>>,
    navigators: RefCell<Vec<Rc<Navigator>>>,
    root: Rc<Navigator>,
    current: Cell<NavigatorId>,
    window: RefCell<Option<SceneRef>>,
    bridge: Rc<LiveBridge>,
}

/// Entry point of the navigation forest
#[derive(Clone)]
pub struct Router {
    core: Rc<RouterCore>,
}

impl Router {
    /// Create a router with an empty root navigator
    pub fn new(
        config: RouterConfig,
        factory: impl SceneFactory + 'static,
        presenter: Rc<dyn Presenter>,
    ) -> Self {
        let core = Rc::new_cyclic(|weak: &Weak<RouterCore>| {
            let root = Navigator::new(weak.clone(), true);
            RouterCore {
                config,
                factory: Box::new(factory),
                presenter,
                transitions: RefCell::new(TransitionRegistry::with_defaults()),
                bound: RefCell::new(Vec::new()),
                navigators: RefCell::new(vec![Rc::clone(&root)]),
                current: Cell::new(root.id()),
                root,
                window: RefCell::new(None),
                bridge: Rc::new(LiveBridge {
                    router: weak.clone(),
                    host: RefCell::new(None),
                }),
            }
        });
        Self { core }
    }

    pub(crate) fn from_core(core: Rc<RouterCore>) -> Self {
        Self { core }
    }

    // =========================================================================
    // Forest
    // =========================================================================

    /// Router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.core.config
    }

    /// Root navigator
    pub fn root(&self) -> Rc<Navigator> {
        Rc::clone(&self.core.root)
    }

    /// Navigator that should handle the next request
    ///
    /// Starts from the last navigator that showed something and follows the
    /// selection of the tab or split container its top scene lives in.
    pub fn current(&self) -> Rc<Navigator> {
        let navigator = self
            .navigator(self.core.current.get())
            .unwrap_or_else(|| self.root());
        let Some(top) = navigator.top_scene() else {
            return navigator;
        };

        let tab = if top.container_kind() == Some(ContainerKind::Tab) {
            Some(Rc::clone(&top))
        } else {
            top.tab_container()
        };
        let selected = match tab {
            Some(tab) => tab.selected_child().and_then(|child| {
                if child.container_kind() == Some(ContainerKind::Split) {
                    child.top_child()
                } else {
                    Some(child)
                }
            }),
            None => {
                let split = if top.container_kind() == Some(ContainerKind::Split) {
                    Some(Rc::clone(&top))
                } else {
                    top.split_container()
                };
                split.and_then(|split| split.top_child())
            }
        };

        selected
            .and_then(|scene| self.navigator_of(&scene))
            .unwrap_or(navigator)
    }

    /// Navigator by id
    pub fn navigator(&self, id: NavigatorId) -> Option<Rc<Navigator>> {
        self.core
            .navigators
            .borrow()
            .iter()
            .find(|navigator| navigator.id() == id)
            .cloned()
    }

    /// Navigator that owns a scene
    pub fn navigator_of(&self, scene: &SceneRef) -> Option<Rc<Navigator>> {
        scene.navigator().and_then(|id| self.navigator(id))
    }

    /// Live navigators, root first
    pub fn navigators(&self) -> Vec<Rc<Navigator>> {
        self.prune();
        self.core.navigators.borrow().clone()
    }

    /// Scene installed as the window root
    pub fn window(&self) -> Option<SceneRef> {
        self.core.window.borrow().clone()
    }

    /// Find a scene anywhere below the window root
    pub fn find_scene(&self, id: SceneId) -> Option<SceneRef> {
        self.window().and_then(|window| window.find(id))
    }

    /// Tell the router the user selected a container child directly
    ///
    /// The router does not observe host-side selection changes; without this
    /// call [`Router::current`] keeps pointing at the previous child.
    pub fn notify_selection_changed(&self, container: &SceneRef, index: usize) -> bool {
        if !container.select(index) {
            return false;
        }
        let selected = container.selected_child();
        if let Some(navigator) = selected.and_then(|scene| self.navigator_of(&scene)) {
            self.set_current(navigator.id());
        }
        true
    }

    /// Whether the platform can open a URL
    pub fn can_open(&self, url: &Url) -> bool {
        self.core.presenter.can_open(url)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Register a transition strategy under `key`
    pub fn register_transition<A, F>(&self, key: impl Into<String>, factory: F)
    where
        A: TransitionAnimator + 'static,
        F: Fn() -> A + 'static,
    {
        self.core.transitions.borrow_mut().register(key, factory);
    }

    /// Register a cross-fade strategy under `key`
    pub fn register_fade<D>(&self, key: impl Into<String>, driver: D)
    where
        D: Fn(FadeStep, Box<dyn FnOnce(bool)>) + Clone + 'static,
    {
        self.core.transitions.borrow_mut().register_fade(key, driver);
    }

    /// Transition bound to a shown scene
    pub fn transition_for(&self, scene: &SceneRef) -> Option<Rc<Transition>> {
        self.core
            .bound
            .borrow()
            .iter()
            .find(|(bound, _)| Weak::ptr_eq(bound, &Rc::downgrade(scene)))
            .map(|(_, transition)| Rc::clone(transition))
    }

    /// Install the host that owns recognizers and percent-driven progress
    pub fn set_transition_host(&self, host: Rc<dyn TransitionHost>) {
        *self.core.bridge.host.borrow_mut() = Some(host);
    }

    // =========================================================================
    // Crate internals
    // =========================================================================

    pub(crate) fn presenter(&self) -> &Rc<dyn Presenter> {
        &self.core.presenter
    }

    pub(crate) fn factory(&self) -> &dyn SceneFactory {
        self.core.factory.as_ref()
    }

    pub(crate) fn set_current(&self, id: NavigatorId) {
        self.core.current.set(id);
    }

    pub(crate) fn bridge(&self) -> Rc<dyn TransitionHost> {
        self.core.bridge.clone()
    }

    pub(crate) fn create_transition(&self, key: &str) -> navigator_transition::Result<Transition> {
        self.core.transitions.borrow().create(key)
    }

    /// Keep `transition` alive as long as `scene`, replacing any earlier one
    pub(crate) fn bind_transition(&self, scene: &SceneRef, transition: &Rc<Transition>) {
        let target = Rc::downgrade(scene);
        let released = {
            let mut bound = self.core.bound.borrow_mut();
            let (kept, released): (Vec<_>, Vec<_>) = bound
                .drain(..)
                .partition(|(weak, _)| weak.strong_count() > 0 && !Weak::ptr_eq(weak, &target));
            *bound = kept;
            bound.push((target, Rc::clone(transition)));
            released
        };
        // Dropping a transition detaches its recognizer through the host.
        drop(released);
    }

    /// Install `scene` as the window root on behalf of `owner`
    pub(crate) fn install_window(&self, owner: NavigatorId, scene: &SceneRef) {
        for navigator in self.core.navigators.borrow().iter() {
            navigator.owns_window.set(navigator.id() == owner);
        }
        info!(navigator = %owner, root = scene.identifier(), "Installing window root");
        let previous = self.core.window.replace(Some(Rc::clone(scene)));
        self.core.presenter.set_root(scene);
        drop(previous);
        self.prune();
    }

    /// Create a navigator rooted at `root` with `seed` as its only entry
    pub(crate) fn spawn_navigator(&self, root: &SceneRef, seed: &SceneRef) -> Rc<Navigator> {
        self.prune();
        let navigator = Navigator::new(Rc::downgrade(&self.core), false);
        navigator.owns_window.set(false);
        *navigator.root.borrow_mut() = Rc::downgrade(root);
        navigator.stack.borrow_mut().push(seed);
        for scene in [root, seed] {
            scene.set_navigator(Some(navigator.id()));
            scene.set_navigator_mode(Mode::Reset);
        }
        debug!(navigator = %navigator.id(), root = root.identifier(), "Spawned child navigator");
        self.core.navigators.borrow_mut().push(Rc::clone(&navigator));
        navigator
    }

    /// Forget child navigators whose root the host released
    fn prune(&self) {
        let released = {
            let mut navigators = self.core.navigators.borrow_mut();
            let (kept, released): (Vec<_>, Vec<_>) = navigators
                .drain(..)
                .partition(|navigator| navigator.is_root() || navigator.root_scene().is_some());
            *navigators = kept;
            released
        };
        for navigator in &released {
            trace!(navigator = %navigator.id(), "Dropping navigator with released root");
        }
    }

    /// Start the primitive a drag gesture began
    fn begin_live(&self, action: LiveAction) {
        debug!(action = ?action, "Starting interactive primitive");
        match action {
            LiveAction::Present { presented, presenting } => {
                let (Some(presented), Some(presenting)) =
                    (self.find_scene(presented), self.find_scene(presenting))
                else {
                    return;
                };
                if presented.presenting_scene().is_some() {
                    trace!(scene = presented.identifier(), "Already presented");
                    return;
                }
                let base = presenting.present(&presented);
                self.core
                    .presenter
                    .present(&base, &presented, true, Box::new(|| {}));
            }
            LiveAction::Dismiss { presented } => {
                if let Some(scene) = self.find_scene(presented) {
                    self.dismiss_live(&scene);
                }
            }
            LiveAction::Push { container, scene } => {
                let (Some(container), Some(scene)) =
                    (self.find_scene(container), scene.and_then(|id| self.find_scene(id)))
                else {
                    return;
                };
                if container.index_of_child(&scene).is_some() {
                    trace!(scene = scene.identifier(), "Already pushed");
                    return;
                }
                container.push_child(&scene);
                self.core
                    .presenter
                    .push(&container, &scene, true, Box::new(|| {}));
            }
            LiveAction::Pop { container } => {
                if let Some(top) = self.find_scene(container).and_then(|c| c.top_child()) {
                    self.dismiss_live(&top);
                }
            }
        }
    }

    /// Dismiss a scene through the navigator that shows it
    fn dismiss_live(&self, scene: &SceneRef) {
        let owner = self
            .navigator_of(scene)
            .or_else(|| scene.first_child().and_then(|child| self.navigator_of(&child)));
        let level = owner
            .as_ref()
            .and_then(|navigator| navigator.level_of(scene).map(|level| (navigator, level)));
        match level {
            Some((navigator, level)) => {
                navigator.dismiss(None, level, true, None);
            }
            None => debug!(scene = scene.identifier(), "Scene is on no stack; ignoring drag"),
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current", &self.core.current.get())
            .field("navigators", &self.core.navigators.borrow().len())
            .field("transitions", &self.core.transitions.borrow())
            .finish()
    }
}

/// Host side of every transition the router binds
///
/// Recognizer and progress calls go to the installed surface host; live
/// primitives are started by the router so its stacks stay in sync.
pub(crate) struct LiveBridge {
    router: Weak<RouterCore>,
    host: RefCell<Option<Rc<dyn TransitionHost>>>,
}

impl LiveBridge {
    fn host(&self) -> Option<Rc<dyn TransitionHost>> {
        self.host.borrow().clone()
    }
}

impl TransitionHost for LiveBridge {
    fn attach_recognizer(&self, surface: SceneId, kind: RecognizerKind) {
        if let Some(host) = self.host() {
            host.attach_recognizer(surface, kind);
        }
    }

    fn detach_recognizer(&self, surface: SceneId, kind: RecognizerKind) {
        if let Some(host) = self.host() {
            host.detach_recognizer(surface, kind);
        }
    }

    fn update(&self, percent: f64) {
        if let Some(host) = self.host() {
            host.update(percent);
        }
    }

    fn finish(&self) {
        if let Some(host) = self.host() {
            host.finish();
        }
    }

    fn cancel(&self) {
        if let Some(host) = self.host() {
            host.cancel();
        }
    }

    fn begin_live(&self, action: LiveAction) {
        if let Some(core) = self.router.upgrade() {
            Router::from_core(core).begin_live(action);
        }
    }
}
