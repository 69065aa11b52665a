//! Host seam
//!
//! The router keeps the scene hierarchy itself and asks the [`Presenter`] to
//! mirror every change on screen. Primitives that animate take a
//! [`Completion`] the host calls once its animation has committed; hosts may
//! call it synchronously.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use navigator_core::{Rect, SceneRef, Size};
use navigator_transition::Transition;
use url::Url;

/// Callback fired once a host primitive has taken effect
pub type Completion = Box<dyn FnOnce()>;

/// How a custom transition is attached to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRole {
    /// Drives modal present/dismiss of the scene
    Modal,
    /// Drives pushes and pops inside the navigation container
    Navigation,
}

/// Anchor of a popover-style presentation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopoverAnchor {
    /// Rectangle the popover points at
    pub source_rect: Option<Rect>,
    /// Bounds of the surface the rectangle lives in
    pub source_bounds: Option<Rect>,
}

/// Host presentation primitives
#[cfg_attr(test, mockall::automock)]
pub trait Presenter {
    /// Install `scene` as the window root
    fn set_root(&self, scene: &SceneRef);

    /// Push `scene` onto a navigation container
    fn push(&self, container: &SceneRef, scene: &SceneRef, animated: bool, completion: Completion);

    /// Present `scene` modally from `presenter`
    fn present(
        &self,
        presenter: &SceneRef,
        scene: &SceneRef,
        animated: bool,
        completion: Completion,
    );

    /// Dismiss whatever `presenter` presents
    fn dismiss(&self, presenter: &SceneRef, animated: bool, completion: Completion);

    /// Pop a navigation container until `scene` is visible
    fn pop_to(&self, container: &SceneRef, scene: &SceneRef, animated: bool, completion: Completion);

    /// Pop a navigation container to its first child
    fn pop_to_root(&self, container: &SceneRef, animated: bool, completion: Completion);

    /// Select a tab
    fn select(&self, container: &SceneRef, index: usize);

    /// Show `scene` in the detail pane of a split container
    fn show_detail(&self, split: &SceneRef, scene: &SceneRef);

    /// Attach a custom transition to a scene
    fn install_transition(&self, scene: &SceneRef, transition: &Rc<Transition>, role: TransitionRole);

    /// Anchor a popover presentation
    fn anchor_popover(&self, scene: &SceneRef, anchor: PopoverAnchor);

    /// Current bounds of a scene's surface, if laid out
    fn bounds(&self, scene: &SceneRef) -> Option<Size>;

    /// Hand a URL the router does not handle to the platform
    fn open_external(&self, url: &Url);

    /// Whether the platform can open a URL
    fn can_open(&self, url: &Url) -> bool;
}

struct GroupState {
    pending: Cell<usize>,
    closed: Cell<bool>,
    completion: RefCell<Option<Completion>>,
    finalizer: RefCell<Option<Completion>>,
}

impl GroupState {
    fn leave(&self) {
        self.pending.set(self.pending.get().saturating_sub(1));
        self.settle_if_done();
    }

    fn settle_if_done(&self) {
        if !self.closed.get() || self.pending.get() > 0 {
            return;
        }
        let finalizer = self.finalizer.borrow_mut().take();
        let completion = self.completion.borrow_mut().take();
        if let Some(finalizer) = finalizer {
            finalizer();
        }
        if let Some(completion) = completion {
            completion();
        }
    }
}

/// Coalesces several host completions into one user completion
///
/// Every primitive issued for one logical navigation takes a completion from
/// [`CommitGroup::enter`]. The user completion fires exactly once, after the
/// group is closed and every entered completion has run.
pub struct CommitGroup {
    state: Rc<GroupState>,
}

impl CommitGroup {
    /// Create a group around an optional user completion
    pub fn new(completion: Option<Completion>) -> Self {
        Self {
            state: Rc::new(GroupState {
                pending: Cell::new(0),
                closed: Cell::new(false),
                completion: RefCell::new(completion),
                finalizer: RefCell::new(None),
            }),
        }
    }

    /// Run `finalizer` when the group settles, even if it was abandoned
    pub fn on_settle(self, finalizer: impl FnOnce() + 'static) -> Self {
        *self.state.finalizer.borrow_mut() = Some(Box::new(finalizer));
        self
    }

    /// Completion to hand to one host primitive
    pub fn enter(&self) -> Completion {
        self.state.pending.set(self.state.pending.get() + 1);
        let state = Rc::clone(&self.state);
        Box::new(move || state.leave())
    }

    /// Number of entered completions that have not run yet
    pub fn pending(&self) -> usize {
        self.state.pending.get()
    }

    /// No more primitives will join; fire once the pending ones have run
    pub fn close(self) {
        self.state.closed.set(true);
        self.state.settle_if_done();
    }

    /// Close without ever firing the user completion
    pub fn abandon(self) {
        self.state.completion.borrow_mut().take();
        self.close();
    }
}

impl std::fmt::Debug for CommitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitGroup")
            .field("pending", &self.state.pending.get())
            .field("closed", &self.state.closed.get())
            .finish()
    }
}
