//! Test support
//!
//! [`RecordingPresenter`] mirrors nothing on screen; it records every
//! primitive by scene identifier and either completes it on the spot or
//! queues the completion until [`RecordingPresenter::flush`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use navigator_core::{SceneRef, Size};
use navigator_transition::Transition;
use url::Url;

use crate::host::{Completion, PopoverAnchor, Presenter, TransitionRole};

/// When recorded primitives report completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionMode {
    /// Inside the primitive call
    #[default]
    Immediate,
    /// On [`RecordingPresenter::flush`]
    Deferred,
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `set_root`
    SetRoot(String),
    /// `push`
    Push {
        /// Navigation container
        container: String,
        /// Pushed scene
        scene: String,
        /// Animation flag
        animated: bool,
    },
    /// `present`
    Present {
        /// Presenting scene
        presenter: String,
        /// Presented scene
        scene: String,
        /// Animation flag
        animated: bool,
    },
    /// `dismiss`
    Dismiss {
        /// Scene whose presented chain goes away
        presenter: String,
        /// Animation flag
        animated: bool,
    },
    /// `pop_to`
    PopTo {
        /// Navigation container
        container: String,
        /// Scene left on top
        scene: String,
        /// Animation flag
        animated: bool,
    },
    /// `pop_to_root`
    PopToRoot {
        /// Navigation container
        container: String,
        /// Animation flag
        animated: bool,
    },
    /// `select`
    Select {
        /// Tab container
        container: String,
        /// Selected index
        index: usize,
    },
    /// `show_detail`
    ShowDetail {
        /// Split container
        split: String,
        /// Detail scene
        scene: String,
    },
    /// `install_transition`
    InstallTransition {
        /// Scene the transition drives
        scene: String,
        /// Strategy key
        key: String,
        /// Modal or navigation
        role: TransitionRole,
    },
    /// `anchor_popover`
    AnchorPopover {
        /// Popover scene
        scene: String,
        /// Anchor
        anchor: PopoverAnchor,
    },
    /// `open_external`
    OpenExternal(String),
}

/// Presenter that records primitives
#[derive(Default)]
pub struct RecordingPresenter {
    mode: Cell<CompletionMode>,
    calls: RefCell<Vec<Call>>,
    pending: RefCell<Vec<Completion>>,
    bounds: RefCell<HashMap<String, Size>>,
    schemes: RefCell<Vec<String>>,
}

impl RecordingPresenter {
    /// Presenter completing every primitive immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Presenter queueing completions until [`flush`](Self::flush)
    pub fn deferred() -> Self {
        let presenter = Self::default();
        presenter.mode.set(CompletionMode::Deferred);
        presenter
    }

    /// Switch completion mode
    pub fn set_mode(&self, mode: CompletionMode) {
        self.mode.set(mode);
    }

    /// Recorded primitives, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded primitives, clearing the record
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Number of queued completions
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run queued completions, including ones queued while flushing
    ///
    /// Returns how many ran.
    pub fn flush(&self) -> usize {
        let mut ran = 0;
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                return ran;
            }
            for completion in batch {
                completion();
                ran += 1;
            }
        }
    }

    /// Report `size` as the bounds of scenes named `identifier`
    pub fn set_bounds(&self, identifier: impl Into<String>, size: Size) {
        self.bounds.borrow_mut().insert(identifier.into(), size);
    }

    /// Let [`Presenter::can_open`] accept a URL scheme
    pub fn allow_scheme(&self, scheme: impl Into<String>) {
        self.schemes.borrow_mut().push(scheme.into());
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn complete(&self, completion: Completion) {
        match self.mode.get() {
            CompletionMode::Immediate => completion(),
            CompletionMode::Deferred => self.pending.borrow_mut().push(completion),
        }
    }
}

fn name(scene: &SceneRef) -> String {
    scene.identifier().to_string()
}

impl Presenter for RecordingPresenter {
    fn set_root(&self, scene: &SceneRef) {
        self.record(Call::SetRoot(name(scene)));
    }

    fn push(&self, container: &SceneRef, scene: &SceneRef, animated: bool, completion: Completion) {
        self.record(Call::Push {
            container: name(container),
            scene: name(scene),
            animated,
        });
        self.complete(completion);
    }

    fn present(&self, presenter: &SceneRef, scene: &SceneRef, animated: bool, completion: Completion) {
        self.record(Call::Present {
            presenter: name(presenter),
            scene: name(scene),
            animated,
        });
        self.complete(completion);
    }

    fn dismiss(&self, presenter: &SceneRef, animated: bool, completion: Completion) {
        self.record(Call::Dismiss {
            presenter: name(presenter),
            animated,
        });
        self.complete(completion);
    }

    fn pop_to(&self, container: &SceneRef, scene: &SceneRef, animated: bool, completion: Completion) {
        self.record(Call::PopTo {
            container: name(container),
            scene: name(scene),
            animated,
        });
        self.complete(completion);
    }

    fn pop_to_root(&self, container: &SceneRef, animated: bool, completion: Completion) {
        self.record(Call::PopToRoot {
            container: name(container),
            animated,
        });
        self.complete(completion);
    }

    fn select(&self, container: &SceneRef, index: usize) {
        self.record(Call::Select {
            container: name(container),
            index,
        });
    }

    fn show_detail(&self, split: &SceneRef, scene: &SceneRef) {
        self.record(Call::ShowDetail {
            split: name(split),
            scene: name(scene),
        });
    }

    fn install_transition(&self, scene: &SceneRef, transition: &Rc<Transition>, role: TransitionRole) {
        self.record(Call::InstallTransition {
            scene: name(scene),
            key: transition.key().to_string(),
            role,
        });
    }

    fn anchor_popover(&self, scene: &SceneRef, anchor: PopoverAnchor) {
        self.record(Call::AnchorPopover {
            scene: name(scene),
            anchor,
        });
    }

    fn bounds(&self, scene: &SceneRef) -> Option<Size> {
        self.bounds.borrow().get(scene.identifier()).copied()
    }

    fn open_external(&self, url: &Url) {
        self.record(Call::OpenExternal(url.to_string()));
    }

    fn can_open(&self, url: &Url) -> bool {
        self.schemes
            .borrow()
            .iter()
            .any(|scheme| scheme == url.scheme())
    }
}

impl std::fmt::Debug for RecordingPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingPresenter")
            .field("mode", &self.mode.get())
            .field("calls", &self.calls.borrow().len())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}
