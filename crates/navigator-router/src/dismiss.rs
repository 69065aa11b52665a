//! Dismiss protocol and back-data delivery

use std::rc::Rc;

use navigator_core::{NavigatorError, Payload, SceneRef};
use tracing::debug;

use crate::delivery;
use crate::forest::Router;
use crate::host::{CommitGroup, Completion};
use crate::navigator::Navigator;

impl Navigator {
    /// Dismiss the scene at `level` and everything above it
    ///
    /// `data` reaches the new top twice: before the primitive runs and once
    /// the host committed it. Modal scenes are dismissed from their
    /// presenter; pushed scenes are popped inside their navigation
    /// container. Returns false when the level maps onto nothing.
    pub fn dismiss(
        &self,
        data: Option<Payload>,
        level: i32,
        animated: bool,
        completion: Option<Completion>,
    ) -> bool {
        let Some(router) = self.router() else {
            return false;
        };
        self.compact();

        let Some(index) = self.stack_level(level) else {
            debug!(
                navigator = %self.id,
                error = %NavigatorError::LevelOutOfRange {
                    level,
                    len: self.stack.borrow().len(),
                },
                "Nothing to dismiss"
            );
            return false;
        };
        let Some(popped) = self.stack.borrow_mut().pop(index) else {
            debug!(navigator = %self.id, index, "Dismissed slot was already released");
            return false;
        };
        let new_top = self.stack.borrow().top();

        *self.back_payload.borrow_mut() = data.clone();
        let me = self.me.clone();
        let group = self.begin_request(Some(Box::new(move || {
            if let Some(navigator) = me.upgrade() {
                navigator.finish_back();
            }
            if let Some(completion) = completion {
                completion();
            }
        })));

        if let (Some(data), Some(top)) = (&data, &new_top) {
            delivery::before_back(top, data, Some(&popped));
        }

        if popped.navigator_mode().is_modal() {
            self.dismiss_modal(&router, &popped, animated, &group);
        } else if let Some(container) = popped.navigation_container() {
            self.pop_within(&router, &container, new_top, animated, &group);
        } else {
            self.dismiss_modal(&router, &popped, animated, &group);
        }

        group.close();
        true
    }

    /// Dismiss until the first scene named `identifier` is on top
    ///
    /// No-op when the scene is not on the stack or already on top.
    pub fn dismiss_to(
        &self,
        identifier: &str,
        data: Option<Payload>,
        animated: bool,
        completion: Option<Completion>,
    ) -> bool {
        self.compact();
        let (index, len) = {
            let stack = self.stack.borrow();
            (stack.index_of(identifier), stack.len())
        };
        match index {
            Some(index) if index + 1 < len => {
                let level = (len - index - 2) as i32;
                self.dismiss(data, level, animated, completion)
            }
            _ => {
                debug!(navigator = %self.id, identifier, "Dismiss target absent or already on top");
                false
            }
        }
    }

    /// Deliver back data to the scene `level` would uncover, without dismissing
    pub fn send_data_before_back(&self, data: Payload, level: i32) -> bool {
        self.compact();
        let Some(index) = self.stack_level(level) else {
            return false;
        };
        let (from, to) = {
            let stack = self.stack.borrow();
            let from = stack.get(index);
            let to = index
                .checked_sub(1)
                .and_then(|below| stack.get(below))
                .or_else(|| from.clone());
            (from, to)
        };
        match to {
            Some(to) => {
                delivery::before_back(&to, &data, from.as_ref());
                true
            }
            None => false,
        }
    }

    /// Deliver back data to the current top
    ///
    /// For dismissals the router never saw, such as a host-driven edge swipe.
    pub fn send_data_after_back(&self, data: Payload) -> bool {
        match self.top_scene() {
            Some(top) => {
                delivery::after_back(&top, &data);
                true
            }
            None => false,
        }
    }

    fn finish_back(&self) {
        let payload = self.back_payload.borrow_mut().take();
        if let (Some(payload), Some(top)) = (payload, self.top_scene()) {
            delivery::after_back(&top, &payload);
        }
    }

    fn dismiss_modal(&self, router: &Router, popped: &SceneRef, animated: bool, group: &CommitGroup) {
        let Some(base) = popped
            .presenting_scene()
            .or_else(|| popped.dismiss_target())
        else {
            debug!(navigator = %self.id, scene = popped.identifier(), "Scene is not presented");
            return;
        };

        let removed = base.dismiss_presented();
        let done = group.enter();
        router.presenter().dismiss(
            &base,
            animated,
            Box::new(move || {
                drop(removed);
                done();
            }),
        );
    }

    /// Pop a navigation container so that `new_top` is visible
    ///
    /// A modal covering the container is dismissed first, unanimated; the
    /// pop is issued once that dismissal committed.
    fn pop_within(
        &self,
        router: &Router,
        container: &SceneRef,
        new_top: Option<SceneRef>,
        animated: bool,
        group: &CommitGroup,
    ) {
        let presenting = container.outermost();
        let covering = presenting.dismiss_presented();

        let target = new_top.filter(|top| container.index_of_child(top).is_some());
        let removed = match &target {
            Some(target) => container.pop_to(target).unwrap_or_default(),
            None => {
                debug!(
                    navigator = %self.id,
                    container = container.identifier(),
                    "New top is outside the container; popping to its root"
                );
                container.pop_to_root()
            }
        };

        let presenter = Rc::clone(router.presenter());
        let container = Rc::clone(container);
        let popped = group.enter();
        let pop = move || {
            let done: Completion = Box::new(move || {
                drop(removed);
                popped();
            });
            match target {
                Some(target) => presenter.pop_to(&container, &target, animated, done),
                None => presenter.pop_to_root(&container, animated, done),
            }
        };

        match covering {
            Some(covering) => {
                let dismissed = group.enter();
                router.presenter().dismiss(
                    &presenting,
                    false,
                    Box::new(move || {
                        drop(covering);
                        pop();
                        dismissed();
                    }),
                );
            }
            None => pop(),
        }
    }
}
