//! Goto protocol
//!
//! Goto switches to a scene that already exists somewhere in the forest
//! instead of building a new one.

use std::rc::Rc;

use navigator_core::{NavigatorError, SceneRef};
use tracing::{debug, warn};

use crate::forest::Router;
use crate::navigator::Navigator;

impl Navigator {
    /// Switch to `identifier` if this navigator can reach it
    pub(crate) fn goto_if_exists(&self, identifier: &str, animated: bool) -> bool {
        let Some(router) = self.router() else {
            return false;
        };
        if self.is_root {
            self.goto_root_child(&router, identifier, animated)
        } else {
            self.goto_in_stack(&router, identifier, animated)
        }
    }

    /// Select a child of the root container and dismiss to its root
    ///
    /// Only tab and split roots have selectable children; a plain stack
    /// root never matches.
    fn goto_root_child(&self, router: &Router, identifier: &str, animated: bool) -> bool {
        let Some(root) = self.root_scene().filter(|root| root.is_tab_or_split()) else {
            return false;
        };
        let Some(index) = root
            .content_children()
            .iter()
            .position(|child| child.identifier() == identifier)
        else {
            debug!(navigator = %self.id, identifier, "Not a child of the root container");
            return false;
        };

        if root.select(index) {
            router.presenter().select(&root, index);
        }
        router.current().dismiss(None, -1, animated, None);
        true
    }

    /// Trim the stack down to `identifier` and pop the host to it
    fn goto_in_stack(&self, router: &Router, identifier: &str, animated: bool) -> bool {
        self.compact();
        let Some(index) = self.stack.borrow().index_of(identifier) else {
            return false;
        };
        {
            let mut stack = self.stack.borrow_mut();
            if index + 1 < stack.len() {
                stack.pop(index + 1);
            }
        }

        self.select_in_root_container(router);
        router.set_current(self.id);

        let Some(top) = self.top_scene() else {
            return false;
        };
        match top.navigation_container() {
            Some(container) => pop_to_scene(router, &container, &top, animated),
            None => {
                if let Some(base) = top.dismiss_target() {
                    let removed = base.dismiss_presented();
                    router
                        .presenter()
                        .dismiss(&base, animated, Box::new(move || drop(removed)));
                }
            }
        }
        true
    }

    /// Reflect this navigator's root as the root container's selection
    fn select_in_root_container(&self, router: &Router) {
        let (Some(container), Some(mine)) = (router.root().root_scene(), self.root_scene()) else {
            return;
        };
        let index = container.index_of_child(&mine).or_else(|| {
            container
                .content_children()
                .iter()
                .position(|child| Rc::ptr_eq(child, &mine))
        });
        if let Some(index) = index {
            if container.select(index) {
                router.presenter().select(&container, index);
            }
        }
    }
}

/// Pop `container` until `scene` is visible, or to its root when `scene`
/// is no longer one of its children
fn pop_to_scene(router: &Router, container: &SceneRef, scene: &SceneRef, animated: bool) {
    match container.pop_to(scene) {
        Some(removed) => router.presenter().pop_to(
            container,
            scene,
            animated,
            Box::new(move || drop(removed)),
        ),
        None => {
            warn!(
                container = container.identifier(),
                scene = scene.identifier(),
                "Goto target is not in its container; popping to root"
            );
            let removed = container.pop_to_root();
            router
                .presenter()
                .pop_to_root(container, animated, Box::new(move || drop(removed)));
        }
    }
}

impl Router {
    /// Switch to an existing scene anywhere in the forest
    ///
    /// Tries the root navigator first, then every child navigator, stopping
    /// at the first one that reaches the scene.
    pub fn goto(&self, identifier: &str) -> bool {
        self.goto_with(identifier, self.config().animated)
    }

    pub(crate) fn goto_with(&self, identifier: &str, animated: bool) -> bool {
        if self.root().goto_if_exists(identifier, animated) {
            return true;
        }
        for navigator in self.navigators() {
            if !navigator.is_root() && navigator.goto_if_exists(identifier, animated) {
                return true;
            }
        }
        warn!(
            error = %NavigatorError::GotoTargetNotFound(identifier.to_string()),
            "Goto failed"
        );
        false
    }
}
