//! Deep links and URL opening
//!
//! A deep link is a chain of requests (`A >> B >> C`). Resolution walks the
//! chain through tab and split containers, handing the remainder to the
//! navigator of the selected child, then shows the remaining hops as one
//! jump: every intermediate step is unanimated, so only the final scene
//! animates in while each hop stays on the back stack.

use navigator_core::{DataModel, Mode, NavigatorError};
use tracing::{debug, warn};
use url::Url;

use crate::host::{CommitGroup, Completion};
use crate::navigator::Navigator;

/// Turns a URL into a request
pub type DeepLinkHandler<'a> = &'a dyn Fn(&Url) -> Option<DataModel>;

impl Navigator {
    /// Follow a deep link
    ///
    /// Ignored while the top scene opts out of deep links. `goto` requests
    /// switch to an existing scene; everything else is shown.
    pub fn deep_link(&self, data: &DataModel, animated: bool, completion: Option<Completion>) -> bool {
        if let Some(top) = self.top_scene() {
            if top.content().ignores_deep_links() {
                debug!(navigator = %self.id, top = top.identifier(), "Top scene ignores deep links");
                return false;
            }
        }

        if data.mode() != Mode::Goto {
            return self.show(data, animated, completion);
        }

        let Some(router) = self.router() else {
            return false;
        };
        let switched = router.goto_with(data.identifier(), animated);
        if switched {
            if let Some(completion) = completion {
                completion();
            }
        }
        switched
    }

    /// Open a URL
    ///
    /// `handler` maps the URL onto a request that is followed as a deep link.
    /// Without a handler, or when it declines, the URL goes to the platform.
    pub fn open(&self, url: &Url, handler: Option<DeepLinkHandler<'_>>) -> bool {
        let Some(router) = self.router() else {
            return false;
        };
        match handler.and_then(|handler| handler(url)) {
            Some(data) => self.deep_link(&data, router.config().animated, None),
            None => {
                debug!(navigator = %self.id, url = %url, "Opening URL externally");
                router.presenter().open_external(url);
                false
            }
        }
    }

    /// Resolve a chain starting at `node`
    pub(crate) fn resolve_deep_link(
        &self,
        node: &DataModel,
        animated: bool,
        group: &CommitGroup,
    ) -> bool {
        let Some(router) = self.router() else {
            return false;
        };

        let Some(top) = self.top_scene() else {
            if !self.show_scenes(&router, node, animated, group) {
                return false;
            }
            if node.next().is_some() {
                self.resolve_deep_link(node, animated, group);
            }
            return true;
        };

        let Some(next) = node.next() else {
            return false;
        };

        if top.is_tab_or_split() {
            let children = top.content_children();
            let Some(index) = children
                .iter()
                .position(|child| child.identifier() == next.identifier())
            else {
                warn!(
                    navigator = %self.id,
                    container = top.identifier(),
                    error = %NavigatorError::SceneNotFound(next.identifier().to_string()),
                    "Deep link does not match the container's children"
                );
                return false;
            };

            if top.select(index) {
                router.presenter().select(&top, index);
            }
            let child = router.navigator_of(&children[index]);
            return match child {
                Some(navigator) => {
                    router.set_current(navigator.id);
                    navigator.resolve_deep_link(&next, animated, group);
                    true
                }
                None => {
                    debug!(child = children[index].identifier(), "Selected child has no navigator");
                    true
                }
            };
        }

        let dismiss_to_root = |navigator: &Navigator| {
            if navigator.stack_count() > 1 {
                navigator.dismiss(None, -1, false, Some(group.enter()));
            }
        };
        match top.navigator().and_then(|id| router.navigator(id)) {
            Some(owner) => dismiss_to_root(&owner),
            None => dismiss_to_root(self),
        }

        let mut shown = false;
        let mut hop = Some(next);
        while let Some(current) = hop {
            let following = current.next();
            let last = following.is_none();
            shown |= self.show_scenes(&router, &current, animated && last, group);
            hop = following;
        }
        shown
    }
}
