//! Interactive transition engine
//!
//! A [`Transition`] is bound to one shown scene. The host asks it for an
//! animator when presenting, dismissing, pushing or popping, runs the
//! animation through [`Transition::animate`], and forwards recognizer events
//! to [`Transition::handle_gesture`]. Everything the engine needs from the
//! host (recognizers, percent-driven progress, starting a primitive "live")
//! goes through [`TransitionHost`].
//!
//! All methods take `&self`: the host may call back into the transition from
//! inside any [`TransitionHost`] method.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use navigator_core::{Point, Rect, SceneId, Size};

use crate::animator::{TransitionAnimator, TransitionContext};
use crate::gesture::{Axis, GestureEvent, Orientation, RecognizerKind};
use crate::state::{GestureMachine, GestureOutcome, GesturePhase};

/// Primitive the host should start when a drag begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveAction {
    /// Present `presented` from `presenting`
    Present {
        /// Scene being presented
        presented: SceneId,
        /// Scene presenting it
        presenting: SceneId,
    },
    /// Dismiss `presented`
    Dismiss {
        /// Scene being dismissed
        presented: SceneId,
    },
    /// Push onto a navigation container
    Push {
        /// Navigation container
        container: SceneId,
        /// Scene to push, if known
        scene: Option<SceneId>,
    },
    /// Pop the top of a navigation container
    Pop {
        /// Navigation container
        container: SceneId,
    },
}

/// Host services used by a transition
#[cfg_attr(test, mockall::automock)]
pub trait TransitionHost {
    /// Install a recognizer on a scene's surface
    fn attach_recognizer(&self, surface: SceneId, kind: RecognizerKind);

    /// Remove a recognizer from a scene's surface
    fn detach_recognizer(&self, surface: SceneId, kind: RecognizerKind);

    /// Set the percent-driven progress of the running transition
    fn update(&self, percent: f64);

    /// Commit the running transition
    fn finish(&self);

    /// Revert the running transition
    fn cancel(&self);

    /// Start a primitive driven by the gesture
    fn begin_live(&self, action: LiveAction);
}

/// Custom, optionally interactive, transition bound to one scene
pub struct Transition {
    key: String,
    animator: Box<dyn TransitionAnimator>,
    host: RefCell<Option<Weak<dyn TransitionHost>>>,

    interactive_gesture_enabled: Cell<bool>,
    orientation: Cell<Orientation>,
    preferred_presentation_height: Cell<f64>,
    source_rect: Cell<Rect>,
    animation_duration: Cell<Option<Duration>>,

    is_show: Cell<bool>,
    is_modal: Cell<bool>,
    in_flight: Cell<bool>,
    machine: Cell<GestureMachine>,
    recognizer: Cell<Option<(SceneId, RecognizerKind)>>,

    presented: Cell<Option<SceneId>>,
    presenting: Cell<Option<SceneId>>,
    container: Cell<Option<SceneId>>,
}

impl Transition {
    /// Wrap a strategy registered under `key`
    pub fn new(key: impl Into<String>, animator: Box<dyn TransitionAnimator>) -> Self {
        Self {
            key: key.into(),
            animator,
            host: RefCell::new(None),
            interactive_gesture_enabled: Cell::new(true),
            orientation: Cell::new(Orientation::Default),
            preferred_presentation_height: Cell::new(0.0),
            source_rect: Cell::new(Rect::ZERO),
            animation_duration: Cell::new(None),
            is_show: Cell::new(false),
            is_modal: Cell::new(false),
            in_flight: Cell::new(false),
            machine: Cell::new(GestureMachine::new()),
            recognizer: Cell::new(None),
            presented: Cell::new(None),
            presenting: Cell::new(None),
            container: Cell::new(None),
        }
    }

    /// Connect the host; the transition keeps only a weak reference
    pub fn set_host(&self, host: &Rc<dyn TransitionHost>) {
        *self.host.borrow_mut() = Some(Rc::downgrade(host));
    }

    fn host(&self) -> Option<Rc<dyn TransitionHost>> {
        self.host.borrow().as_ref().and_then(Weak::upgrade)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Registry key this transition was built from
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying strategy
    pub fn animator(&self) -> &dyn TransitionAnimator {
        self.animator.as_ref()
    }

    /// Whether dragging can drive the transition
    pub fn interactive_gesture_enabled(&self) -> bool {
        self.interactive_gesture_enabled.get()
    }

    /// Enable or disable drag interaction
    pub fn set_interactive_gesture_enabled(&self, enabled: bool) {
        self.interactive_gesture_enabled.set(enabled);
    }

    /// Requested orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation.get()
    }

    /// Override the orientation
    pub fn set_orientation(&self, orientation: Orientation) {
        self.orientation.set(orientation);
    }

    /// Axis progress is measured along
    pub fn axis(&self) -> Axis {
        self.orientation.get().axis(self.is_modal.get())
    }

    /// Preferred height of a custom-presented surface, zero when unset
    pub fn preferred_presentation_height(&self) -> f64 {
        self.preferred_presentation_height.get()
    }

    /// Set the preferred presentation height
    pub fn set_preferred_presentation_height(&self, height: f64) {
        self.preferred_presentation_height.set(height);
    }

    /// Anchor rect of a custom-presented surface
    pub fn source_rect(&self) -> Rect {
        self.source_rect.get()
    }

    /// Set the anchor rect
    pub fn set_source_rect(&self, rect: Rect) {
        self.source_rect.set(rect);
    }

    /// Animation duration: the per-instance override or the strategy's own
    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
            .get()
            .unwrap_or_else(|| self.animator.duration())
    }

    /// Override the animation duration for this instance
    pub fn set_animation_duration(&self, duration: Option<Duration>) {
        self.animation_duration.set(duration);
    }

    /// Frame of the custom-presented surface inside `bounds`
    pub fn presentation_frame(&self, bounds: Size) -> Rect {
        let mut source = self.source_rect.get();
        let preferred = self.preferred_presentation_height.get();
        if preferred > 0.0 {
            source.size.height = preferred;
        }
        self.animator.presentation_frame(source, bounds)
    }

    /// Whether a tap outside the presented surface dismisses it
    pub fn dismiss_on_outside_tap(&self) -> bool {
        self.animator.dismiss_on_outside_tap()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Whether the current transition shows rather than dismisses
    pub fn is_show(&self) -> bool {
        self.is_show.get()
    }

    /// Whether the current transition is modal
    pub fn is_modal(&self) -> bool {
        self.is_modal.get()
    }

    /// Whether a finger is driving the transition
    pub fn is_interactive(&self) -> bool {
        self.machine.get().is_interactive()
    }

    /// Gesture phase
    pub fn phase(&self) -> GesturePhase {
        self.machine.get().phase()
    }

    /// Surface the recognizer is attached to
    pub fn attached_surface(&self) -> Option<SceneId> {
        self.recognizer.get().map(|(surface, _)| surface)
    }

    // =========================================================================
    // Host entry points
    // =========================================================================

    /// A modal present is starting
    ///
    /// Returns the transition when its strategy animates surfaces itself;
    /// none tells the host to use its stock animation.
    pub fn animation_for_presented(&self, presented: SceneId, presenting: SceneId) -> Option<&Self> {
        self.is_show.set(true);
        self.is_modal.set(true);
        self.presented.set(Some(presented));
        self.presenting.set(Some(presenting));
        self.attach_if_needed(presented);
        self.driving()
    }

    /// A modal dismiss is starting
    pub fn animation_for_dismissed(&self) -> Option<&Self> {
        self.driving()
    }

    /// Interaction controller for a modal dismiss
    pub fn interaction_for_dismissal(&self) -> Option<&Self> {
        self.is_show.set(false);
        if self.is_interactive() {
            self.driving()
        } else {
            None
        }
    }

    /// A stacked push or pop between two indices of `container`
    ///
    /// The transition counts as a show when the target index is above the
    /// source index.
    pub fn animation_for_navigation(
        &self,
        from_index: Option<usize>,
        to_index: Option<usize>,
        container: SceneId,
    ) -> Option<&Self> {
        let is_show = matches!((from_index, to_index), (Some(from), Some(to)) if to > from);
        self.is_show.set(is_show);
        self.is_modal.set(false);
        self.container.set(Some(container));
        self.attach_if_needed(container);
        self.driving()
    }

    /// Interaction controller for a stacked push or pop
    pub fn interaction_for_navigation(&self) -> Option<&Self> {
        if self.is_interactive() {
            Some(self)
        } else {
            None
        }
    }

    /// Run the strategy for the current transition
    pub fn animate(&self, mut context: TransitionContext) {
        let is_modal = self.is_modal.get();
        context.configure(
            self.is_show.get(),
            is_modal,
            self.axis(),
            self.animation_duration(),
        );
        self.in_flight.set(true);
        if is_modal {
            self.animator.animate_presenting(context);
        } else {
            self.animator.animate_navigation(context);
        }
    }

    /// The host finished the transition
    ///
    /// Dismissals, pops and cancelled shows release the recognizer. A
    /// completed show keeps it so the user can drag the scene back.
    pub fn animation_ended(&self, completed: bool) {
        let was_show = self.is_show.get();
        self.is_show.set(false);
        self.in_flight.set(false);
        self.reset_machine();
        if !was_show || !completed {
            self.detach();
        }
    }

    /// Feed one recognizer event
    pub fn handle_gesture(&self, event: GestureEvent) {
        let mut machine = self.machine.get();
        let outcome = machine.handle(event, self.axis());
        self.machine.set(machine);

        match outcome {
            GestureOutcome::Begin { velocity } => {
                if let Some(action) = self.live_action(velocity) {
                    tracing::debug!(key = %self.key, ?action, "Starting interactive transition");
                    if let Some(host) = self.host() {
                        host.begin_live(action);
                    }
                }
            }
            GestureOutcome::Update(percent) => {
                if let Some(host) = self.host() {
                    host.update(percent);
                }
            }
            GestureOutcome::Finish | GestureOutcome::Cancel => {
                if let Some(host) = self.host() {
                    if outcome == GestureOutcome::Finish {
                        host.finish();
                    } else {
                        host.cancel();
                    }
                }
                // Nothing started live, so no animation_ended will follow
                if !self.in_flight.get() {
                    self.reset_machine();
                }
            }
            GestureOutcome::Ignored => {
                tracing::trace!(key = %self.key, ?event, "Gesture event ignored");
            }
        }
    }

    /// Release the recognizer from the surface it is attached to
    pub fn detach(&self) {
        if let Some((surface, kind)) = self.recognizer.take() {
            if let Some(host) = self.host() {
                host.detach_recognizer(surface, kind);
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn driving(&self) -> Option<&Self> {
        if self.animator.drives_animation() {
            Some(self)
        } else {
            None
        }
    }

    fn reset_machine(&self) {
        let mut machine = self.machine.get();
        machine.complete();
        self.machine.set(machine);
    }

    fn attach_if_needed(&self, surface: SceneId) {
        if !self.interactive_gesture_enabled.get() || self.recognizer.get().is_some() {
            return;
        }
        let Some(host) = self.host() else {
            return;
        };
        let kind = RecognizerKind::for_axis(self.axis());
        self.recognizer.set(Some((surface, kind)));
        host.attach_recognizer(surface, kind);
    }

    fn live_action(&self, velocity: Point) -> Option<LiveAction> {
        if self.is_modal.get() {
            let presented = self.presented.get()?;
            if self.is_show.get() {
                let presenting = self.presenting.get()?;
                (velocity.y < 0.0).then_some(LiveAction::Present {
                    presented,
                    presenting,
                })
            } else {
                (velocity.y > 0.0).then_some(LiveAction::Dismiss { presented })
            }
        } else {
            let container = self.container.get()?;
            if self.is_show.get() {
                Some(LiveAction::Push {
                    container,
                    scene: self.presented.get(),
                })
            } else {
                Some(LiveAction::Pop { container })
            }
        }
    }
}

impl Drop for Transition {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("key", &self.key)
            .field("is_show", &self.is_show.get())
            .field("is_modal", &self.is_modal.get())
            .field("phase", &self.phase())
            .field("recognizer", &self.recognizer.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::ImmediateAnimator;
    use crate::anchored::AnchoredTransition;
    use crate::gesture::GestureSample;
    use mockall::predicate::eq;

    fn transition() -> Transition {
        Transition::new("custom", Box::new(ImmediateAnimator))
    }

    fn bound(host: &Rc<dyn TransitionHost>) -> Transition {
        let transition = transition();
        transition.set_host(host);
        transition
    }

    fn shared(mock: MockTransitionHost) -> Rc<dyn TransitionHost> {
        Rc::new(mock)
    }

    fn began(velocity: Point) -> GestureEvent {
        GestureEvent::Began(GestureSample::new(
            Point::ZERO,
            Point::ZERO,
            velocity,
            Size::new(300.0, 600.0),
        ))
    }

    fn ended(translation: Point) -> GestureEvent {
        GestureEvent::Ended(GestureSample::new(
            Point::ZERO,
            translation,
            Point::ZERO,
            Size::new(300.0, 600.0),
        ))
    }

    #[test]
    fn test_present_attaches_single_vertical_recognizer() {
        let (presented, presenting) = (SceneId::new(), SceneId::new());
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer()
            .with(eq(presented), eq(RecognizerKind::Pan))
            .times(1)
            .return_const(());
        mock.expect_detach_recognizer()
            .with(eq(presented), eq(RecognizerKind::Pan))
            .times(1)
            .return_const(());

        let host = shared(mock);
        let transition = bound(&host);

        assert!(transition
            .animation_for_presented(presented, presenting)
            .is_some());
        assert!(transition.is_show());
        assert!(transition.is_modal());
        assert_eq!(transition.axis(), Axis::Vertical);

        // Second request must not attach again
        transition.animation_for_presented(presented, presenting);
        assert_eq!(transition.attached_surface(), Some(presented));
    }

    #[test]
    fn test_disabled_gesture_never_attaches() {
        let mock = MockTransitionHost::new();
        let host = shared(mock);
        let transition = bound(&host);
        transition.set_interactive_gesture_enabled(false);

        transition.animation_for_presented(SceneId::new(), SceneId::new());
        assert!(transition.attached_surface().is_none());
    }

    #[test]
    fn test_anchored_strategy_defers_to_host_animation() {
        let transition = Transition::new("overlay", Box::new(AnchoredTransition::bottom()));
        transition.set_interactive_gesture_enabled(false);
        assert!(transition
            .animation_for_presented(SceneId::new(), SceneId::new())
            .is_none());
        assert!(transition.animation_for_dismissed().is_none());

        transition.set_source_rect(Rect::new(0.0, 0.0, 0.0, 100.0));
        transition.set_preferred_presentation_height(250.0);
        assert_eq!(
            transition.presentation_frame(Size::new(400.0, 800.0)),
            Rect::new(0.0, 550.0, 400.0, 250.0)
        );
    }

    #[test]
    fn test_navigation_direction_from_indices() {
        let container = SceneId::new();
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer()
            .with(eq(container), eq(RecognizerKind::LeftEdgePan))
            .times(1)
            .return_const(());
        mock.expect_detach_recognizer().return_const(());

        let host = shared(mock);
        let transition = bound(&host);

        transition.animation_for_navigation(Some(0), Some(1), container);
        assert!(transition.is_show());
        assert!(!transition.is_modal());
        assert_eq!(transition.axis(), Axis::Horizontal);

        transition.animation_for_navigation(Some(2), Some(1), container);
        assert!(!transition.is_show());

        transition.animation_for_navigation(None, Some(1), container);
        assert!(!transition.is_show());
    }

    #[test]
    fn test_drag_pops_and_finishes() {
        let container = SceneId::new();
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer().return_const(());
        mock.expect_begin_live()
            .with(eq(LiveAction::Pop { container }))
            .times(1)
            .return_const(());
        mock.expect_update().times(1).return_const(());
        mock.expect_finish().times(1).return_const(());
        mock.expect_cancel().never();
        mock.expect_detach_recognizer()
            .with(eq(container), eq(RecognizerKind::LeftEdgePan))
            .times(1)
            .return_const(());

        let host = shared(mock);
        let transition = bound(&host);
        transition.animation_for_navigation(Some(1), Some(0), container);

        transition.handle_gesture(began(Point::new(100.0, 0.0)));
        assert!(transition.is_interactive());
        assert!(transition.interaction_for_navigation().is_some());

        transition.handle_gesture(GestureEvent::Changed(GestureSample::new(
            Point::ZERO,
            Point::new(60.0, 0.0),
            Point::ZERO,
            Size::new(300.0, 600.0),
        )));
        transition.handle_gesture(ended(Point::new(200.0, 0.0)));
        assert!(!transition.is_interactive());

        transition.animation_ended(true);
        assert_eq!(transition.phase(), GesturePhase::Idle);
        assert!(transition.attached_surface().is_none());
    }

    #[test]
    fn test_short_drag_cancels() {
        let container = SceneId::new();
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer().return_const(());
        mock.expect_begin_live().return_const(());
        mock.expect_finish().never();
        mock.expect_cancel().times(1).return_const(());
        mock.expect_detach_recognizer().return_const(());

        let host = shared(mock);
        let transition = bound(&host);
        transition.animation_for_navigation(Some(1), Some(0), container);

        transition.handle_gesture(began(Point::ZERO));
        transition.handle_gesture(ended(Point::new(100.0, 0.0)));
        // No context was animated, so the machine is ready again
        assert_eq!(transition.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_modal_show_goes_live_only_when_dragging_up() {
        let (presented, presenting) = (SceneId::new(), SceneId::new());
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer().return_const(());
        mock.expect_begin_live()
            .with(eq(LiveAction::Present {
                presented,
                presenting,
            }))
            .times(1)
            .return_const(());
        mock.expect_cancel().return_const(());
        mock.expect_detach_recognizer().return_const(());

        let host = shared(mock);
        let transition = bound(&host);
        transition.animation_for_presented(presented, presenting);

        transition.handle_gesture(began(Point::new(0.0, 40.0)));
        transition.handle_gesture(GestureEvent::Cancelled);
        transition.handle_gesture(began(Point::new(0.0, -40.0)));
    }

    #[test]
    fn test_modal_dismiss_goes_live_when_dragging_down() {
        let (presented, presenting) = (SceneId::new(), SceneId::new());
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer().return_const(());
        mock.expect_begin_live()
            .with(eq(LiveAction::Dismiss { presented }))
            .times(1)
            .return_const(());
        mock.expect_detach_recognizer().times(1).return_const(());

        let host = shared(mock);
        let transition = bound(&host);
        transition.animation_for_presented(presented, presenting);
        transition.animation_ended(true);
        // Completed show keeps the recognizer for drag-to-dismiss
        assert_eq!(transition.attached_surface(), Some(presented));

        transition.handle_gesture(began(Point::new(0.0, 120.0)));
        assert!(transition.interaction_for_dismissal().is_some());
        assert!(!transition.is_show());
    }

    #[test]
    fn test_animate_configures_context() {
        let transition = transition();
        transition.set_interactive_gesture_enabled(false);
        transition.set_animation_duration(Some(Duration::from_millis(400)));
        transition.animation_for_presented(SceneId::new(), SceneId::new());

        let outcome = Rc::new(Cell::new(None));
        let sink = outcome.clone();
        let context = TransitionContext::new(None, None, Size::new(10.0, 10.0), move |finished| {
            sink.set(Some(finished))
        });
        transition.animate(context);
        assert_eq!(outcome.get(), Some(true));
        assert_eq!(transition.animation_duration(), Duration::from_millis(400));
    }

    #[test]
    fn test_drop_detaches_recognizer() {
        let surface = SceneId::new();
        let mut mock = MockTransitionHost::new();
        mock.expect_attach_recognizer().return_const(());
        mock.expect_detach_recognizer()
            .with(eq(surface), eq(RecognizerKind::Pan))
            .times(1)
            .return_const(());

        let host = shared(mock);
        let transition = bound(&host);
        transition.animation_for_presented(surface, SceneId::new());
        drop(transition);
    }
}
