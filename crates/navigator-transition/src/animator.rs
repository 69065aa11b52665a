//! Animation strategies
//!
//! A [`TransitionAnimator`] decides how surfaces move during a custom
//! transition. The host hands the strategy a [`TransitionContext`] describing
//! the outgoing and incoming surfaces; the strategy drives the animation and
//! reports the outcome through [`TransitionContext::complete`]. The context is
//! consumed by that call, so the outcome reaches the host exactly once.

use std::time::Duration;

use navigator_core::{Rect, SceneId, Size};

use crate::gesture::Axis;

/// Duration used when a strategy does not pick one
pub const DEFAULT_DURATION: Duration = Duration::from_millis(250);

/// A surface taking part in a transition and the frame it animates from/to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    /// Scene whose surface moves
    pub surface: SceneId,
    /// Initial frame for the outgoing surface, final frame for the incoming one
    pub frame: Rect,
}

impl SurfaceFrame {
    /// Create a surface frame
    pub fn new(surface: SceneId, frame: Rect) -> Self {
        Self { surface, frame }
    }
}

type Reporter = Box<dyn FnOnce(bool)>;

/// One running transition as seen by a strategy
pub struct TransitionContext {
    from: Option<SurfaceFrame>,
    to: Option<SurfaceFrame>,
    container: Size,
    is_show: bool,
    is_modal: bool,
    axis: Axis,
    duration: Duration,
    cancelled: bool,
    reporter: Option<Reporter>,
}

impl TransitionContext {
    /// Create a context; `reporter` receives the outcome once
    pub fn new(
        from: Option<SurfaceFrame>,
        to: Option<SurfaceFrame>,
        container: Size,
        reporter: impl FnOnce(bool) + 'static,
    ) -> Self {
        Self {
            from,
            to,
            container,
            is_show: false,
            is_modal: false,
            axis: Axis::Horizontal,
            duration: DEFAULT_DURATION,
            cancelled: false,
            reporter: Some(Box::new(reporter)),
        }
    }

    /// Mark the context as cancelled by the host before it is animated
    pub fn with_cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub(crate) fn configure(&mut self, is_show: bool, is_modal: bool, axis: Axis, duration: Duration) {
        self.is_show = is_show;
        self.is_modal = is_modal;
        self.axis = axis;
        self.duration = duration;
    }

    /// Outgoing surface
    pub fn from(&self) -> Option<SurfaceFrame> {
        self.from
    }

    /// Incoming surface
    pub fn to(&self) -> Option<SurfaceFrame> {
        self.to
    }

    /// Size of the surface hosting both scenes
    pub fn container(&self) -> Size {
        self.container
    }

    /// Whether the transition shows (present/push) rather than dismisses
    pub fn is_show(&self) -> bool {
        self.is_show
    }

    /// Whether the transition is modal rather than stacked
    pub fn is_modal(&self) -> bool {
        self.is_modal
    }

    /// Axis the transition runs along
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Duration the strategy should animate for
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the host cancelled the transition
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Report the outcome to the host
    pub fn complete(mut self, finished: bool) {
        if let Some(reporter) = self.reporter.take() {
            reporter(finished);
        }
    }
}

impl Drop for TransitionContext {
    fn drop(&mut self) {
        if let Some(reporter) = self.reporter.take() {
            tracing::warn!(
                from = ?self.from.map(|f| f.surface),
                to = ?self.to.map(|f| f.surface),
                "Transition context dropped without completing; reporting failure"
            );
            reporter(false);
        }
    }
}

impl std::fmt::Debug for TransitionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionContext")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("container", &self.container)
            .field("is_show", &self.is_show)
            .field("is_modal", &self.is_modal)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

/// Custom animation strategy
///
/// Every method has a default; a strategy that overrides nothing completes
/// immediately and lets the host's stock animation run.
pub trait TransitionAnimator {
    /// How long the animation runs
    fn duration(&self) -> Duration {
        DEFAULT_DURATION
    }

    /// Whether the strategy animates surfaces itself
    ///
    /// Strategies that only shape the presentation (anchored frames) return
    /// false so the host keeps its default animation.
    fn drives_animation(&self) -> bool {
        true
    }

    /// Animate a modal present or dismiss
    fn animate_presenting(&self, context: TransitionContext) {
        let finished = !context.is_cancelled();
        context.complete(finished);
    }

    /// Animate a stacked push or pop
    fn animate_navigation(&self, context: TransitionContext) {
        let finished = !context.is_cancelled();
        context.complete(finished);
    }

    /// Frame of a custom-presented surface inside `bounds`
    fn presentation_frame(&self, source_rect: Rect, _bounds: Size) -> Rect {
        source_rect
    }

    /// Whether a tap outside a custom-presented surface dismisses it
    fn dismiss_on_outside_tap(&self) -> bool {
        true
    }
}

/// Strategy with every default: completes immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateAnimator;

impl TransitionAnimator for ImmediateAnimator {}

/// Cross-fade between surfaces
///
/// The host interpolates the incoming surface's opacity from 0 to 1 on show
/// and the outgoing surface's from 1 to 0 on dismiss; the strategy reports
/// through the context once the host's animation callback fires. Taps outside
/// the surface never dismiss.
pub struct FadeAnimator {
    duration: Duration,
    driver: Box<dyn Fn(FadeStep, Box<dyn FnOnce(bool)>)>,
}

/// One opacity animation the host should run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeStep {
    /// Surface to fade
    pub surface: SceneId,
    /// Starting opacity
    pub from_alpha: f64,
    /// Final opacity
    pub to_alpha: f64,
    /// Animation length
    pub duration: Duration,
}

impl FadeAnimator {
    /// Create a fade strategy whose opacity animations run through `driver`
    pub fn new(driver: impl Fn(FadeStep, Box<dyn FnOnce(bool)>) + 'static) -> Self {
        Self {
            duration: DEFAULT_DURATION,
            driver: Box::new(driver),
        }
    }

    /// Override the fade duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl TransitionAnimator for FadeAnimator {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn animate_presenting(&self, context: TransitionContext) {
        let step = if context.is_show() {
            context.to().map(|to| FadeStep {
                surface: to.surface,
                from_alpha: 0.0,
                to_alpha: 1.0,
                duration: context.duration(),
            })
        } else {
            context.from().map(|from| FadeStep {
                surface: from.surface,
                from_alpha: 1.0,
                to_alpha: 0.0,
                duration: context.duration(),
            })
        };

        match step {
            Some(step) => (self.driver)(
                step,
                Box::new(move |_animated: bool| {
                    let finished = !context.is_cancelled();
                    context.complete(finished);
                }),
            ),
            None => {
                let finished = !context.is_cancelled();
                context.complete(finished);
            }
        }
    }

    fn dismiss_on_outside_tap(&self) -> bool {
        false
    }
}
