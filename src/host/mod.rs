//! Host environment collaborators.
//!
//! The grid engine never talks to a windowing system directly. Everything it
//! needs from its host comes through three traits:
//!
//! - [`ScrollResolver`]: finds the scrollable ancestor and reads its metrics
//! - [`ResizeObserver`]: reports the content width of the grid's container
//! - [`FrameScheduler`]: frame callbacks, timers and a fonts-ready signal
//!
//! All three are single-threaded and take `&self`; implementations use
//! interior mutability. Scheduled tasks must never run synchronously inside
//! the call that scheduled them.
//!
//! [`manual`] holds deterministic implementations driven explicitly by the
//! caller, used by the terminal host and by tests.

pub mod liveness;
pub mod manual;
pub mod remeasure;

pub use liveness::{Liveness, LivenessToken};
pub use manual::{ManualScheduler, SharedResizeObserver, SharedScrollResolver};
pub use remeasure::{RemeasureConfig, RemeasureController};

use std::rc::Rc;
use std::time::Duration;

/// Identity of a scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// An explicit scroll region designated by the host (the main pane).
    Region(u64),
    /// The root scrolling element; always available.
    Root,
}

/// Scroll state of a scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset of the container.
    pub scroll_top: usize,
    /// Height of the container's visible viewport.
    pub viewport_height: usize,
    /// Distance from the top of the container's content to the top of the grid.
    pub grid_offset: usize,
}

impl ScrollMetrics {
    /// Metrics for a grid placed at the top of its scroll container.
    pub fn new(scroll_top: usize, viewport_height: usize) -> Self {
        Self {
            scroll_top,
            viewport_height,
            grid_offset: 0,
        }
    }
}

/// Locates the scroll container the grid is measured against.
pub trait ScrollResolver {
    /// Nearest explicit scroll region, or `None` if it is not available
    /// (for example, not laid out yet). Must be callable repeatedly.
    fn resolve(&self) -> Option<ScrollTarget>;

    /// Current metrics of `target`, or `None` if it is not available.
    ///
    /// [`ScrollTarget::Root`] should always report metrics.
    fn metrics(&self, target: ScrollTarget) -> Option<ScrollMetrics>;
}

/// Identifier of a resize subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback receiving the container's new content-box width.
pub type ResizeCallback = Box<dyn FnMut(i64)>;

/// Reports size changes of the grid's container.
pub trait ResizeObserver {
    /// Register a callback invoked whenever the width changes.
    fn observe(&self, callback: ResizeCallback) -> SubscriptionId;

    /// Drop a subscription. Its callback must not be invoked afterwards.
    fn unobserve(&self, id: SubscriptionId);

    /// Last known width, if the container has been measured.
    fn current_width(&self) -> Option<i64>;
}

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Frame and timer primitives of the host.
pub trait FrameScheduler {
    /// Run `task` at the next rendering frame.
    fn request_frame(&self, task: Task) -> TaskHandle;

    /// Run `task` once `delay` has elapsed.
    fn set_timeout(&self, delay: Duration, task: Task) -> TaskHandle;

    /// Run `task` once fonts have finished loading.
    ///
    /// Returns `None` (and drops `task`) when the host has no such signal.
    fn on_fonts_ready(&self, task: Task) -> Option<TaskHandle>;

    /// Cancel a scheduled task. Unknown or already-run handles are ignored.
    fn cancel(&self, handle: TaskHandle);
}

/// The set of collaborators handed to a grid.
#[derive(Clone)]
pub struct Host {
    /// Scroll container lookup.
    pub scroll: Rc<dyn ScrollResolver>,
    /// Container width observation.
    pub resize: Rc<dyn ResizeObserver>,
    /// Deferred work.
    pub scheduler: Rc<dyn FrameScheduler>,
}

impl Host {
    /// Bundle the three collaborators.
    pub fn new(
        scroll: Rc<dyn ScrollResolver>,
        resize: Rc<dyn ResizeObserver>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            scroll,
            resize,
            scheduler,
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

/// RAII guard for a resize subscription.
///
/// Unsubscribes on [`ResizeSubscription::dispose`] or on drop.
pub struct ResizeSubscription {
    observer: Rc<dyn ResizeObserver>,
    id: Option<SubscriptionId>,
}

impl ResizeSubscription {
    /// Subscribe `callback` to `observer`.
    pub fn new(observer: Rc<dyn ResizeObserver>, callback: ResizeCallback) -> Self {
        let id = observer.observe(callback);
        Self {
            observer,
            id: Some(id),
        }
    }

    /// Whether the subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Unsubscribe. Calling it again is a no-op.
    pub fn dispose(&mut self) {
        if let Some(id) = self.id.take() {
            self.observer.unobserve(id);
        }
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("id", &self.id)
            .finish()
    }
}
