//! Deterministic host implementations.
//!
//! These are driven explicitly by their owner: frames run when
//! [`ManualScheduler::run_frame`] is called, timers fire when time is advanced,
//! resize callbacks fire on [`SharedResizeObserver::notify`]. The terminal host
//! drives them from its event loop; tests drive them step by step.

use super::{
    FrameScheduler, ResizeCallback, ResizeObserver, ScrollMetrics, ScrollResolver, ScrollTarget,
    SubscriptionId, Task, TaskHandle,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
struct SchedulerState {
    next_id: u64,
    now: Duration,
    frames: Vec<(TaskHandle, Task)>,
    timers: Vec<(TaskHandle, Duration, Task)>,
    /// `None` when the host has no fonts-ready signal.
    fonts: Option<Vec<(TaskHandle, Task)>>,
    fonts_loaded: bool,
}

impl SchedulerState {
    fn next_handle(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle(self.next_id)
    }
}

/// Frame/timer scheduler advanced by hand.
///
/// Tasks queued while a frame runs are deferred to the following frame.
pub struct ManualScheduler {
    state: RefCell<SchedulerState>,
}

impl ManualScheduler {
    /// Scheduler without a fonts-ready signal.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(SchedulerState::default()),
        }
    }

    /// Scheduler with a fonts-ready signal, fired by [`ManualScheduler::fonts_loaded`].
    pub fn with_fonts_signal() -> Self {
        let scheduler = Self::new();
        scheduler.state.borrow_mut().fonts = Some(Vec::new());
        scheduler
    }

    /// Run every frame task queued before this call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let tasks = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }

    /// Run frames until none are queued, up to `max_frames`. Returns frames run.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending_frames() > 0 {
            self.run_frame();
            frames += 1;
        }
        frames
    }

    /// Advance the clock by `by` and fire due timers. Returns how many fired.
    pub fn advance(&self, by: Duration) -> usize {
        let now = self.state.borrow().now + by;
        self.advance_to(now)
    }

    /// Move the clock to `now` (never backwards) and fire due timers in due order.
    pub fn advance_to(&self, now: Duration) -> usize {
        let due = {
            let mut state = self.state.borrow_mut();
            if now > state.now {
                state.now = now;
            }
            let now = state.now;
            let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut state.timers)
                .into_iter()
                .partition(|(_, at, _)| *at <= now);
            state.timers = pending;
            due.sort_by_key(|(handle, at, _)| (*at, handle.0));
            due
        };
        let count = due.len();
        for (_, _, task) in due {
            task();
        }
        count
    }

    /// Signal that fonts finished loading. Later registrations fire at the next frame.
    pub fn fonts_loaded(&self) -> usize {
        let tasks = {
            let mut state = self.state.borrow_mut();
            state.fonts_loaded = true;
            match state.fonts.as_mut() {
                Some(waiting) => std::mem::take(waiting),
                None => Vec::new(),
            }
        };
        let count = tasks.len();
        for (_, task) in tasks {
            task();
        }
        count
    }

    /// Current clock value.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of queued frame tasks.
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Number of timers not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Time until the earliest pending timer, if any.
    pub fn next_timer_in(&self) -> Option<Duration> {
        let state = self.state.borrow();
        state
            .timers
            .iter()
            .map(|(_, at, _)| at.saturating_sub(state.now))
            .min()
    }

    /// True when no frame, timer or fonts task is pending.
    pub fn is_idle(&self) -> bool {
        let state = self.state.borrow();
        state.frames.is_empty()
            && state.timers.is_empty()
            && state.fonts.as_ref().is_none_or(|waiting| waiting.is_empty())
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("frames", &state.frames.len())
            .field("timers", &state.timers.len())
            .finish()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, task: Task) -> TaskHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.next_handle();
        state.frames.push((handle, task));
        handle
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TaskHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.next_handle();
        let at = state.now + delay;
        state.timers.push((handle, at, task));
        handle
    }

    fn on_fonts_ready(&self, task: Task) -> Option<TaskHandle> {
        let mut state = self.state.borrow_mut();
        state.fonts.as_ref()?;
        let handle = state.next_handle();
        if state.fonts_loaded {
            // Already loaded: still deferred, never synchronous.
            state.frames.push((handle, task));
        } else if let Some(waiting) = state.fonts.as_mut() {
            waiting.push((handle, task));
        }
        Some(handle)
    }

    fn cancel(&self, handle: TaskHandle) {
        // Removed tasks are dropped outside the borrow; their captures may
        // hold references back into this scheduler.
        let removed: Vec<Task> = {
            let mut state = self.state.borrow_mut();
            let mut removed = Vec::new();
            if let Some(pos) = state.frames.iter().position(|(h, _)| *h == handle) {
                removed.push(state.frames.remove(pos).1);
            }
            if let Some(pos) = state.timers.iter().position(|(h, _, _)| *h == handle) {
                removed.push(state.timers.remove(pos).2);
            }
            if let Some(waiting) = state.fonts.as_mut() {
                if let Some(pos) = waiting.iter().position(|(h, _)| *h == handle) {
                    removed.push(waiting.remove(pos).1);
                }
            }
            removed
        };
        drop(removed);
    }
}

type SharedCallback = Rc<RefCell<ResizeCallback>>;

#[derive(Default)]
struct ObserverState {
    next_id: u64,
    width: Option<i64>,
    callbacks: Vec<(SubscriptionId, SharedCallback)>,
}

/// Resize observer whose width is pushed by the host.
#[derive(Default)]
pub struct SharedResizeObserver {
    state: RefCell<ObserverState>,
}

impl SharedResizeObserver {
    /// Observer with no known width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer with a known initial width.
    pub fn with_width(width: i64) -> Self {
        let observer = Self::new();
        observer.state.borrow_mut().width = Some(width);
        observer
    }

    /// Record a new width and invoke subscribers if it changed.
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify(&self, width: i64) -> usize {
        let callbacks: Vec<SharedCallback> = {
            let mut state = self.state.borrow_mut();
            if state.width == Some(width) {
                return 0;
            }
            state.width = Some(width);
            state.callbacks.iter().map(|(_, cb)| Rc::clone(cb)).collect()
        };
        for callback in &callbacks {
            (callback.borrow_mut())(width);
        }
        callbacks.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().callbacks.len()
    }
}

impl std::fmt::Debug for SharedResizeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SharedResizeObserver")
            .field("width", &state.width)
            .field("subscribers", &state.callbacks.len())
            .finish()
    }
}

impl ResizeObserver for SharedResizeObserver {
    fn observe(&self, callback: ResizeCallback) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.callbacks.push((id, Rc::new(RefCell::new(callback))));
        id
    }

    fn unobserve(&self, id: SubscriptionId) {
        let removed = {
            let mut state = self.state.borrow_mut();
            state
                .callbacks
                .iter()
                .position(|(sid, _)| *sid == id)
                .map(|pos| state.callbacks.remove(pos))
        };
        drop(removed);
    }

    fn current_width(&self) -> Option<i64> {
        self.state.borrow().width
    }
}

#[derive(Debug, Default)]
struct ResolverState {
    region: Option<ScrollTarget>,
    metrics: HashMap<ScrollTarget, ScrollMetrics>,
}

/// Scroll resolver whose region and metrics are pushed by the host.
///
/// Starts with no region (only the root is available).
#[derive(Debug, Default)]
pub struct SharedScrollResolver {
    state: RefCell<ResolverState>,
}

impl SharedScrollResolver {
    /// Resolver with only a root container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `region` the designated scroll region with the given metrics.
    pub fn set_region(&self, region: ScrollTarget, metrics: ScrollMetrics) {
        let mut state = self.state.borrow_mut();
        state.region = Some(region);
        state.metrics.insert(region, metrics);
    }

    /// Remove the designated region (e.g. the pane was unmounted).
    pub fn clear_region(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(region) = state.region.take() {
            state.metrics.remove(&region);
        }
    }

    /// Update metrics for a target.
    pub fn set_metrics(&self, target: ScrollTarget, metrics: ScrollMetrics) {
        self.state.borrow_mut().metrics.insert(target, metrics);
    }
}

impl ScrollResolver for SharedScrollResolver {
    fn resolve(&self) -> Option<ScrollTarget> {
        self.state.borrow().region
    }

    fn metrics(&self, target: ScrollTarget) -> Option<ScrollMetrics> {
        let state = self.state.borrow();
        match state.metrics.get(&target) {
            Some(metrics) => Some(*metrics),
            None if target == ScrollTarget::Root => Some(ScrollMetrics::default()),
            None => None,
        }
    }
}
