//! Coalesced, cancelable remeasure scheduling.
//!
//! Several independent sources want the grid remeasured: consecutive frames
//! after mount, a short timer, the fonts-ready signal, item and column
//! changes. They all funnel into [`RemeasureController::request_remeasure`],
//! which keeps at most one pass queued. Row measurement reports are batched
//! the same way through [`RemeasureController::request_flush`].
//!
//! Every task the controller hands to the scheduler is tracked so
//! [`RemeasureController::dispose`] can cancel it, and every task checks the
//! liveness token before doing anything.

use super::liveness::LivenessToken;
use super::{FrameScheduler, Task, TaskHandle};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

/// Default number of consecutive frames that each request a remeasure.
pub const DEFAULT_REMEASURE_FRAMES: usize = 2;
/// Default delay of the timer-based remeasure.
pub const DEFAULT_REMEASURE_DELAY: Duration = Duration::from_millis(120);

/// Trigger tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemeasureConfig {
    /// Consecutive frames that each request a remeasure.
    pub frames: usize,
    /// Delay of the single timer-based request.
    pub delay: Duration,
}

impl Default for RemeasureConfig {
    fn default() -> Self {
        Self {
            frames: DEFAULT_REMEASURE_FRAMES,
            delay: DEFAULT_REMEASURE_DELAY,
        }
    }
}

/// Handles of scheduled tasks, keyed by a local sequence number so a task can
/// drop its own entry when it runs.
#[derive(Default)]
struct TaskSet {
    next_seq: u64,
    handles: HashMap<u64, TaskHandle>,
}

#[derive(Clone, Default)]
struct Tracker(Rc<RefCell<TaskSet>>);

impl Tracker {
    fn reserve(&self) -> u64 {
        let mut set = self.0.borrow_mut();
        set.next_seq += 1;
        set.next_seq
    }

    fn insert(&self, seq: u64, handle: TaskHandle) {
        self.0.borrow_mut().handles.insert(seq, handle);
    }

    fn finish(&self, seq: u64) {
        self.0.borrow_mut().handles.remove(&seq);
    }

    fn drain(&self) -> Vec<TaskHandle> {
        self.0.borrow_mut().handles.drain().map(|(_, h)| h).collect()
    }

    fn len(&self) -> usize {
        self.0.borrow().handles.len()
    }
}

#[derive(Debug, Clone, Copy)]
enum When {
    Frame,
    After(Duration),
    FontsReady,
}

struct Shared {
    scheduler: Rc<dyn FrameScheduler>,
    liveness: LivenessToken,
    config: RemeasureConfig,
    /// Queued passes and flushes.
    jobs: Tracker,
    /// Frame chain, timer and fonts-ready requests from the last trigger set.
    triggers: Tracker,
    remeasure_pending: Cell<bool>,
    flush_pending: Cell<bool>,
    remeasure: Rc<dyn Fn() -> bool>,
    flush: Rc<dyn Fn()>,
}

/// Schedules remeasure passes and measurement flushes for one grid.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct RemeasureController {
    shared: Rc<Shared>,
}

impl RemeasureController {
    /// Create a controller.
    ///
    /// `remeasure` runs one remeasure pass and returns whether it changed the
    /// column count, in which case the full trigger set is scheduled again.
    /// `flush` applies a batch of row measurements. Neither runs while
    /// `liveness` is dead.
    pub fn new(
        scheduler: Rc<dyn FrameScheduler>,
        liveness: LivenessToken,
        config: RemeasureConfig,
        remeasure: Rc<dyn Fn() -> bool>,
        flush: Rc<dyn Fn()>,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                scheduler,
                liveness,
                config,
                jobs: Tracker::default(),
                triggers: Tracker::default(),
                remeasure_pending: Cell::new(false),
                flush_pending: Cell::new(false),
                remeasure,
                flush,
            }),
        }
    }

    /// Queue a remeasure pass for the next frame.
    ///
    /// Returns `false` if a pass is already queued (the request coalesces into
    /// it) or the grid has been disposed.
    pub fn request_remeasure(&self) -> bool {
        let shared = &self.shared;
        if !shared.liveness.is_alive() || shared.remeasure_pending.get() {
            return false;
        }
        shared.remeasure_pending.set(true);

        let this = self.clone();
        self.spawn(&shared.jobs, When::Frame, move || {
            this.shared.remeasure_pending.set(false);
            trace!("remeasure pass");
            if (this.shared.remeasure)() {
                this.schedule_triggers();
            }
        });
        true
    }

    /// Queue a measurement flush for the next frame.
    ///
    /// Returns `false` if a flush is already queued or the grid has been disposed.
    pub fn request_flush(&self) -> bool {
        let shared = &self.shared;
        if !shared.liveness.is_alive() || shared.flush_pending.get() {
            return false;
        }
        shared.flush_pending.set(true);

        let this = self.clone();
        self.spawn(&shared.jobs, When::Frame, move || {
            this.shared.flush_pending.set(false);
            (this.shared.flush)();
        });
        true
    }

    /// Schedule the full trigger set: an immediate request, a chain of
    /// consecutive frame requests, one delayed request and, when the host
    /// supports it, one request on fonts-ready.
    ///
    /// Replaces any trigger set still outstanding from an earlier call.
    pub fn schedule_triggers(&self) {
        let shared = &self.shared;
        if !shared.liveness.is_alive() {
            return;
        }
        for handle in shared.triggers.drain() {
            shared.scheduler.cancel(handle);
        }

        self.request_remeasure();
        self.chain_frames(shared.config.frames);

        let this = self.clone();
        self.spawn(&shared.triggers, When::After(shared.config.delay), move || {
            this.request_remeasure();
        });

        let this = self.clone();
        self.spawn(&shared.triggers, When::FontsReady, move || {
            this.request_remeasure();
        });
    }

    /// Cancel everything outstanding. Safe to call more than once.
    ///
    /// The owner is expected to kill the liveness flag first, so tasks the
    /// host fails to cancel still find it dead when they run.
    pub fn dispose(&self) {
        let shared = &self.shared;
        let handles: Vec<TaskHandle> = shared
            .jobs
            .drain()
            .into_iter()
            .chain(shared.triggers.drain())
            .collect();
        for handle in handles {
            shared.scheduler.cancel(handle);
        }
        shared.remeasure_pending.set(false);
        shared.flush_pending.set(false);
    }

    /// Whether a remeasure pass is queued.
    pub fn is_remeasure_pending(&self) -> bool {
        self.shared.remeasure_pending.get()
    }

    /// Whether a measurement flush is queued.
    pub fn is_flush_pending(&self) -> bool {
        self.shared.flush_pending.get()
    }

    /// Number of tasks currently handed to the scheduler.
    pub fn outstanding(&self) -> usize {
        self.shared.jobs.len() + self.shared.triggers.len()
    }

    fn chain_frames(&self, remaining: usize) {
        if remaining == 0 {
            return;
        }
        let this = self.clone();
        self.spawn(&self.shared.triggers, When::Frame, move || {
            this.request_remeasure();
            this.chain_frames(remaining - 1);
        });
    }

    fn spawn(&self, tracker: &Tracker, when: When, work: impl FnOnce() + 'static) {
        let seq = tracker.reserve();
        let token = self.shared.liveness.clone();
        let owner = tracker.clone();
        let task: Task = Box::new(move || {
            owner.finish(seq);
            if token.is_alive() {
                work();
            }
        });

        let scheduler = &self.shared.scheduler;
        let handle = match when {
            When::Frame => Some(scheduler.request_frame(task)),
            When::After(delay) => Some(scheduler.set_timeout(delay, task)),
            When::FontsReady => scheduler.on_fonts_ready(task),
        };
        if let Some(handle) = handle {
            tracker.insert(seq, handle);
        }
    }
}

impl std::fmt::Debug for RemeasureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemeasureController")
            .field("config", &self.shared.config)
            .field("remeasure_pending", &self.shared.remeasure_pending.get())
            .field("flush_pending", &self.shared.flush_pending.get())
            .field("outstanding", &self.outstanding())
            .finish()
    }
}
