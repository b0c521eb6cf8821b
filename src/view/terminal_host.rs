//! The terminal as a grid host.
//!
//! Adapts crossterm's event loop to the host collaborator contract:
//!
//! - the main pane is the scroll region [`MAIN_PANE`]; until the first draw
//!   lays it out the resolver has no region and the grid runs against the root
//! - `Resize` events become width notifications for the pane's inner width
//! - each draw ends a frame; timers fire against a monotonic clock
//! - terminals have no font loading, so there is no fonts-ready signal

use crate::host::{
    FrameScheduler, Host, ManualScheduler, ResizeObserver, ScrollMetrics, ScrollResolver,
    ScrollTarget, SharedResizeObserver, SharedScrollResolver,
};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Scroll region of the main pane.
pub const MAIN_PANE: ScrollTarget = ScrollTarget::Region(1);

/// Longest the event loop sleeps between input polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Host collaborators backed by the terminal.
#[derive(Debug)]
pub struct TerminalHost {
    scroll: Rc<SharedScrollResolver>,
    resize: Rc<SharedResizeObserver>,
    scheduler: Rc<ManualScheduler>,
    started: Instant,
    pane_laid_out: bool,
}

impl TerminalHost {
    /// Host with an unmeasured, not yet laid out pane.
    pub fn new() -> Self {
        Self {
            scroll: Rc::new(SharedScrollResolver::new()),
            resize: Rc::new(SharedResizeObserver::new()),
            scheduler: Rc::new(ManualScheduler::new()),
            started: Instant::now(),
            pane_laid_out: false,
        }
    }

    /// Collaborators to hand to a grid.
    pub fn host(&self) -> Host {
        Host::new(
            Rc::clone(&self.scroll) as Rc<dyn ScrollResolver>,
            Rc::clone(&self.resize) as Rc<dyn ResizeObserver>,
            Rc::clone(&self.scheduler) as Rc<dyn FrameScheduler>,
        )
    }

    /// Report the pane's inner width. Subscribers run if it changed; returns
    /// whether it did.
    pub fn set_pane_width(&self, width: u16) -> bool {
        let width = i64::from(width);
        let changed = self.resize.current_width() != Some(width);
        self.resize.notify(width);
        changed
    }

    /// Publish the pane's scroll metrics, registering the pane as the scroll
    /// region on first call.
    pub fn set_pane_metrics(&mut self, metrics: ScrollMetrics) {
        if self.pane_laid_out {
            self.scroll.set_metrics(MAIN_PANE, metrics);
        } else {
            debug!(?metrics, "main pane laid out");
            self.scroll.set_region(MAIN_PANE, metrics);
            self.pane_laid_out = true;
        }
    }

    /// Whether the pane has been registered as the scroll region.
    pub fn is_pane_laid_out(&self) -> bool {
        self.pane_laid_out
    }

    /// Fire timers that are due. Returns how many ran.
    pub fn fire_timers(&self) -> usize {
        self.scheduler.advance_to(self.started.elapsed())
    }

    /// End the current frame: run the frame callbacks queued so far.
    pub fn end_frame(&self) -> usize {
        self.scheduler.run_frame()
    }

    /// Whether frame callbacks are waiting for the next draw.
    pub fn has_pending_frames(&self) -> bool {
        self.scheduler.pending_frames() > 0
    }

    /// How long the event loop may wait for input before host work is due.
    pub fn next_timeout(&self) -> Duration {
        if self.has_pending_frames() {
            return Duration::ZERO;
        }
        match self.scheduler.next_timer_in() {
            Some(delay) => {
                let due = self.scheduler.now() + delay;
                due.saturating_sub(self.started.elapsed()).min(POLL_INTERVAL)
            }
            None => POLL_INTERVAL,
        }
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn pane_is_not_a_region_until_laid_out() {
        let mut host = TerminalHost::new();
        assert_eq!(host.host().scroll.resolve(), None);

        host.set_pane_metrics(ScrollMetrics::new(0, 20));
        assert!(host.is_pane_laid_out());
        assert_eq!(host.host().scroll.resolve(), Some(MAIN_PANE));
        assert_eq!(host.host().scroll.metrics(MAIN_PANE), Some(ScrollMetrics::new(0, 20)));

        host.set_pane_metrics(ScrollMetrics::new(7, 20));
        assert_eq!(host.host().scroll.metrics(MAIN_PANE), Some(ScrollMetrics::new(7, 20)));
    }

    #[test]
    fn width_notifies_only_on_change() {
        let host = TerminalHost::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        host.host()
            .resize
            .observe(Box::new(move |_| counter.set(counter.get() + 1)));

        assert!(host.set_pane_width(80));
        assert!(!host.set_pane_width(80));
        assert!(host.set_pane_width(100));
        assert_eq!(seen.get(), 2);
        assert_eq!(host.host().resize.current_width(), Some(100));
    }

    #[test]
    fn frames_run_at_end_of_frame() {
        let host = TerminalHost::new();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        host.host().scheduler.request_frame(Box::new(move || flag.set(true)));

        assert!(host.has_pending_frames());
        assert_eq!(host.next_timeout(), Duration::ZERO);
        assert_eq!(host.end_frame(), 1);
        assert!(ran.get());
    }

    #[test]
    fn terminal_has_no_fonts_signal() {
        let host = TerminalHost::new();
        assert!(host.host().scheduler.on_fonts_ready(Box::new(|| {})).is_none());
    }

    #[test]
    fn idle_timeout_is_poll_interval() {
        assert_eq!(TerminalHost::new().next_timeout(), POLL_INTERVAL);
    }
}
