//! Deterministic host shared by the integration tests.

#![allow(dead_code)]

use std::rc::Rc;
use vgrid::grid::{LayoutConfig, VirtualGrid};
use vgrid::host::{
    Host, ManualScheduler, ScrollMetrics, ScrollTarget, SharedResizeObserver,
    SharedScrollResolver,
};

/// Scroll region used by every test host.
pub const PANE: ScrollTarget = ScrollTarget::Region(7);

/// Host collaborators a test drives by hand.
pub struct TestHost {
    pub scroll: Rc<SharedScrollResolver>,
    pub resize: Rc<SharedResizeObserver>,
    pub scheduler: Rc<ManualScheduler>,
}

impl TestHost {
    /// A laid out pane `width` wide with a `viewport` tall window at the top.
    pub fn new(width: i64, viewport: usize) -> Self {
        let scroll = Rc::new(SharedScrollResolver::new());
        scroll.set_region(PANE, ScrollMetrics::new(0, viewport));
        Self {
            scroll,
            resize: Rc::new(SharedResizeObserver::with_width(width)),
            scheduler: Rc::new(ManualScheduler::new()),
        }
    }

    /// No region and no width yet.
    pub fn unmounted() -> Self {
        Self {
            scroll: Rc::new(SharedScrollResolver::new()),
            resize: Rc::new(SharedResizeObserver::new()),
            scheduler: Rc::new(ManualScheduler::new()),
        }
    }

    pub fn host(&self) -> Host {
        Host::new(
            self.scroll.clone(),
            self.resize.clone(),
            self.scheduler.clone(),
        )
    }

    /// Grid over `0..count` whose cells are the item values.
    pub fn grid(&self, count: usize, config: LayoutConfig) -> VirtualGrid<usize, usize> {
        VirtualGrid::new((0..count).collect(), config, |item, _| *item, self.host())
            .expect("valid config")
    }

    /// Move the pane and tell the grid, the way a host scroll event would.
    pub fn scroll_to<T: 'static, R>(&self, grid: &VirtualGrid<T, R>, top: usize, viewport: usize) {
        let metrics = ScrollMetrics::new(top, viewport);
        self.scroll.set_metrics(PANE, metrics);
        assert!(grid.on_scroll(PANE, metrics));
    }

    /// Run frames and all timers until nothing is scheduled.
    pub fn settle(&self) {
        for _ in 0..16 {
            self.scheduler.run_until_idle(16);
            match self.scheduler.next_timer_in() {
                Some(delay) => {
                    self.scheduler.advance(delay);
                }
                None if self.scheduler.is_idle() => return,
                None => {}
            }
        }
    }
}

/// Browser-sized layout used by the scenarios.
pub fn wide_config() -> LayoutConfig {
    LayoutConfig {
        min_item_width: 300,
        min_columns: 1,
        max_columns: None,
        gap: 16,
        overscan: 2,
        estimate_row_height: 260,
    }
}
