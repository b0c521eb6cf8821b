//! VirtualGrid - responsive, virtualized grid layout engine
//!
//! Maps a flat item sequence into rows of a responsive column count and
//! mounts only the rows intersecting the scroll viewport (plus overscan).
//!
//! # Input streams
//!
//! - Resize notifications ([`VirtualGrid::on_resize`] or the subscribed
//!   [`ResizeObserver`](crate::host::ResizeObserver) callback): may change the
//!   column count, which resets the measured-height map and schedules a
//!   remeasure.
//! - Scroll notifications ([`VirtualGrid::on_scroll`]): recompute the mounted
//!   range only.
//! - Row measurements ([`VirtualGrid::measure_row`]): batched, applied by one
//!   deferred flush per batch.
//!
//! Deferred work lives in the host scheduler and is cancelled on
//! [`VirtualGrid::dispose`] (or drop); anything that slips through sees a dead
//! liveness flag and does nothing.

use super::columns::{compute_columns, ContainerMetrics};
use super::frame::{GridFrame, MountedRow};
use super::layout_config::{LayoutConfig, LayoutConfigError};
use super::rows::RowPartition;
use super::types::{ItemIndex, Offset, RowHeight, RowIndex};
use super::virtualizer::{FenwickVirtualizer, RowVirtualizer};
use super::visible_range::{VisibleRange, Window};
use crate::host::{
    Host, Liveness, RemeasureConfig, RemeasureController, ResizeObserver, ResizeSubscription,
    ScrollMetrics, ScrollResolver, ScrollTarget,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

/// Maps an item and its absolute index to a renderable.
///
/// Must be pure: it is called again every time the item's row is mounted.
pub type RenderItem<T, R> = Box<dyn Fn(&T, ItemIndex) -> R>;

/// Transient layout state shared with deferred callbacks.
struct GridCore<T> {
    config: LayoutConfig,
    items: Vec<T>,
    container: ContainerMetrics,
    columns: usize,
    partition: RowPartition,
    rows: Box<dyn RowVirtualizer>,
    target: ScrollTarget,
    /// Running against the root because the resolver had no region.
    degraded: bool,
    scroll: Option<ScrollMetrics>,
    generation: u64,
}

impl<T> GridCore<T> {
    fn window(&self) -> Option<Window> {
        match self.scroll {
            Some(m) => Window::from_container(m.scroll_top, m.viewport_height, m.grid_offset),
            // Viewport unknown: mount the first row plus overscan.
            None => Some(Window::default()),
        }
    }

    fn refresh_window(&mut self) {
        let window = self.window();
        self.rows.update_window(window);
    }

    /// Returns true if the column count changed.
    fn apply_width(&mut self, width: i64) -> bool {
        self.container = ContainerMetrics::new(width);
        let columns = compute_columns(width, &self.config);
        if columns == self.columns {
            return false;
        }
        debug!(from = self.columns, to = columns, width, "column count changed");
        self.columns = columns;
        self.repartition(true);
        true
    }

    /// Rebuild the row mapping. `reset` discards all measurements (row
    /// identities changed); otherwise surviving rows keep theirs.
    fn repartition(&mut self, reset: bool) {
        self.partition = RowPartition::new(self.items.len(), self.columns);
        let row_count = self.partition.row_count();
        if reset {
            self.rows.reset(row_count);
        } else {
            self.rows.resize_rows(row_count);
        }
        self.refresh_window();
    }

    fn revalidate(&mut self, resolver: &dyn ScrollResolver) {
        let previous = self.target;
        match resolver.resolve() {
            Some(target) => {
                self.target = target;
                self.degraded = false;
            }
            None => {
                self.target = ScrollTarget::Root;
                self.degraded = true;
            }
        }
        if previous != self.target {
            debug!(?previous, target = ?self.target, degraded = self.degraded, "scroll target changed");
            self.scroll = resolver.metrics(self.target);
        }
    }

    /// Returns true if a new width changed the column count. The measurements
    /// were reset, so the caller schedules the full trigger set again.
    fn remeasure_pass(&mut self, resolver: &dyn ScrollResolver, observer: &dyn ResizeObserver) -> bool {
        if self.degraded || resolver.metrics(self.target).is_none() {
            self.revalidate(resolver);
        }
        if let Some(metrics) = resolver.metrics(self.target) {
            self.scroll = Some(metrics);
        }
        let columns_changed = match observer.current_width() {
            Some(width) if width != self.container.width => self.apply_width(width),
            _ => false,
        };
        self.rows.flush();
        self.refresh_window();
        self.generation += 1;
        trace!(
            generation = self.generation,
            columns = self.columns,
            rows = self.rows.row_count(),
            "remeasure pass complete"
        );
        columns_changed
    }
}

fn resize_core<T>(core: &Weak<RefCell<GridCore<T>>>, remeasure: &RemeasureController, width: i64) {
    let Some(core) = core.upgrade() else {
        return;
    };
    let columns_changed = core.borrow_mut().apply_width(width);
    if columns_changed {
        remeasure.schedule_triggers();
    }
}

/// The virtualized grid layout engine.
///
/// All methods take `&self`; state is shared with the callbacks the grid
/// registers on its [`Host`]. `render_item` must not call back into the grid.
pub struct VirtualGrid<T, R> {
    core: Rc<RefCell<GridCore<T>>>,
    render_item: RenderItem<T, R>,
    host: Host,
    liveness: Liveness,
    remeasure: RemeasureController,
    subscription: ResizeSubscription,
}

impl<T: 'static, R> VirtualGrid<T, R> {
    /// Mount a grid with default remeasure triggers and the Fenwick virtualizer.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutConfigError`] if `config` violates its invariants.
    pub fn new(
        items: Vec<T>,
        config: LayoutConfig,
        render_item: impl Fn(&T, ItemIndex) -> R + 'static,
        host: Host,
    ) -> Result<Self, LayoutConfigError> {
        Self::with_options(items, config, RemeasureConfig::default(), render_item, host)
    }

    /// Mount a grid with custom remeasure trigger tuning.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutConfigError`] if `config` violates its invariants.
    pub fn with_options(
        items: Vec<T>,
        config: LayoutConfig,
        remeasure_config: RemeasureConfig,
        render_item: impl Fn(&T, ItemIndex) -> R + 'static,
        host: Host,
    ) -> Result<Self, LayoutConfigError> {
        let rows = FenwickVirtualizer::new(
            RowHeight::new(config.estimate_row_height),
            config.gap,
            config.overscan,
        );
        Self::with_virtualizer(items, config, remeasure_config, Box::new(rows), render_item, host)
    }

    /// Mount a grid on a custom [`RowVirtualizer`].
    ///
    /// Resolves the scroll target once (falling back to the root when the
    /// resolver has no region), reads the initial width, subscribes to resize
    /// notifications and schedules the post-mount remeasure triggers.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutConfigError`] if `config` violates its invariants.
    pub fn with_virtualizer(
        items: Vec<T>,
        config: LayoutConfig,
        remeasure_config: RemeasureConfig,
        rows: Box<dyn RowVirtualizer>,
        render_item: impl Fn(&T, ItemIndex) -> R + 'static,
        host: Host,
    ) -> Result<Self, LayoutConfigError> {
        let config = config.validated()?;

        let (target, degraded) = match host.scroll.resolve() {
            Some(target) => (target, false),
            None => {
                debug!("no scroll region available; using root");
                (ScrollTarget::Root, true)
            }
        };
        let width = host.resize.current_width().unwrap_or(0);
        let columns = compute_columns(width, &config);

        let mut core = GridCore {
            config,
            partition: RowPartition::new(items.len(), columns),
            items,
            container: ContainerMetrics::new(width),
            columns,
            rows,
            target,
            degraded,
            scroll: host.scroll.metrics(target),
            generation: 0,
        };
        core.rows.reconfigure(
            RowHeight::new(config.estimate_row_height),
            config.gap,
            config.overscan,
        );
        core.repartition(true);
        let core = Rc::new(RefCell::new(core));

        let liveness = Liveness::new();
        let remeasure = {
            let pass_core = Rc::downgrade(&core);
            let scroll = Rc::clone(&host.scroll);
            let resize = Rc::clone(&host.resize);
            let pass: Rc<dyn Fn() -> bool> = Rc::new(move || match pass_core.upgrade() {
                Some(core) => core
                    .borrow_mut()
                    .remeasure_pass(scroll.as_ref(), resize.as_ref()),
                None => false,
            });

            let flush_core = Rc::downgrade(&core);
            let flush: Rc<dyn Fn()> = Rc::new(move || {
                if let Some(core) = flush_core.upgrade() {
                    core.borrow_mut().rows.flush();
                }
            });

            RemeasureController::new(
                Rc::clone(&host.scheduler),
                liveness.token(),
                remeasure_config,
                pass,
                flush,
            )
        };

        let subscription = {
            let weak = Rc::downgrade(&core);
            let token = liveness.token();
            let controller = remeasure.clone();
            ResizeSubscription::new(
                Rc::clone(&host.resize),
                Box::new(move |width| {
                    if token.is_alive() {
                        resize_core(&weak, &controller, width);
                    }
                }),
            )
        };

        debug!(
            items = core.borrow().items.len(),
            columns,
            width,
            ?target,
            "grid mounted"
        );
        remeasure.schedule_triggers();

        Ok(Self {
            core,
            render_item: Box::new(render_item),
            host,
            liveness,
            remeasure,
            subscription,
        })
    }

    /// Replace the items.
    ///
    /// Rows that still exist keep their measured heights, so content above an
    /// append or a tail removal does not move. A change in item count
    /// schedules a remeasure.
    pub fn set_items(&self, items: Vec<T>) {
        if !self.liveness.is_alive() {
            return;
        }
        let count_changed = {
            let mut core = self.core.borrow_mut();
            let changed = core.items.len() != items.len();
            core.items = items;
            core.repartition(false);
            changed
        };
        if count_changed {
            self.remeasure.schedule_triggers();
        }
    }

    /// Append items to the end of the sequence.
    pub fn extend_items(&self, items: impl IntoIterator<Item = T>) {
        if !self.liveness.is_alive() {
            return;
        }
        let count_changed = {
            let mut core = self.core.borrow_mut();
            let before = core.items.len();
            core.items.extend(items);
            let changed = core.items.len() != before;
            if changed {
                core.repartition(false);
            }
            changed
        };
        if count_changed {
            self.remeasure.schedule_triggers();
        }
    }

    /// Install a new configuration.
    ///
    /// A column count change resets all measurements and schedules a
    /// remeasure; gap and estimate changes keep measurements.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutConfigError`] and leaves the grid unchanged if `config`
    /// violates its invariants.
    pub fn set_config(&self, config: LayoutConfig) -> Result<(), LayoutConfigError> {
        let config = config.validated()?;
        if !self.liveness.is_alive() {
            return Ok(());
        }
        let columns_changed = {
            let mut core = self.core.borrow_mut();
            core.config = config;
            core.rows.reconfigure(
                RowHeight::new(config.estimate_row_height),
                config.gap,
                config.overscan,
            );
            let columns = compute_columns(core.container.width, &config);
            if columns != core.columns {
                debug!(from = core.columns, to = columns, "column count changed by config");
                core.columns = columns;
                core.repartition(true);
                true
            } else {
                core.refresh_window();
                false
            }
        };
        if columns_changed {
            self.remeasure.schedule_triggers();
        }
        Ok(())
    }
}

impl<T, R> VirtualGrid<T, R> {
    /// Handle a container width change pushed directly by the host.
    ///
    /// Equivalent to the subscribed resize callback firing.
    pub fn on_resize(&self, width: i64) {
        if self.liveness.is_alive() {
            let columns_changed = self.core.borrow_mut().apply_width(width);
            if columns_changed {
                self.remeasure.schedule_triggers();
            }
        }
    }

    /// Handle a scroll event from `target`.
    ///
    /// Recomputes the mounted range only. Events from a container other than
    /// the current target trigger one revalidation when running degraded;
    /// otherwise they are ignored. Returns whether the event was applied.
    pub fn on_scroll(&self, target: ScrollTarget, metrics: ScrollMetrics) -> bool {
        if !self.liveness.is_alive() {
            return false;
        }
        let mut core = self.core.borrow_mut();
        if target != core.target && core.degraded {
            core.revalidate(self.host.scroll.as_ref());
        }
        if target != core.target {
            trace!(?target, current = ?core.target, "ignoring scroll from foreign container");
            return false;
        }
        core.scroll = Some(metrics);
        core.refresh_window();
        trace!(
            scroll_top = metrics.scroll_top,
            range = ?core.rows.visible_range(),
            "scroll"
        );
        true
    }

    /// Report the rendered height of a mounted row.
    ///
    /// Reports are batched; the first report of a batch schedules one flush.
    /// Reports for rows that no longer exist are dropped.
    pub fn measure_row(&self, row: RowIndex, height: RowHeight) {
        if !self.liveness.is_alive() {
            return;
        }
        let starts_batch = self.core.borrow_mut().rows.measure(row, height);
        if starts_batch {
            self.remeasure.request_flush();
        }
    }

    /// Apply queued measurements now. Returns how many row heights changed.
    pub fn flush_measurements(&self) -> usize {
        if !self.liveness.is_alive() {
            return 0;
        }
        self.core.borrow_mut().rows.flush()
    }

    /// Ask for a remeasure pass at the next frame. Coalesces with any pass
    /// already queued; returns whether a new pass was queued.
    pub fn request_remeasure(&self) -> bool {
        self.remeasure.request_remeasure()
    }

    /// Run a remeasure pass synchronously.
    pub fn remeasure_now(&self) {
        if !self.liveness.is_alive() {
            return;
        }
        let columns_changed = self
            .core
            .borrow_mut()
            .remeasure_pass(self.host.scroll.as_ref(), self.host.resize.as_ref());
        if columns_changed {
            self.remeasure.schedule_triggers();
        }
    }

    /// Render the mounted rows.
    ///
    /// Calls `render_item` once per item of every mounted row.
    pub fn frame(&self) -> GridFrame<R> {
        let core = self.core.borrow();
        let range = core.rows.visible_range();
        let rows = range
            .indices()
            .map(|row| {
                let items = core.partition.items_in_row(row);
                let first_item = ItemIndex::new(items.start);
                let cells = items
                    .map(|i| (self.render_item)(&core.items[i], ItemIndex::new(i)))
                    .collect();
                MountedRow {
                    index: row,
                    start_offset: core.rows.row_offset(row),
                    height: core.rows.row_height(row),
                    measured: core.rows.is_measured(row),
                    first_item,
                    cells,
                }
            })
            .collect();

        GridFrame {
            total_height: core.rows.total_size(),
            columns: core.columns,
            gap: core.config.gap,
            item_count: core.items.len(),
            row_count: core.partition.row_count(),
            range,
            rows,
        }
    }

    /// Current column count.
    pub fn columns(&self) -> usize {
        self.core.borrow().columns
    }

    /// Number of items.
    pub fn item_count(&self) -> usize {
        self.core.borrow().items.len()
    }

    /// Number of logical rows.
    pub fn row_count(&self) -> usize {
        self.core.borrow().partition.row_count()
    }

    /// Total scrollable height of the spacer.
    pub fn total_height(&self) -> usize {
        self.core.borrow().rows.total_size()
    }

    /// Currently mounted row range.
    pub fn visible_range(&self) -> VisibleRange {
        self.core.borrow().rows.visible_range()
    }

    /// Start offset of a row.
    pub fn row_offset(&self, row: RowIndex) -> Offset {
        self.core.borrow().rows.row_offset(row)
    }

    /// Height of a row (measured, or the estimate).
    pub fn row_height(&self, row: RowIndex) -> RowHeight {
        self.core.borrow().rows.row_height(row)
    }

    /// Whether a row has been measured.
    pub fn is_row_measured(&self, row: RowIndex) -> bool {
        self.core.borrow().rows.is_measured(row)
    }

    /// Start offset of the row holding `item`, or `None` if out of range.
    pub fn offset_of_item(&self, item: ItemIndex) -> Option<Offset> {
        let core = self.core.borrow();
        core.partition
            .row_of_item(item)
            .map(|row| core.rows.row_offset(row))
    }

    /// Row holding `item`, or `None` if out of range.
    pub fn row_of_item(&self, item: ItemIndex) -> Option<RowIndex> {
        self.core.borrow().partition.row_of_item(item)
    }

    /// Last container width seen.
    pub fn container_width(&self) -> i64 {
        self.core.borrow().container.width
    }

    /// Active configuration.
    pub fn config(&self) -> LayoutConfig {
        self.core.borrow().config
    }

    /// Scroll container the grid is measured against.
    pub fn scroll_target(&self) -> ScrollTarget {
        self.core.borrow().target
    }

    /// Whether the grid fell back to the root because no region was available.
    pub fn is_degraded(&self) -> bool {
        self.core.borrow().degraded
    }

    /// Number of remeasure passes run so far. Hosts re-report the heights of
    /// mounted rows when this changes.
    pub fn remeasure_generation(&self) -> u64 {
        self.core.borrow().generation
    }

    /// Whether a remeasure pass is queued.
    pub fn is_remeasure_pending(&self) -> bool {
        self.remeasure.is_remeasure_pending()
    }

    /// Whether the grid has been disposed.
    pub fn is_disposed(&self) -> bool {
        !self.liveness.is_alive()
    }

    /// Tear down: stop resize callbacks and cancel all deferred work.
    ///
    /// Idempotent. Deferred callbacks the host still delivers are no-ops.
    pub fn dispose(&mut self) {
        if !self.liveness.is_alive() {
            return;
        }
        self.liveness.kill();
        self.remeasure.dispose();
        self.subscription.dispose();
        debug!("grid disposed");
    }
}

impl<T, R> Drop for VirtualGrid<T, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T, R> std::fmt::Debug for VirtualGrid<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("VirtualGrid")
            .field("items", &core.items.len())
            .field("columns", &core.columns)
            .field("rows", &core.partition.row_count())
            .field("target", &core.target)
            .field("degraded", &core.degraded)
            .field("disposed", &!self.liveness.is_alive())
            .finish()
    }
}
