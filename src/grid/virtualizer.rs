//! Row virtualization: per-row heights, offsets and the mounted window.

use super::height_index::HeightIndex;
use super::types::{Offset, RowHeight, RowIndex};
use super::visible_range::{compute_visible_range, VisibleRange, Window};
use std::collections::BTreeMap;
use tracing::trace;

/// Row virtualization facility used by the grid engine.
///
/// Owns the per-row height table (estimated until measured), the offsets
/// derived from it and the current mounted range. Measurements are queued
/// with [`RowVirtualizer::measure`] and applied in batches by
/// [`RowVirtualizer::flush`].
pub trait RowVirtualizer {
    /// Drop all rows and measurements; start over with `row_count` estimated rows.
    fn reset(&mut self, row_count: usize);

    /// Grow or shrink to `row_count` rows. Surviving rows keep their heights.
    fn resize_rows(&mut self, row_count: usize);

    /// Change the row estimate, the inter-row gap and the overscan.
    /// Measured heights are kept.
    fn reconfigure(&mut self, estimate: RowHeight, gap: usize, overscan: usize);

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Recompute the mounted range for a new window. `None` means the grid
    /// is entirely below the viewport.
    fn update_window(&mut self, window: Option<Window>) -> VisibleRange;

    /// Mounted range as of the last window update or flush.
    fn visible_range(&self) -> VisibleRange;

    /// Start offset of `row`: the sum of the preceding rows' heights plus one gap per row.
    fn row_offset(&self, row: RowIndex) -> Offset;

    /// Measured height of `row`, or the estimate.
    fn row_height(&self, row: RowIndex) -> RowHeight;

    /// Whether `row` has been measured.
    fn is_measured(&self, row: RowIndex) -> bool;

    /// Total scrollable height: all row heights plus one gap per row.
    fn total_size(&self) -> usize;

    /// Queue a measured height. Returns `true` when this starts a new batch
    /// (the caller should schedule a flush).
    fn measure(&mut self, row: RowIndex, height: RowHeight) -> bool;

    /// Whether measurements are queued.
    fn has_pending(&self) -> bool;

    /// Apply queued measurements and recompute the mounted range.
    /// Returns the number of rows whose height actually changed.
    fn flush(&mut self) -> usize;
}

/// Default [`RowVirtualizer`] backed by a Fenwick tree.
///
/// Each tree slot holds `height + gap`, so the start offset of row `r` is the
/// exclusive prefix sum at `r` and the total is the full sum.
///
/// Slots are capped at `isize::MAX / row_count` so the total always fits the
/// tree. Only absurd heights reach the cap; `row_height` still reports the
/// height as measured.
#[derive(Debug, Clone)]
pub struct FenwickVirtualizer {
    slots: HeightIndex,
    measured: Vec<Option<RowHeight>>,
    pending: BTreeMap<usize, RowHeight>,
    estimate: RowHeight,
    gap: usize,
    overscan: usize,
    window: Option<Window>,
    range: VisibleRange,
    /// Largest slot currently stored.
    largest_slot: usize,
}

impl FenwickVirtualizer {
    /// Create an empty virtualizer.
    pub fn new(estimate: RowHeight, gap: usize, overscan: usize) -> Self {
        Self {
            slots: HeightIndex::new(0),
            measured: Vec::new(),
            pending: BTreeMap::new(),
            estimate,
            gap,
            overscan,
            window: Some(Window::default()),
            range: VisibleRange::default(),
            largest_slot: 0,
        }
    }

    fn slot_limit(&self) -> usize {
        isize::MAX as usize / self.measured.len().max(1)
    }

    fn estimate_slot(&self) -> usize {
        self.estimate
            .get()
            .saturating_add(self.gap)
            .min(self.slot_limit())
    }

    fn slot_for(&self, row: usize) -> usize {
        let height = self.measured[row].unwrap_or(self.estimate);
        height.get().saturating_add(self.gap).min(self.slot_limit())
    }

    fn rebuild_slots(&mut self) {
        let slots: Vec<usize> = (0..self.measured.len()).map(|r| self.slot_for(r)).collect();
        self.largest_slot = slots.iter().copied().max().unwrap_or(0);
        self.slots = HeightIndex::from_values(slots);
    }

    fn refresh_range(&mut self) -> VisibleRange {
        self.range = compute_visible_range(&self.slots, self.window, self.overscan);
        self.range
    }
}

impl RowVirtualizer for FenwickVirtualizer {
    fn reset(&mut self, row_count: usize) {
        self.measured.clear();
        self.measured.resize(row_count, None);
        self.pending.clear();
        self.largest_slot = self.estimate_slot();
        self.slots = HeightIndex::filled(row_count, self.largest_slot);
        self.refresh_range();
    }

    fn resize_rows(&mut self, row_count: usize) {
        if row_count == self.measured.len() {
            return;
        }
        self.measured.resize(row_count, None);
        self.pending.retain(|&row, _| row < row_count);
        if self.largest_slot > self.slot_limit() {
            // More rows lowered the cap below a stored slot.
            self.rebuild_slots();
        } else {
            let estimate = self.estimate_slot();
            self.largest_slot = self.largest_slot.max(estimate);
            self.slots.resize(row_count, estimate);
        }
        self.refresh_range();
    }

    fn reconfigure(&mut self, estimate: RowHeight, gap: usize, overscan: usize) {
        let slots_changed = estimate != self.estimate || gap != self.gap;
        self.estimate = estimate;
        self.gap = gap;
        self.overscan = overscan;
        if slots_changed {
            self.rebuild_slots();
        }
        self.refresh_range();
    }

    fn row_count(&self) -> usize {
        self.measured.len()
    }

    fn update_window(&mut self, window: Option<Window>) -> VisibleRange {
        self.window = window;
        self.refresh_range()
    }

    fn visible_range(&self) -> VisibleRange {
        self.range
    }

    fn row_offset(&self, row: RowIndex) -> Offset {
        Offset::new(self.slots.offset_of(row.get().min(self.slots.len())))
    }

    fn row_height(&self, row: RowIndex) -> RowHeight {
        self.measured
            .get(row.get())
            .copied()
            .flatten()
            .unwrap_or(self.estimate)
    }

    fn is_measured(&self, row: RowIndex) -> bool {
        matches!(self.measured.get(row.get()), Some(Some(_)))
    }

    fn total_size(&self) -> usize {
        self.slots.total()
    }

    fn measure(&mut self, row: RowIndex, height: RowHeight) -> bool {
        if row.get() >= self.measured.len() {
            // Stale report from a row that no longer exists.
            return false;
        }
        let starts_batch = self.pending.is_empty();
        self.pending.insert(row.get(), height);
        starts_batch
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn flush(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut changed = 0;
        for (row, height) in pending {
            if row >= self.measured.len() {
                continue;
            }
            if self.measured[row] != Some(height) {
                self.measured[row] = Some(height);
                let slot = self.slot_for(row);
                if self.slots.get(row) != slot {
                    changed += 1;
                }
                self.largest_slot = self.largest_slot.max(slot);
                self.slots.set(row, slot);
            }
        }
        if changed > 0 {
            trace!(changed, total = self.slots.total(), "applied row measurements");
        }
        self.refresh_range();
        changed
    }
}
