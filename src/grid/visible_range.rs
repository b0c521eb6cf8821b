//! Visible range calculation

use super::height_index::HeightIndex;
use super::types::{Offset, RowIndex};

/// Range of rows that must be mounted for the current viewport.
///
/// Computed via binary search on cumulative row offsets, then widened by
/// the overscan count on each side.
///
/// # Invariants
/// - `start_index <= end_index`
/// - `end_index <= row_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// Index of first mounted row (inclusive).
    pub start_index: RowIndex,
    /// Index of last mounted row (exclusive).
    pub end_index: RowIndex,
    /// Scroll offset, in grid coordinates, the range was computed for.
    pub scroll_offset: Offset,
    /// Viewport height the range was computed for.
    pub viewport_height: usize,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start_index > end_index.
    pub fn new(
        start_index: RowIndex,
        end_index: RowIndex,
        scroll_offset: Offset,
        viewport_height: usize,
    ) -> Self {
        debug_assert!(
            start_index <= end_index,
            "start_index {:?} > end_index {:?}",
            start_index,
            end_index
        );
        Self {
            start_index,
            end_index,
            scroll_offset,
            viewport_height,
        }
    }

    /// Number of mounted rows.
    pub fn len(&self) -> usize {
        self.end_index.get().saturating_sub(self.start_index.get())
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over mounted row indices.
    pub fn indices(&self) -> impl Iterator<Item = RowIndex> {
        (self.start_index.get()..self.end_index.get()).map(RowIndex::new)
    }

    /// Check if a specific row index is mounted.
    pub fn contains(&self, index: RowIndex) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// Viewport window in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Top of the visible window relative to the top of the grid.
    pub top: usize,
    /// Height of the visible window.
    pub height: usize,
}

impl Window {
    /// Translate a scroll container's viewport into grid coordinates.
    ///
    /// `grid_offset` is the distance from the top of the scrollable content to
    /// the top of the grid. Returns `None` when the grid lies entirely below the
    /// viewport.
    pub fn from_container(scroll_top: usize, viewport_height: usize, grid_offset: usize) -> Option<Self> {
        let bottom = scroll_top.saturating_add(viewport_height);
        if bottom <= grid_offset {
            return None;
        }
        let top = scroll_top.saturating_sub(grid_offset);
        Some(Self {
            top,
            height: bottom - grid_offset - top,
        })
    }
}

/// Compute the mounted row range for a window.
///
/// `rows` holds one slot per row (row height plus trailing gap). The visible
/// rows are those whose slots intersect `[window.top, window.top + window.height)`;
/// the result is widened by `overscan` rows on each side and clipped to the row
/// count. A window past the end clamps to the last row. With no window (grid
/// below the viewport) only the leading overscan rows are mounted.
pub fn compute_visible_range(rows: &HeightIndex, window: Option<Window>, overscan: usize) -> VisibleRange {
    let row_count = rows.len();
    let Some(window) = window else {
        return VisibleRange::new(
            RowIndex::new(0),
            RowIndex::new(overscan.min(row_count)),
            Offset::default(),
            0,
        );
    };

    if row_count == 0 {
        return VisibleRange::new(
            RowIndex::new(0),
            RowIndex::new(0),
            Offset::new(window.top),
            window.height,
        );
    }

    let last_row = row_count - 1;
    let first = rows.lower_bound(window.top).unwrap_or(last_row);
    let bottom = window.top.saturating_add(window.height.saturating_sub(1));
    let last = rows.lower_bound(bottom).unwrap_or(last_row).max(first);

    let start = first.saturating_sub(overscan);
    let end = last.saturating_add(1).saturating_add(overscan).min(row_count);

    VisibleRange::new(
        RowIndex::new(start),
        RowIndex::new(end),
        Offset::new(window.top),
        window.height,
    )
}
