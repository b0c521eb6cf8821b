//! Render output of the grid engine

use super::types::{ItemIndex, Offset, RowHeight, RowIndex};
use super::visible_range::VisibleRange;

/// One mounted row: its position in the spacer and its rendered items.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedRow<R> {
    /// Row index in the logical grid.
    pub index: RowIndex,
    /// Distance from the top of the spacer to the top of the row.
    pub start_offset: Offset,
    /// Measured height, or the estimate while unmeasured.
    pub height: RowHeight,
    /// Whether `height` comes from a measurement.
    pub measured: bool,
    /// Absolute index of the row's first item.
    pub first_item: ItemIndex,
    /// Rendered items, left to right. At most `columns` long.
    pub cells: Vec<R>,
}

impl<R> MountedRow<R> {
    /// Absolute index of the item in `column`, if the row has one there.
    pub fn item_at(&self, column: usize) -> Option<ItemIndex> {
        (column < self.cells.len()).then(|| ItemIndex::new(self.first_item.get() + column))
    }
}

/// A rendered frame of the grid.
///
/// Hosts draw a spacer `total_height` tall and place each mounted row
/// absolutely at its `start_offset`, laying its cells out in `columns`
/// equal-width columns separated by `gap`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame<R> {
    /// Height of the full-height spacer.
    pub total_height: usize,
    /// Column count of every row.
    pub columns: usize,
    /// Gap between columns (and between rows).
    pub gap: usize,
    /// Number of items in the grid.
    pub item_count: usize,
    /// Number of logical rows.
    pub row_count: usize,
    /// Range the mounted rows were taken from.
    pub range: VisibleRange,
    /// Mounted rows in order.
    pub rows: Vec<MountedRow<R>>,
}

impl<R> GridFrame<R> {
    /// Number of rendered items across all mounted rows.
    pub fn mounted_items(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
