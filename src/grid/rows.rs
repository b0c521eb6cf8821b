//! Partitioning of a flat item sequence into virtual rows

use super::types::{ItemIndex, RowIndex};
use std::ops::Range;

/// Mapping of `item_count` items into rows of `columns` items each.
///
/// # Invariants
/// - `columns >= 1`
/// - `row_count == ceil(item_count / columns)`
/// - Row ranges are disjoint and their union is exactly `[0, item_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPartition {
    item_count: usize,
    columns: usize,
}

impl RowPartition {
    /// Create a partition. A `columns` of zero is treated as one.
    pub fn new(item_count: usize, columns: usize) -> Self {
        Self {
            item_count,
            columns: columns.max(1),
        }
    }

    /// Number of items being partitioned.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Items per full row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows: `ceil(item_count / columns)`.
    pub fn row_count(&self) -> usize {
        self.item_count.div_ceil(self.columns)
    }

    /// Absolute item indices covered by `row`, clipped to `item_count`.
    ///
    /// Rows past the end yield an empty range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::rows::RowPartition;
    /// # use vgrid::grid::types::RowIndex;
    /// let partition = RowPartition::new(37, 3);
    /// assert_eq!(partition.row_count(), 13);
    /// assert_eq!(partition.items_in_row(RowIndex::new(0)), 0..3);
    /// assert_eq!(partition.items_in_row(RowIndex::new(12)), 36..37);
    /// ```
    pub fn items_in_row(&self, row: RowIndex) -> Range<usize> {
        let start = row.get().saturating_mul(self.columns).min(self.item_count);
        let end = start.saturating_add(self.columns).min(self.item_count);
        start..end
    }

    /// Row containing the given item, or `None` if the item is out of range.
    pub fn row_of_item(&self, item: ItemIndex) -> Option<RowIndex> {
        if item.get() >= self.item_count {
            None
        } else {
            Some(RowIndex::new(item.get() / self.columns))
        }
    }

    /// Iterate over all row ranges in order.
    pub fn rows(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.row_count()).map(|r| self.items_in_row(RowIndex::new(r)))
    }
}
