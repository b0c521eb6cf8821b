//! Core grid newtypes

/// Height of a row in layout units (pixels, or cells for the terminal host).
///
/// A row's height is either an estimate (from `LayoutConfig::estimate_row_height`)
/// or a measured value reported back by the host after the row was laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowHeight(usize);

impl RowHeight {
    /// Create a new RowHeight from a raw value.
    pub fn new(height: usize) -> Self {
        Self(height)
    }

    /// Get the raw value.
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Absolute vertical offset from the top of the grid. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(usize);

impl Offset {
    /// Create a new Offset from a raw value.
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Get the raw usize value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Add an amount to this offset, saturating at usize::MAX.
    pub fn saturating_add(&self, amount: usize) -> Self {
        Self(self.0.saturating_add(amount))
    }

    /// Subtract an amount from this offset, saturating at 0.
    pub fn saturating_sub(&self, amount: usize) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Index of a virtual row. `index * columns` is the first item of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowIndex(usize);

impl RowIndex {
    /// Create a new RowIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Get the next row index.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get the previous row index, saturating at 0.
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl From<usize> for RowIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Absolute index of an item in the flat item sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemIndex(usize);

impl ItemIndex {
    /// Create a new ItemIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Get the 1-based index for display purposes.
    pub fn display(&self) -> usize {
        self.0 + 1
    }
}

impl From<usize> for ItemIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod offset {
        use super::*;

        #[test]
        fn saturating_sub_clamps_at_zero() {
            assert_eq!(Offset::new(3).saturating_sub(10), Offset::new(0));
        }

        #[test]
        fn saturating_add_adds() {
            assert_eq!(Offset::new(3).saturating_add(4), Offset::new(7));
        }

        #[test]
        fn default_is_zero() {
            assert_eq!(Offset::default().get(), 0);
        }
    }

    mod row_index {
        use super::*;

        #[test]
        fn prev_saturates_at_zero() {
            assert_eq!(RowIndex::new(0).prev(), RowIndex::new(0));
        }

        #[test]
        fn next_increments() {
            assert_eq!(RowIndex::new(4).next(), RowIndex::new(5));
        }
    }

    #[test]
    fn item_index_display_is_one_based() {
        assert_eq!(ItemIndex::new(0).display(), 1);
        assert_eq!(ItemIndex::from(41).display(), 42);
    }
}
