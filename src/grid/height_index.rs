//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Provides efficient operations for computing cumulative row extents and
//! finding row indices by vertical offset (scroll position).
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `get`: O(1)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n)
//! - `resize`: O(k log n) growing by k entries, O(1) shrinking
//! - `filled`: O(n)
//! - `total`: O(log n)
//! - `len`: O(1)
//! - `clear`: O(n)

/// HeightIndex wraps a Fenwick tree for O(log n) prefix sum queries and updates.
///
/// Maintains cumulative extents for a sequence of rows, supporting:
/// - Setting individual extents
/// - Computing prefix sums (cumulative extent up to index)
/// - Binary search for a row by vertical offset (lower_bound)
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, but we expose 0-indexed API).
    /// Always exactly `values.len()` long.
    tree: Vec<isize>,
    /// Plain per-index values, kept alongside the tree for O(1) reads.
    values: Vec<usize>,
}

impl HeightIndex {
    /// Creates an empty HeightIndex with the given capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Creates a HeightIndex holding `len` copies of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let index = HeightIndex::filled(4, 10);
    /// assert_eq!(index.len(), 4);
    /// assert_eq!(index.total(), 40);
    /// ```
    pub fn filled(len: usize, value: usize) -> Self {
        let mut index = Self::new(len);
        index.resize(len, value);
        index
    }

    /// Creates a HeightIndex over `values` in linear time.
    pub fn from_values(values: Vec<usize>) -> Self {
        let mut index = Self {
            tree: Vec::with_capacity(values.len()),
            values,
        };
        index.rebuild();
        index
    }

    /// Sets the value at the given index.
    ///
    /// Computes the delta from the current value and updates the Fenwick tree.
    /// Setting an unchanged value is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// index.set(0, 10);
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, value: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = signed(value) - signed(self.values[index]);
        if delta != 0 {
            self.values[index] = value;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Returns the value stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> usize {
        self.values[index]
    }

    /// Returns the cumulative value up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(3);
    /// index.push(4);
    /// index.push(5);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Returns the cumulative value of all entries strictly before `index`.
    ///
    /// This is the start offset of entry `index`. `offset_of(len())` equals `total()`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn offset_of(&self, index: usize) -> usize {
        assert!(
            index <= self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns the index of the entry containing the given vertical offset.
    ///
    /// # Returns
    ///
    /// - `Some(index)` if there exists an index where `prefix_sum(index) > value`
    /// - `None` if `value >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(10);  // [0..10)
    /// index.push(20);  // [10..30)
    /// index.push(15);  // [30..45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        // Entry i covers range [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        if left >= self.len() {
            None
        } else {
            Some(left)
        }
    }

    /// Returns the total cumulative value of all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// assert_eq!(index.total(), 0);
    /// index.push(5);
    /// index.push(3);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the index contains no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Appends a new entry with the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vgrid::grid::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// index.push(3);
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn push(&mut self, value: usize) {
        // Node i aggregates values[i & (i + 1)..=i]; the entries before i in
        // that range are already in the tree.
        let index = self.values.len();
        let covered = self.raw_prefix(index) - self.raw_prefix(index & (index + 1));
        self.values.push(value);
        self.tree.push(covered + signed(value));
    }

    /// Resizes to `len` entries, filling new slots with `value`.
    ///
    /// Existing entries below `len` keep their values.
    pub fn resize(&mut self, len: usize, value: usize) {
        if len < self.len() {
            // Node i only covers entries at or before i, so the prefix of the
            // tree is still valid.
            self.values.truncate(len);
            self.tree.truncate(len);
            return;
        }
        if self.is_empty() {
            self.values.resize(len, value);
            self.rebuild();
            return;
        }
        self.values.reserve(len - self.len());
        self.tree.reserve(len - self.len());
        while self.len() < len {
            self.push(value);
        }
    }

    /// Clears all entries, resetting to empty state.
    ///
    /// Retains allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.values.clear();
        self.tree.clear();
    }

    /// Sum of the entries strictly before `index`, unclamped.
    fn raw_prefix(&self, index: usize) -> isize {
        if index == 0 {
            0
        } else {
            fenwick::array::prefix_sum(&self.tree, index - 1)
        }
    }

    /// Linear-time build: each node pushes its partial sum into its parent.
    fn rebuild(&mut self) {
        let len = self.values.len();
        self.tree.clear();
        self.tree.extend(self.values.iter().map(|&value| signed(value)));
        for i in 0..len {
            let parent = i | (i + 1);
            if parent < len {
                let partial = self.tree[i];
                self.tree[parent] += partial;
            }
        }
    }
}

/// Values above `isize::MAX` saturate; the tree stores signed sums.
fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}
