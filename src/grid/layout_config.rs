//! Layout configuration for the virtualized grid

use thiserror::Error;

/// Default minimum item width in layout units.
pub const DEFAULT_MIN_ITEM_WIDTH: usize = 300;
/// Default minimum number of columns.
pub const DEFAULT_MIN_COLUMNS: usize = 1;
/// Default gap between columns and between rows.
pub const DEFAULT_GAP: usize = 16;
/// Default number of extra rows mounted beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 4;
/// Default row height used before a row has been measured.
pub const DEFAULT_ESTIMATE_ROW_HEIGHT: usize = 260;

/// Errors returned when a [`LayoutConfig`] violates its invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutConfigError {
    /// `min_item_width` must be greater than zero.
    #[error("min_item_width must be > 0")]
    ZeroItemWidth,

    /// `min_columns` must be at least one.
    #[error("min_columns must be >= 1")]
    ZeroMinColumns,

    /// `max_columns`, when set, must not be below `min_columns`.
    #[error("max_columns ({max}) must be >= min_columns ({min})")]
    MaxBelowMin {
        /// Configured minimum column count.
        min: usize,
        /// Configured maximum column count.
        max: usize,
    },

    /// `estimate_row_height` must be greater than zero.
    #[error("estimate_row_height must be > 0")]
    ZeroRowEstimate,
}

/// Configuration of the grid layout.
///
/// # Invariants (checked by [`LayoutConfig::validate`])
/// - `min_item_width > 0`
/// - `min_columns >= 1`
/// - `max_columns >= min_columns` when set
/// - `estimate_row_height > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Minimum width of a single item; drives the column count.
    pub min_item_width: usize,
    /// Lower bound on the column count.
    pub min_columns: usize,
    /// Optional upper bound on the column count.
    pub max_columns: Option<usize>,
    /// Gap between columns, and between consecutive rows.
    pub gap: usize,
    /// Extra rows mounted beyond each edge of the viewport.
    pub overscan: usize,
    /// Height assumed for rows that have not been measured yet.
    pub estimate_row_height: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_item_width: DEFAULT_MIN_ITEM_WIDTH,
            min_columns: DEFAULT_MIN_COLUMNS,
            max_columns: None,
            gap: DEFAULT_GAP,
            overscan: DEFAULT_OVERSCAN,
            estimate_row_height: DEFAULT_ESTIMATE_ROW_HEIGHT,
        }
    }
}

impl LayoutConfig {
    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if self.min_item_width == 0 {
            return Err(LayoutConfigError::ZeroItemWidth);
        }
        if self.min_columns == 0 {
            return Err(LayoutConfigError::ZeroMinColumns);
        }
        if let Some(max) = self.max_columns {
            if max < self.min_columns {
                return Err(LayoutConfigError::MaxBelowMin {
                    min: self.min_columns,
                    max,
                });
            }
        }
        if self.estimate_row_height == 0 {
            return Err(LayoutConfigError::ZeroRowEstimate);
        }
        Ok(())
    }

    /// Validate and return self, for use in constructor chains.
    ///
    /// # Errors
    ///
    /// See [`LayoutConfig::validate`].
    pub fn validated(self) -> Result<Self, LayoutConfigError> {
        self.validate()?;
        Ok(self)
    }
}
