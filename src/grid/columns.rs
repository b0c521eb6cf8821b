//! Responsive column computation

use super::layout_config::LayoutConfig;

/// Observed size of the element hosting the grid.
///
/// Mutated only by resize notifications. A width of zero or below means
/// the host has not measured the element yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerMetrics {
    /// Content-box width in layout units.
    pub width: i64,
}

impl ContainerMetrics {
    /// Create metrics for the given width.
    pub fn new(width: i64) -> Self {
        Self { width }
    }

    /// Whether the host has reported a usable width.
    pub fn is_measured(&self) -> bool {
        self.width > 0
    }
}

/// Compute the column count for a container width.
///
/// `floor((width + gap) / (min_item_width + gap))`, clamped to
/// `[min_columns, max_columns]`. The single `gap` added to the width stands
/// in for the trailing gap of the last column; keep it, hosts rely on the
/// exact breakpoints it produces.
///
/// A width of zero or below (not measured yet) yields `min_columns`.
///
/// # Examples
///
/// ```
/// # use vgrid::grid::columns::compute_columns;
/// # use vgrid::grid::layout_config::LayoutConfig;
/// let config = LayoutConfig::default(); // min_item_width 300, gap 16
/// assert_eq!(compute_columns(1000, &config), 3);
/// assert_eq!(compute_columns(0, &config), 1);
/// ```
pub fn compute_columns(width: i64, config: &LayoutConfig) -> usize {
    if width <= 0 {
        return config.min_columns;
    }

    let gap = config.gap as u128;
    let per_column = config.min_item_width as u128 + gap;
    // min_item_width > 0 is a config invariant; guard anyway so a bad config
    // degrades to min_columns instead of dividing by zero.
    let fitted = if per_column == 0 {
        config.min_columns
    } else {
        let raw = (width as u128 + gap) / per_column;
        usize::try_from(raw).unwrap_or(usize::MAX)
    };

    let columns = fitted.max(config.min_columns);
    match config.max_columns {
        Some(max) => columns.min(max),
        None => columns,
    }
}
