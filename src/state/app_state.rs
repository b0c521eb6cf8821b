//! Application state for the record browser.

use crate::grid::ItemIndex;
use crate::model::ParsedRecord;

/// Semantic scroll position of the main pane.
///
/// Resolved to a line offset against the grid's current total height, so
/// `Bottom` keeps following the end while records stream in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPosition {
    /// First line of the grid.
    #[default]
    Top,
    /// Explicit line offset from the top of the grid.
    AtLine(usize),
    /// Last page of the grid.
    Bottom,
}

impl ScrollPosition {
    /// Line offset of the viewport top, clamped so the viewport never runs
    /// past the end of the content.
    pub fn resolve(self, total_height: usize, viewport_height: usize) -> usize {
        let max = total_height.saturating_sub(viewport_height);
        match self {
            ScrollPosition::Top => 0,
            ScrollPosition::AtLine(offset) => offset.min(max),
            ScrollPosition::Bottom => max,
        }
    }
}

/// Viewport geometry needed by the state handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Visible lines in the main pane.
    pub height: usize,
    /// Total height of the grid content.
    pub total_height: usize,
}

impl Viewport {
    /// Create a viewport description.
    pub fn new(height: usize, total_height: usize) -> Self {
        Self {
            height,
            total_height,
        }
    }
}

/// UI state of the browser. The records themselves live in the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Scroll position of the main pane.
    pub scroll: ScrollPosition,
    /// Highlighted card, if any.
    pub selected: Option<ItemIndex>,
    /// Input is still streaming.
    pub live: bool,
    pub(crate) record_count: usize,
    pub(crate) malformed_count: usize,
}

impl AppState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for newly loaded records.
    pub fn add_records(&mut self, records: &[ParsedRecord]) {
        self.record_count += records.len();
        self.malformed_count += records.iter().filter(|r| r.is_malformed()).count();
    }

    /// Number of records loaded, malformed included.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Number of malformed records.
    pub fn malformed_count(&self) -> usize {
        self.malformed_count
    }
}
