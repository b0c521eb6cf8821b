//! Status bar widget.
//!
//! One line below the main pane:
//! `42 records (1 malformed) | 3 cols | rows 4-9/14 | line 37/160 [LIVE]`
//!
//! The `[LIVE]` marker is shown while stdin is still streaming.

use crate::view::styles::CardStyles;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// Text of the streaming marker.
const LIVE_MARKER: &str = " [LIVE]";

/// Numbers shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Records loaded.
    pub records: usize,
    /// Records that failed to parse.
    pub malformed: usize,
    /// Current column count.
    pub columns: usize,
    /// First mounted row (inclusive).
    pub first_row: usize,
    /// Last mounted row (exclusive).
    pub end_row: usize,
    /// Total rows.
    pub row_count: usize,
    /// Scroll offset of the pane.
    pub scroll_top: usize,
    /// Total grid height.
    pub total_height: usize,
    /// Input still streaming.
    pub live: bool,
}

impl StatusInfo {
    /// Plain text of the bar, without the live marker.
    pub fn text(&self) -> String {
        let records = if self.malformed > 0 {
            format!("{} records ({} malformed)", self.records, self.malformed)
        } else {
            format!("{} records", self.records)
        };
        let rows = if self.end_row > self.first_row {
            format!("rows {}-{}/{}", self.first_row + 1, self.end_row, self.row_count)
        } else {
            format!("rows -/{}", self.row_count)
        };
        format!(
            "{} | {} cols | {} | line {}/{}",
            records, self.columns, rows, self.scroll_top, self.total_height
        )
    }
}

/// Renders a [`StatusInfo`].
#[derive(Debug)]
pub struct StatusBar<'a> {
    info: StatusInfo,
    styles: &'a CardStyles,
}

impl<'a> StatusBar<'a> {
    /// Status bar for `info`.
    pub fn new(info: StatusInfo, styles: &'a CardStyles) -> Self {
        Self { info, styles }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw(format!(" {}", self.info.text()))];
        if self.info.live {
            spans.push(Span::styled(LIVE_MARKER, self.styles.live));
        }
        Paragraph::new(Line::from(spans))
            .style(self.styles.status)
            .render(area, buf);
    }
}
