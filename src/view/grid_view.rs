//! Card grid rendering.
//!
//! Paints the mounted rows of a [`GridFrame`] into the main pane. Rows are
//! positioned by their spacer offset minus the scroll offset, so rows that
//! straddle the pane edge are clipped line by line: each card is drawn into a
//! scratch buffer at full height and only the visible lines are copied.
//!
//! Painting also measures: a row is as tall as its tallest card at the current
//! column width. The caller reports those heights back to the grid.

use crate::grid::{GridFrame, ItemIndex, RowHeight, RowIndex};
use crate::view::card::{Card, CardWidget};
use crate::view::styles::CardStyles;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::Widget;

/// Measured height of one mounted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMeasurement {
    /// Row that was painted.
    pub row: RowIndex,
    /// Height of its tallest card.
    pub height: RowHeight,
    /// The grid's stored height for the row disagrees (or is an estimate).
    pub stale: bool,
}

/// Screen area a card ended up in, clipped to the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHit {
    /// The card's item.
    pub item: ItemIndex,
    /// Visible part of the card.
    pub area: Rect,
}

/// Result of painting the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridPaint {
    /// One entry per mounted row.
    pub measurements: Vec<RowMeasurement>,
    /// Visible cards, for mouse hit testing.
    pub hits: Vec<CardHit>,
}

impl GridPaint {
    /// Item whose card covers the screen cell `(x, y)`.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ItemIndex> {
        let position = Position::new(x, y);
        self.hits
            .iter()
            .find(|hit| hit.area.contains(position))
            .map(|hit| hit.item)
    }
}

/// Width of each column when `width` cells are split into `columns` columns
/// separated by `gap`. Never zero.
pub fn column_width(width: u16, columns: usize, gap: usize) -> u16 {
    let columns = columns.max(1);
    let gaps = gap.saturating_mul(columns - 1);
    let usable = usize::from(width).saturating_sub(gaps);
    u16::try_from(usable / columns).unwrap_or(u16::MAX).max(1)
}

/// Paint `frame` into `area` with the pane scrolled to `scroll_top`.
pub fn render_grid(
    frame: &GridFrame<Card>,
    area: Rect,
    buf: &mut Buffer,
    scroll_top: usize,
    styles: &CardStyles,
    selected: Option<ItemIndex>,
) -> GridPaint {
    let mut paint = GridPaint::default();
    let col_width = column_width(area.width, frame.columns, frame.gap);
    let gap = u16::try_from(frame.gap).unwrap_or(u16::MAX);

    for row in &frame.rows {
        let mut tallest = 1;
        // Signed: rows above the scroll offset start before the pane.
        let row_top = to_i64(row.start_offset.get()) - to_i64(scroll_top);

        for (column, card) in row.cells.iter().enumerate() {
            let height = card.height(col_width);
            tallest = tallest.max(height);

            let Ok(column) = u16::try_from(column) else {
                break;
            };
            let x = area
                .x
                .saturating_add(column.saturating_mul(col_width.saturating_add(gap)));
            if x >= area.right() {
                continue;
            }
            let width = col_width.min(area.right() - x);
            let widget = CardWidget::new(card, styles, selected == Some(card.index()));
            if let Some(visible) = blit_card(widget, col_width, height, x, width, row_top, area, buf) {
                paint.hits.push(CardHit {
                    item: card.index(),
                    area: visible,
                });
            }
        }

        let height = RowHeight::new(tallest);
        paint.measurements.push(RowMeasurement {
            row: row.index,
            height,
            stale: !row.measured || row.height != height,
        });
    }

    paint
}

/// Draw `widget` off-screen and copy its lines that fall inside `area`.
/// Returns the visible rectangle, if any.
#[allow(clippy::too_many_arguments)]
fn blit_card(
    widget: CardWidget<'_>,
    card_width: u16,
    card_height: usize,
    x: u16,
    width: u16,
    row_top: i64,
    area: Rect,
    buf: &mut Buffer,
) -> Option<Rect> {
    let card_height = u16::try_from(card_height).unwrap_or(u16::MAX);
    let pane_top = i64::from(area.y);
    let pane_bottom = i64::from(area.bottom());
    let card_top = pane_top + row_top;
    let card_bottom = card_top + i64::from(card_height);
    if card_bottom <= pane_top || card_top >= pane_bottom {
        return None;
    }

    let scratch_area = Rect::new(0, 0, card_width, card_height);
    let mut scratch = Buffer::empty(scratch_area);
    widget.render(scratch_area, &mut scratch);

    let first = card_top.max(pane_top);
    let last = card_bottom.min(pane_bottom);
    for screen_y in first..last {
        let (Ok(dy), Ok(y)) = (u16::try_from(screen_y - card_top), u16::try_from(screen_y)) else {
            continue;
        };
        for dx in 0..width {
            if let (Some(src), Some(dst)) = (scratch.cell((dx, dy)), buf.cell_mut((x + dx, y))) {
                *dst = src.clone();
            }
        }
    }

    let top = u16::try_from(first).ok()?;
    let height = u16::try_from(last - first).ok()?;
    Some(Rect::new(x, top, width, height))
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MountedRow, Offset, VisibleRange};
    use crate::model::{ParsedRecord, Record, RecordField};

    fn card(index: usize, fields: usize) -> Card {
        let fields = (0..fields)
            .map(|i| RecordField {
                key: format!("k{i}"),
                value: "v".to_string(),
            })
            .collect();
        Card::from_record(
            &ParsedRecord::Valid(Record::new(index + 1, format!("c{index}"), fields)),
            ItemIndex::new(index),
        )
    }

    fn mounted(index: usize, offset: usize, height: usize, measured: bool, cards: Vec<Card>) -> MountedRow<Card> {
        MountedRow {
            index: RowIndex::new(index),
            start_offset: Offset::new(offset),
            height: RowHeight::new(height),
            measured,
            first_item: cards[0].index(),
            cells: cards,
        }
    }

    fn frame(rows: Vec<MountedRow<Card>>) -> GridFrame<Card> {
        GridFrame {
            total_height: 100,
            columns: 2,
            gap: 1,
            item_count: 4,
            row_count: 2,
            range: VisibleRange::new(RowIndex::new(0), RowIndex::new(2), Offset::new(0), 10),
            rows,
        }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn column_width_splits_evenly() {
        assert_eq!(column_width(21, 2, 1), 10);
        assert_eq!(column_width(80, 1, 1), 80);
        assert_eq!(column_width(2, 4, 1), 1);
    }

    #[test]
    fn measures_tallest_card_per_row() {
        let frame = frame(vec![mounted(0, 0, 6, false, vec![card(0, 1), card(1, 3)])]);
        let area = Rect::new(0, 0, 21, 10);
        let mut buf = Buffer::empty(area);

        let paint = render_grid(&frame, area, &mut buf, 0, &CardStyles::default(), None);

        assert_eq!(
            paint.measurements,
            vec![RowMeasurement {
                row: RowIndex::new(0),
                height: RowHeight::new(5),
                stale: true,
            }]
        );
    }

    #[test]
    fn matching_measured_row_is_not_stale() {
        let frame = frame(vec![mounted(0, 0, 3, true, vec![card(0, 1)])]);
        let area = Rect::new(0, 0, 21, 10);
        let mut buf = Buffer::empty(area);

        let paint = render_grid(&frame, area, &mut buf, 0, &CardStyles::default(), None);
        assert!(!paint.measurements[0].stale);
    }

    #[test]
    fn cards_are_placed_in_columns() {
        let frame = frame(vec![mounted(0, 0, 3, true, vec![card(0, 1), card(1, 1)])]);
        let area = Rect::new(0, 0, 21, 3);
        let mut buf = Buffer::empty(area);

        let paint = render_grid(&frame, area, &mut buf, 0, &CardStyles::default(), None);

        assert_eq!(row_text(&buf, 0), "┌c0──────┐ ┌c1──────┐");
        assert_eq!(paint.hit_test(3, 1), Some(ItemIndex::new(0)));
        assert_eq!(paint.hit_test(10, 1), None);
        assert_eq!(paint.hit_test(12, 1), Some(ItemIndex::new(1)));
    }

    #[test]
    fn partially_scrolled_row_is_clipped() {
        // Row 0 occupies lines 0..3, row 1 starts at 4. Scrolled by 2 lines,
        // only the bottom border of row 0 remains.
        let frame = frame(vec![
            mounted(0, 0, 3, true, vec![card(0, 1)]),
            mounted(1, 4, 3, true, vec![card(2, 1)]),
        ]);
        let area = Rect::new(0, 0, 21, 5);
        let mut buf = Buffer::empty(area);

        let paint = render_grid(&frame, area, &mut buf, 2, &CardStyles::default(), None);

        assert!(row_text(&buf, 0).starts_with("└────────┘"));
        assert!(row_text(&buf, 2).starts_with("┌c2"));
        assert_eq!(paint.hits[0].area, Rect::new(0, 0, 10, 1));
    }
}
