//! Record cards: the items rendered into grid cells.
//!
//! A card is a bordered box with the record title in its top border and one
//! `key: value` entry per field, wrapped to the column width. Field values are
//! limited to [`MAX_FIELD_LINES`] lines and the body to [`MAX_BODY_LINES`];
//! anything longer is cut with an ellipsis. Card height therefore depends on
//! the column width, which is why rows are measured after rendering.

use crate::grid::ItemIndex;
use crate::model::{ParsedRecord, RecordField};
use crate::view::styles::{CardStyles, ColorConfig};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Lines a single field may wrap onto.
pub const MAX_FIELD_LINES: usize = 3;
/// Body lines of a card, excluding borders.
pub const MAX_BODY_LINES: usize = 12;
/// Top and bottom border.
const BORDER_LINES: usize = 2;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq)]
enum CardBody {
    Fields(Vec<RecordField>),
    Malformed { message: String, raw: String },
}

/// Renderable form of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    index: ItemIndex,
    title: String,
    body: CardBody,
}

impl Card {
    /// Build the card for the record at `index`.
    pub fn from_record(record: &ParsedRecord, index: ItemIndex) -> Self {
        match record {
            ParsedRecord::Valid(record) => Self {
                index,
                title: record.title().to_string(),
                body: CardBody::Fields(record.fields().to_vec()),
            },
            ParsedRecord::Malformed(malformed) => Self {
                index,
                title: format!("line {}", malformed.line()),
                body: CardBody::Malformed {
                    message: malformed.error_message().to_string(),
                    raw: malformed.raw().to_string(),
                },
            },
        }
    }

    /// Absolute index of the record in the grid.
    pub fn index(&self) -> ItemIndex {
        self.index
    }

    /// Card title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether this card shows a record that failed to parse.
    pub fn is_malformed(&self) -> bool {
        matches!(self.body, CardBody::Malformed { .. })
    }

    /// Height of the card in lines when drawn `width` cells wide.
    pub fn height(&self, width: u16) -> usize {
        let styles = CardStyles::with_color_config(ColorConfig::new(false));
        BORDER_LINES + self.body_lines(inner_width(width), &styles).len()
    }

    /// Wrapped body lines for an inner width.
    fn body_lines(&self, width: usize, styles: &CardStyles) -> Vec<Line<'static>> {
        let mut lines = match &self.body {
            CardBody::Fields(fields) if fields.is_empty() => {
                vec![Line::styled("(no fields)", styles.field_key)]
            }
            CardBody::Fields(fields) => fields
                .iter()
                .flat_map(|field| field_lines(field, width, styles))
                .collect(),
            CardBody::Malformed { message, raw } => {
                let mut lines: Vec<Line<'static>> = wrap(message, width, width, MAX_FIELD_LINES)
                    .into_iter()
                    .map(|text| Line::styled(text, styles.error))
                    .collect();
                lines.extend(
                    wrap(raw, width, width, MAX_FIELD_LINES)
                        .into_iter()
                        .map(|text| Line::styled(text, styles.field_key)),
                );
                lines
            }
        };

        if lines.len() > MAX_BODY_LINES {
            lines.truncate(MAX_BODY_LINES - 1);
            lines.push(Line::styled(ELLIPSIS.to_string(), styles.field_key));
        }
        lines
    }
}

/// Draws a [`Card`] into an area the size returned by [`Card::height`].
#[derive(Debug)]
pub struct CardWidget<'a> {
    card: &'a Card,
    styles: &'a CardStyles,
    selected: bool,
}

impl<'a> CardWidget<'a> {
    /// Widget for `card`.
    pub fn new(card: &'a Card, styles: &'a CardStyles, selected: bool) -> Self {
        Self {
            card,
            styles,
            selected,
        }
    }
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.selected {
            self.styles.selected_border
        } else if self.card.is_malformed() {
            self.styles.error
        } else {
            self.styles.border
        };
        let title_width = usize::from(area.width.saturating_sub(2));
        let title = truncate(&self.card.title, title_width);

        let block = Block::bordered()
            .border_style(border)
            .title(Span::styled(title, self.styles.title));
        let lines = self.card.body_lines(inner_width(area.width), self.styles);
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

fn inner_width(width: u16) -> usize {
    usize::from(width.saturating_sub(2)).max(1)
}

fn field_lines(field: &RecordField, width: usize, styles: &CardStyles) -> Vec<Line<'static>> {
    let prefix = format!("{}: ", field.key);
    let prefix_width = prefix.width();

    if prefix_width >= width {
        // Key alone fills the line; value goes below it.
        let mut lines = vec![Line::styled(
            truncate(prefix.trim_end(), width),
            styles.field_key,
        )];
        lines.extend(
            wrap(&field.value, width, width, MAX_FIELD_LINES - 1)
                .into_iter()
                .map(|text| Line::styled(text, styles.field_value)),
        );
        return lines;
    }

    let mut chunks = wrap(&field.value, width - prefix_width, width, MAX_FIELD_LINES).into_iter();
    let first = chunks.next().unwrap_or_default();
    let mut lines = vec![Line::from(vec![
        Span::styled(prefix, styles.field_key),
        Span::styled(first, styles.field_value),
    ])];
    lines.extend(chunks.map(|text| Line::styled(text, styles.field_value)));
    lines
}

/// Wrap `text` at character boundaries into at most `max_lines` lines.
///
/// The first line is `first_width` cells wide, the rest `rest_width`. Text
/// that does not fit ends with an ellipsis. Always returns at least one line.
pub fn wrap(text: &str, first_width: usize, rest_width: usize, max_lines: usize) -> Vec<String> {
    let max_lines = max_lines.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut limit = first_width.max(1);
    let mut truncated = false;

    for c in text.chars() {
        let c = if c.is_control() { ' ' } else { c };
        let w = c.width().unwrap_or(0);
        if current_width + w > limit && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                truncated = true;
                break;
            }
            current_width = 0;
            limit = rest_width.max(1);
        }
        current.push(c);
        current_width += w;
    }

    if truncated {
        let last_limit = if lines.len() == 1 { first_width } else { rest_width };
        let last_limit = last_limit.max(1);
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && last.width() + 1 > last_limit {
                last.pop();
            }
            last.push(ELLIPSIS);
        }
    } else {
        lines.push(current);
    }
    lines
}

/// Cut `text` to `width` cells, ending with an ellipsis when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}
