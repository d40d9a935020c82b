//! Draft input field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::draft::DraftState;

use super::styles;

const PLACEHOLDER_TEXT: &str = "Type a message...";
const PROMPT_SYMBOL: &str = "> ";
const CONTINUATION_SYMBOL: &str = "  ";

/// Most draft rows shown at once; longer drafts scroll with the cursor.
pub const MAX_VISIBLE_ROWS: u16 = 5;

/// Height of the input panel including borders.
pub fn input_height(draft: &DraftState) -> u16 {
    let rows = draft.text().split('\n').count().max(1);
    (rows as u16).clamp(1, MAX_VISIBLE_ROWS) + 2
}

/// Renders the draft. While `enabled` is false the text is dimmed and the
/// cursor is hidden.
pub fn render_message_input(frame: &mut Frame<'_>, area: Rect, draft: &DraftState, enabled: bool) {
    let (border_style, title) = if enabled {
        (styles::active_panel_border_style(), "Message")
    } else {
        (styles::inactive_panel_border_style(), "Waiting for reply...")
    };

    let visible_rows = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    let (cursor_line, cursor_x) = cursor_offset(draft);
    let (first_row, first_column) = scroll_offsets(cursor_line, cursor_x, visible_rows, inner_width);

    let paragraph = Paragraph::new(build_input_lines(draft, enabled))
        .scroll((to_u16(first_row), to_u16(first_column)))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        );

    frame.render_widget(paragraph, area);

    if enabled {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(to_u16(cursor_x - first_column));
        let cursor_y = area
            .y
            .saturating_add(1)
            .saturating_add(to_u16(cursor_line - first_row));
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Cursor row and its display column inside the rendered line, prompt included.
fn cursor_offset(draft: &DraftState) -> (usize, usize) {
    let (cursor_line, cursor_column) = draft.cursor_line_and_column();
    let before_cursor: String = draft
        .text()
        .split('\n')
        .nth(cursor_line)
        .unwrap_or_default()
        .chars()
        .take(cursor_column)
        .collect();

    (cursor_line, PROMPT_SYMBOL.width() + before_cursor.width())
}

/// First visible row and column so the cursor cell stays inside the panel.
fn scroll_offsets(
    cursor_line: usize,
    cursor_x: usize,
    visible_rows: usize,
    inner_width: usize,
) -> (usize, usize) {
    let first_row = (cursor_line + 1).saturating_sub(visible_rows.max(1));
    let first_column = (cursor_x + 1).saturating_sub(inner_width.max(1));
    (first_row, first_column)
}

fn to_u16(value: usize) -> u16 {
    value.min(u16::MAX as usize) as u16
}

/// Builds one line per draft row, prefixed with the prompt on the first row.
fn build_input_lines(draft: &DraftState, enabled: bool) -> Vec<Line<'static>> {
    let prompt_style = styles::input_prompt_style();
    let text_style = if enabled {
        styles::input_text_style()
    } else {
        styles::input_disabled_style()
    };

    if draft.is_empty() {
        let hint = if enabled { PLACEHOLDER_TEXT } else { "" };
        return vec![Line::from(vec![
            Span::styled(PROMPT_SYMBOL, prompt_style),
            Span::styled(hint, styles::input_placeholder_style()),
        ])];
    }

    draft
        .text()
        .split('\n')
        .enumerate()
        .map(|(index, row)| {
            let prefix = if index == 0 {
                PROMPT_SYMBOL
            } else {
                CONTINUATION_SYMBOL
            };
            Line::from(vec![
                Span::styled(prefix, prompt_style),
                Span::styled(row.to_owned(), text_style),
            ])
        })
        .collect()
}
