//! Transcript rendering logic.
//!
//! Turns the conversation log into pre-wrapped lines so scrolling can be
//! measured in rendered rows:
//! - a header row per message (time + role label)
//! - content wrapped to the panel width, user messages right-aligned
//! - a trailing "Bot is typing..." row while a reply is pending

use ratatui::{
    layout::Alignment,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::domain::message::{Message, Role};

use super::styles;

pub const PENDING_PLACEHOLDER: &str = "Bot is typing...";
pub const EMPTY_TRANSCRIPT_HINT: &str = "Say hello! Type a message and press Enter.";

const ERROR_PREFIX: &str = "Error: ";
const TAB_SPACES: &str = "    ";

/// Builds every rendered row of the transcript for a panel of `width` columns.
pub fn build_transcript_lines(
    messages: &[Message],
    in_flight: bool,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.extend(message_lines(message, width));
    }

    if in_flight {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            PENDING_PLACEHOLDER,
            styles::pending_style(),
        )));
    }

    lines
}

/// Index of the first visible row given the scroll-back distance from the
/// bottom. Also returns the largest meaningful scroll-back for clamping.
pub fn visible_window(total_lines: usize, viewport_height: usize, scroll_back: usize) -> (usize, usize) {
    let max_scroll_back = total_lines.saturating_sub(viewport_height);
    let scroll_back = scroll_back.min(max_scroll_back);
    (max_scroll_back - scroll_back, max_scroll_back)
}

fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let alignment = if message.is_from_user() {
        Alignment::Right
    } else {
        Alignment::Left
    };
    let label_style = match message.role() {
        Role::User => styles::user_label_style(),
        Role::Bot => styles::bot_label_style(),
    };
    let text_style = if message.role() == Role::Bot && message.content().starts_with(ERROR_PREFIX) {
        styles::error_text_style()
    } else {
        styles::message_text_style()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(message.display_time(), styles::message_time_style()),
        Span::raw(" "),
        Span::styled(message.role().display_label(), label_style),
    ])
    .alignment(alignment)];

    for row in wrap_text(message.content(), width) {
        lines.push(Line::from(Span::styled(row, text_style)).alignment(alignment));
    }

    lines
}

/// Wraps text to `width` display columns. Explicit newlines, indentation and
/// runs of spaces are kept; only the whitespace at a wrap point is dropped.
/// Words wider than a row are split by character. Tabs become four spaces.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let text = text.replace('\t', TAB_SPACES);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;
        let mut gap = String::new();

        for (token, is_space) in split_keeping_whitespace(paragraph) {
            if is_space {
                gap.push_str(token);
                continue;
            }

            let gap_width = display_width(&gap);
            let word_width = display_width(token);

            if row_width + gap_width + word_width <= width {
                row.push_str(&gap);
                row.push_str(token);
                row_width += gap_width + word_width;
                gap.clear();
                continue;
            }

            // Leading indentation stays with the first word of a paragraph.
            let piece = if row.is_empty() {
                format!("{gap}{token}")
            } else {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
                token.to_owned()
            };
            gap.clear();

            for ch in piece.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if row_width + ch_width > width && !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(ch);
                row_width += ch_width;
            }
        }

        for ch in gap.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width {
                break;
            }
            row.push(ch);
            row_width += ch_width;
        }

        rows.push(row);
    }

    rows
}

/// Splits into alternating runs of whitespace and non-whitespace, flagging
/// the whitespace runs.
fn split_keeping_whitespace(text: &str) -> Vec<(&str, bool)> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (index, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            Some(current) if current != is_space => {
                tokens.push((&text[start..index], current));
                start = index;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }

    if let Some(current) = in_space {
        tokens.push((&text[start..], current));
    }

    tokens
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}
