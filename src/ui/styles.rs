//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Transcript styles
// =============================================================================

/// Style for the "You" label on user messages.
pub fn user_label_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Style for the "Bot" label on bot messages.
pub fn bot_label_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

/// Style for bot entries that carry an error string.
pub fn error_text_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the transient "Bot is typing..." line.
pub fn pending_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

pub fn empty_transcript_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Input styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Input text while a reply is pending.
pub fn input_disabled_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM)
}

// =============================================================================
// Panel styles
// =============================================================================

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn status_bar_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_are_bold_and_distinct() {
        let user = user_label_style();
        let bot = bot_label_style();

        assert!(user.add_modifier.contains(Modifier::BOLD));
        assert!(bot.add_modifier.contains(Modifier::BOLD));
        assert_ne!(user.fg, bot.fg);
    }

    #[test]
    fn error_text_style_is_red() {
        assert_eq!(error_text_style().fg, Some(Color::Red));
    }

    #[test]
    fn disabled_input_is_dimmed() {
        let style = input_disabled_style();

        assert_eq!(style.fg, Some(Color::DarkGray));
        assert!(style.add_modifier.contains(Modifier::DIM));
    }
}
