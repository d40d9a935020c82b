use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{conversation::ConversationState, shell_state::ShellState};

use super::{
    message_input::{input_height, render_message_input},
    styles,
    transcript::{build_transcript_lines, visible_window, EMPTY_TRANSCRIPT_HINT},
};

const KEY_HINTS: &str = "Enter send | Shift/Alt+Enter newline | PgUp/PgDn scroll | Esc quit";

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState, endpoint: &str) {
    let input_rows = input_height(state.conversation().draft());

    let [transcript_area, input_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(input_rows),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_transcript(frame, transcript_area, state.conversation_mut());

    let conversation = state.conversation();
    render_message_input(
        frame,
        input_area,
        conversation.draft(),
        conversation.accepts_input(),
    );

    let status = Paragraph::new(status_line(conversation, endpoint));
    frame.render_widget(status, status_area);
}

fn render_transcript(frame: &mut Frame<'_>, area: Rect, conversation: &mut ConversationState) {
    let block = Block::default()
        .title(transcript_title(conversation))
        .borders(Borders::ALL)
        .border_style(styles::inactive_panel_border_style());

    if conversation.messages().is_empty() && !conversation.is_in_flight() {
        let hint = Paragraph::new(Span::styled(
            EMPTY_TRANSCRIPT_HINT,
            styles::empty_transcript_style(),
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    // Inner size = area minus borders
    let inner_width = area.width.saturating_sub(2) as usize;
    let viewport_height = area.height.saturating_sub(2) as usize;

    let lines = build_transcript_lines(
        conversation.messages(),
        conversation.is_in_flight(),
        inner_width,
    );
    let (first_row, max_scroll_back) =
        visible_window(lines.len(), viewport_height, conversation.scroll_back());
    conversation.clamp_scroll_back(max_scroll_back);

    let visible: Vec<Line<'static>> = lines
        .into_iter()
        .skip(first_row)
        .take(viewport_height)
        .collect();

    let paragraph = Paragraph::new(visible).block(block);
    frame.render_widget(paragraph, area);
}

fn transcript_title(conversation: &ConversationState) -> String {
    let count = conversation.messages().len();
    if conversation.is_following_latest() {
        format!("ChatBot ({count})")
    } else {
        format!("ChatBot ({count}) - scrolled")
    }
}

fn status_line(conversation: &ConversationState, endpoint: &str) -> Line<'static> {
    let state_label = if conversation.is_in_flight() {
        "waiting"
    } else {
        "ready"
    };

    Line::from(Span::styled(
        format!("{state_label} | {endpoint} | {KEY_HINTS}"),
        styles::status_bar_style(),
    ))
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn rendered_text(state: &mut ShellState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|frame| render(frame, state, "http://127.0.0.1:8080/chat"))
            .expect("draw");

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn type_and_submit(state: &mut ShellState, text: &str) -> u64 {
        let conversation = state.conversation_mut();
        let draft = conversation.draft_mut().expect("idle");
        for ch in text.chars() {
            draft.insert_char(ch);
        }
        match conversation.submit() {
            crate::domain::conversation::SubmitOutcome::Dispatch { cycle, .. } => cycle,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn empty_state_shows_hint() {
        let mut state = ShellState::default();

        let text = rendered_text(&mut state, 80, 12);

        assert!(text.contains("Say hello!"));
        assert!(text.contains("ready"));
    }

    #[test]
    fn in_flight_state_shows_placeholder_and_disabled_input() {
        let mut state = ShellState::default();
        type_and_submit(&mut state, "hello");

        let text = rendered_text(&mut state, 80, 12);

        assert!(text.contains("hello"));
        assert!(text.contains("Bot is typing..."));
        assert!(text.contains("Waiting for reply..."));
        assert!(text.contains("waiting"));
    }

    #[test]
    fn resolved_cycle_shows_reply() {
        let mut state = ShellState::default();
        let cycle = type_and_submit(&mut state, "hello");
        state.conversation_mut().resolve(cycle, "hi there");

        let text = rendered_text(&mut state, 80, 12);

        assert!(text.contains("hi there"));
        assert!(!text.contains("Bot is typing..."));
    }

    #[test]
    fn newest_entry_stays_visible_in_small_viewport() {
        let mut state = ShellState::default();
        for index in 0..10 {
            let cycle = type_and_submit(&mut state, &format!("question {index}"));
            state
                .conversation_mut()
                .resolve(cycle, format!("answer {index}"));
        }

        let text = rendered_text(&mut state, 60, 12);

        assert!(text.contains("answer 9"));
        assert!(!text.contains("question 0"));
    }

    #[test]
    fn newest_entry_stays_visible_past_u16_rows() {
        let mut state = ShellState::default();
        let long_reply = vec!["row"; 40_000].join("\n");
        for _ in 0..2 {
            let cycle = type_and_submit(&mut state, "more");
            state.conversation_mut().resolve(cycle, long_reply.clone());
        }
        let cycle = type_and_submit(&mut state, "last question");
        state.conversation_mut().resolve(cycle, "final answer");

        let text = rendered_text(&mut state, 60, 12);

        assert!(text.contains("final answer"));
        assert!(state.conversation().is_following_latest());
    }

    #[test]
    fn excessive_scroll_back_is_clamped_during_render() {
        let mut state = ShellState::default();
        for index in 0..5 {
            let cycle = type_and_submit(&mut state, &format!("q{index}"));
            state.conversation_mut().resolve(cycle, format!("a{index}"));
        }
        state.conversation_mut().scroll_up(1_000);

        let text = rendered_text(&mut state, 60, 12);

        assert!(text.contains("q0"));
        assert!(state.conversation().scroll_back() < 1_000);
    }
}
