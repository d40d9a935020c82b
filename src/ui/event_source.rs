use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, DispatchOutcome, KeyInput},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Merges terminal input with dispatch outcomes arriving from the backend.
/// Outcomes are drained before the terminal is polled so replies show up
/// without waiting for a key press.
pub struct CrosstermEventSource {
    replies: Receiver<DispatchOutcome>,
    replies_open: bool,
}

impl CrosstermEventSource {
    pub fn new(replies: Receiver<DispatchOutcome>) -> Self {
        Self {
            replies,
            replies_open: true,
        }
    }

    fn next_reply(&mut self) -> Option<AppEvent> {
        if !self.replies_open {
            return None;
        }

        match self.replies.try_recv() {
            Ok(outcome) => Some(AppEvent::ReplyReceived(outcome)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("dispatch outcome channel closed");
                self.replies_open = false;
                None
            }
        }
    }
}

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if let Some(reply) = self.next_reply() {
            return Ok(Some(reply));
        }

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key_event(key)),
            Event::Resize(_, _) => Ok(Some(AppEvent::Tick)),
            _ => Ok(None),
        }
    }
}

/// Maps a crossterm key press to an app event. Releases and repeats of
/// non-press kinds are dropped.
pub fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
        return Some(AppEvent::QuitRequested);
    }

    let name = match key.code {
        KeyCode::Enter => {
            let input = KeyInput::new("enter", ctrl);
            let newline = key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
            return Some(AppEvent::InputKey(if newline {
                input.with_shift()
            } else {
                input
            }));
        }
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::PageUp => "pageup".to_owned(),
        KeyCode::PageDown => "pagedown".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<AppEvent> {
        map_key_event(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn plain_enter_maps_to_submit_key() {
        assert_eq!(
            press(KeyCode::Enter, KeyModifiers::NONE),
            Some(AppEvent::InputKey(KeyInput::new("enter", false)))
        );
    }

    #[test]
    fn shift_or_alt_enter_maps_to_newline_key() {
        let expected = Some(AppEvent::InputKey(KeyInput::new("enter", false).with_shift()));

        assert_eq!(press(KeyCode::Enter, KeyModifiers::SHIFT), expected);
        assert_eq!(press(KeyCode::Enter, KeyModifiers::ALT), expected);
    }

    #[test]
    fn esc_and_ctrl_c_quit() {
        assert_eq!(
            press(KeyCode::Esc, KeyModifiers::NONE),
            Some(AppEvent::QuitRequested)
        );
        assert_eq!(
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(AppEvent::QuitRequested)
        );
    }

    #[test]
    fn printable_chars_keep_their_text() {
        assert_eq!(
            press(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(AppEvent::InputKey(KeyInput::new("q", false)))
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(map_key_event(release), None);
    }

    #[test]
    fn pending_reply_is_delivered_before_terminal_poll() {
        let (tx, rx) = mpsc::channel();
        let mut source = CrosstermEventSource::new(rx);
        let outcome = DispatchOutcome {
            cycle: 0,
            reply: "hi".to_owned(),
        };
        tx.send(outcome.clone()).expect("send");

        assert_eq!(source.next_reply(), Some(AppEvent::ReplyReceived(outcome)));
        assert_eq!(source.next_reply(), None);
    }

    #[test]
    fn closed_reply_channel_is_remembered() {
        let (tx, rx) = mpsc::channel::<DispatchOutcome>();
        let mut source = CrosstermEventSource::new(rx);
        drop(tx);

        assert_eq!(source.next_reply(), None);
        assert!(!source.replies_open);
    }
}
