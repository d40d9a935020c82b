//! UI layer: terminal rendering and input for the chat screen.

mod event_source;
mod message_input;
pub mod shell;
mod styles;
mod terminal;
mod transcript;
mod view;

pub(crate) use event_source::CrosstermEventSource;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
