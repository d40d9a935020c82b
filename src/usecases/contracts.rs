use anyhow::Result;

use crate::domain::{conversation::CycleId, events::AppEvent, shell_state::ShellState};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Starts a dispatch cycle without blocking the caller. The outcome comes back
/// later as `AppEvent::ReplyReceived` for the same cycle.
pub trait ReplyDispatcher {
    fn start(&self, cycle: CycleId, message: String) -> Result<()>;
}
