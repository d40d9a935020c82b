use anyhow::Result;

use crate::{
    domain::{
        conversation::SubmitOutcome,
        draft::DraftState,
        events::{AppEvent, DispatchOutcome, KeyInput},
        shell_state::ShellState,
    },
    usecases::send_message::DispatchError,
};

use super::contracts::{ReplyDispatcher, ShellOrchestrator};

const DISPATCH_START_FAILED: &str = "DISPATCH_START_FAILED";
const STALE_DISPATCH_OUTCOME: &str = "STALE_DISPATCH_OUTCOME";

/// Lines moved by PageUp/PageDown in the transcript.
const SCROLL_PAGE_LINES: usize = 10;

pub struct DefaultShellOrchestrator<D>
where
    D: ReplyDispatcher,
{
    state: ShellState,
    dispatcher: D,
}

impl<D> DefaultShellOrchestrator<D>
where
    D: ReplyDispatcher,
{
    pub fn new(dispatcher: D) -> Self {
        Self {
            state: ShellState::default(),
            dispatcher,
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Result<()> {
        if key.ctrl && key.key == "c" {
            self.state.stop();
            return Ok(());
        }

        match key.key.as_str() {
            "enter" if !key.shift => self.submit(),
            "enter" => {
                self.edit_draft(|draft| {
                    draft.insert_newline();
                });
            }
            "pageup" => self.state.conversation_mut().scroll_up(SCROLL_PAGE_LINES),
            "pagedown" => self.state.conversation_mut().scroll_down(SCROLL_PAGE_LINES),
            "up" => self.state.conversation_mut().scroll_up(1),
            "down" => self.state.conversation_mut().scroll_down(1),
            "backspace" => self.edit_draft(|draft| draft.delete_before_cursor()),
            "delete" => self.edit_draft(|draft| draft.delete_at_cursor()),
            "left" => self.edit_draft(|draft| draft.move_left()),
            "right" => self.edit_draft(|draft| draft.move_right()),
            "home" => self.edit_draft(|draft| draft.move_home()),
            "end" => self.edit_draft(|draft| draft.move_end()),
            _ => {
                if let Some(ch) = key.as_char().filter(|_| !key.ctrl) {
                    self.edit_draft(|draft| {
                        draft.insert_char(ch);
                    });
                }
            }
        }

        Ok(())
    }

    fn edit_draft<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut DraftState),
    {
        match self.state.conversation_mut().draft_mut() {
            Some(draft) => edit(draft),
            None => tracing::trace!("draft edit ignored while a reply is pending"),
        }
    }

    fn submit(&mut self) {
        match self.state.conversation_mut().submit() {
            SubmitOutcome::Dispatch { cycle, text } => {
                tracing::info!(cycle, chars = text.chars().count(), "send cycle started");

                if let Err(error) = self.dispatcher.start(cycle, text) {
                    tracing::error!(
                        code = DISPATCH_START_FAILED,
                        cycle,
                        error = ?error,
                        "could not start dispatch; resolving cycle with failure"
                    );
                    self.state
                        .conversation_mut()
                        .resolve(cycle, DispatchError::Unavailable.user_message());
                }
            }
            SubmitOutcome::Blank => tracing::debug!("blank draft submit ignored"),
            SubmitOutcome::Busy => tracing::debug!("submit ignored while a reply is pending"),
        }
    }

    fn handle_reply(&mut self, outcome: DispatchOutcome) {
        let DispatchOutcome { cycle, reply } = outcome;

        if self.state.conversation_mut().resolve(cycle, reply) {
            tracing::info!(cycle, "send cycle resolved");
        } else {
            tracing::warn!(
                code = STALE_DISPATCH_OUTCOME,
                cycle,
                pending = ?self.state.conversation().pending_cycle(),
                "dropping outcome for a cycle that is not pending"
            );
        }
    }
}

impl<D> ShellOrchestrator for DefaultShellOrchestrator<D>
where
    D: ReplyDispatcher,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => {}
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(key)?,
            AppEvent::ReplyReceived(outcome) => self.handle_reply(outcome),
        }

        Ok(())
    }
}
