use super::conversation::ConversationState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    conversation: ConversationState,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            conversation: ConversationState::default(),
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut ConversationState {
        &mut self.conversation
    }
}
