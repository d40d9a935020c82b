//! Conversation log and the transient flags that drive the chat screen.

use super::{draft::DraftState, message::Message};

/// Identifies one dispatch cycle, from submit until its reply is appended.
pub type CycleId = u64;

/// Result of attempting the submit transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user message was appended; `text` must now be dispatched.
    Dispatch { cycle: CycleId, text: String },
    /// Draft was empty or whitespace-only. Nothing changed.
    Blank,
    /// A cycle is already in flight. Nothing changed.
    Busy,
}

/// Owns the append-only log, the draft and the in-flight flag.
///
/// The log only grows through [`ConversationState::submit`] and
/// [`ConversationState::resolve`], so every completed cycle contributes one
/// user entry followed by one bot entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    draft: DraftState,
    pending_cycle: Option<CycleId>,
    next_cycle: CycleId,
    scroll_back: usize,
}

impl ConversationState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending_cycle.is_some()
    }

    pub fn pending_cycle(&self) -> Option<CycleId> {
        self.pending_cycle
    }

    /// Input and send affordances are enabled iff no cycle is in flight.
    pub fn accepts_input(&self) -> bool {
        !self.is_in_flight()
    }

    /// Mutable draft access for editing keys. `None` while a cycle is in flight.
    pub fn draft_mut(&mut self) -> Option<&mut DraftState> {
        if self.is_in_flight() {
            None
        } else {
            Some(&mut self.draft)
        }
    }

    /// Submit transition: appends the trimmed draft as a user message, clears
    /// the draft and marks the conversation busy.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_in_flight() {
            return SubmitOutcome::Busy;
        }

        let Some(text) = self.draft.take_trimmed() else {
            return SubmitOutcome::Blank;
        };

        let cycle = self.next_cycle;
        self.next_cycle += 1;
        self.pending_cycle = Some(cycle);
        self.push(Message::user(text.clone()));

        SubmitOutcome::Dispatch { cycle, text }
    }

    /// Resolve transition: appends the dispatcher's string as a bot message
    /// and returns to idle. Outcomes for any cycle other than the pending one
    /// are ignored and reported as `false`.
    pub fn resolve(&mut self, cycle: CycleId, reply: impl Into<String>) -> bool {
        if self.pending_cycle != Some(cycle) {
            return false;
        }

        self.pending_cycle = None;
        self.push(Message::bot(reply));
        true
    }

    /// Number of rendered lines the transcript is scrolled up from the bottom.
    /// Zero means the newest entry is in view.
    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn is_following_latest(&self) -> bool {
        self.scroll_back == 0
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Caps the scroll-back distance to what the rendered transcript allows.
    pub fn clamp_scroll_back(&mut self, max_scroll_back: usize) {
        self.scroll_back = self.scroll_back.min(max_scroll_back);
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_back = 0;
    }
}
