//! Editable draft of the next outbound message.

/// Maximum number of characters a draft may hold.
const MAX_DRAFT_LENGTH: usize = 4096;

/// Draft text plus a cursor measured in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftState {
    text: String,
    cursor: usize,
}

impl DraftState {
    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Inserts a character at the cursor. Returns false once the draft is full.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= MAX_DRAFT_LENGTH {
            return false;
        }
        let byte_idx = self.byte_index(self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        self.insert_char('\n')
    }

    /// Backspace.
    pub fn delete_before_cursor(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
    }

    /// Delete key.
    pub fn delete_at_cursor(&mut self) {
        if self.cursor < self.char_count() {
            self.remove_at_cursor();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Empties the draft and returns its trimmed content, or `None` when the
    /// draft is blank. A blank draft is left untouched.
    pub fn take_trimmed(&mut self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let taken = trimmed.to_owned();
        self.text.clear();
        self.cursor = 0;
        Some(taken)
    }

    /// Zero-based (line, column) of the cursor, counting characters.
    pub fn cursor_line_and_column(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor).collect();
        let line = before.matches('\n').count();
        let column = before
            .rsplit('\n')
            .next()
            .map(|tail| tail.chars().count())
            .unwrap_or(0);
        (line, column)
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.text.drain(start..end);
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}
