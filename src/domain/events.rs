use super::conversation::CycleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    ReplyReceived(DispatchOutcome),
}

/// Normalized key press. Named keys use lowercase names ("enter", "backspace",
/// "pageup"...); printable keys carry the character itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Returns the character for printable single-char keys.
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

/// The string a dispatcher resolved to for one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub cycle: CycleId,
    pub reply: String,
}
