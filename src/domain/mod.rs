//! Domain layer: conversation entities and their transitions.

pub mod conversation;
pub mod draft;
pub mod events;
pub mod message;
pub mod shell_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
