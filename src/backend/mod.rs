//! Backend integration layer: HTTP transport and background dispatching.

mod dispatcher;
mod http;

pub use dispatcher::BackgroundDispatcher;
pub use http::{chat_endpoint, HttpChatSource};

/// Returns the backend module name for smoke checks.
pub fn module_name() -> &'static str {
    "backend"
}
