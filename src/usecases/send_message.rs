//! Use case for sending one message to the chatbot backend.
//!
//! [`dispatch`] is the message dispatcher: it always resolves to a string,
//! either the bot reply or a normalized, human-readable error. Transport
//! concerns live behind the [`ChatSource`] trait so the classification rules
//! here can be exercised without a network.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

const DISPATCH_EMPTY_MESSAGE: &str = "DISPATCH_EMPTY_MESSAGE";
const DISPATCH_UNEXPECTED_RESPONSE: &str = "DISPATCH_UNEXPECTED_RESPONSE";
const DISPATCH_BACKEND_ERROR: &str = "DISPATCH_BACKEND_ERROR";
const DISPATCH_UNAVAILABLE: &str = "DISPATCH_UNAVAILABLE";

/// Status and body of a completed HTTP exchange, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChatResponse {
    pub status: u16,
    pub body: String,
}

impl RawChatResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors raised before any HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatSourceError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Performs the raw `POST /chat` exchange with the backend.
#[async_trait]
pub trait ChatSource: Send + Sync {
    /// Sends `{"message": message}` and returns the response as received.
    ///
    /// # Errors
    /// Returns `ChatSourceError` when no response arrived (timeout, refused
    /// connection, broken body stream).
    async fn post_chat(&self, message: &str) -> Result<RawChatResponse, ChatSourceError>;
}

/// Failure classes of one dispatch, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Message was empty or whitespace-only; no request was made.
    #[error("message is empty")]
    EmptyMessage,
    /// 2xx response without a usable `reply` field.
    #[error("response body has no usable reply field")]
    UnexpectedResponse,
    /// Non-2xx response carrying an `error` field.
    #[error("backend reported: {0}")]
    Backend(String),
    /// Non-2xx response without a usable body, transport failure or timeout.
    #[error("backend unavailable")]
    Unavailable,
}

impl DispatchError {
    /// The string shown to the user in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyMessage => "Error: Message cannot be empty".to_owned(),
            Self::UnexpectedResponse => "Error: Unexpected response from API".to_owned(),
            Self::Backend(text) => format!("Error: {text}"),
            Self::Unavailable => "Error: Unable to get response".to_owned(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => DISPATCH_EMPTY_MESSAGE,
            Self::UnexpectedResponse => DISPATCH_UNEXPECTED_RESPONSE,
            Self::Backend(_) => DISPATCH_BACKEND_ERROR,
            Self::Unavailable => DISPATCH_UNAVAILABLE,
        }
    }
}

/// Sends `message` through `source` and resolves to the reply text or to the
/// user-facing error string. Never fails and never retries.
pub async fn dispatch(source: &dyn ChatSource, message: &str) -> String {
    match try_dispatch(source, message).await {
        Ok(reply) => reply,
        Err(error) => {
            tracing::warn!(code = error.code(), error = %error, "chat dispatch failed");
            error.user_message()
        }
    }
}

/// Like [`dispatch`] but keeps the failure class.
///
/// # Errors
/// Returns the `DispatchError` matching the first failed check.
pub async fn try_dispatch(source: &dyn ChatSource, message: &str) -> Result<String, DispatchError> {
    if message.trim().is_empty() {
        return Err(DispatchError::EmptyMessage);
    }

    tracing::debug!(chars = message.chars().count(), "dispatching chat message");

    let response = source.post_chat(message).await.map_err(|error| {
        tracing::debug!(error = %error, "chat request did not complete");
        DispatchError::Unavailable
    })?;

    tracing::debug!(status = response.status, "chat response received");
    classify_response(&response)
}

/// Maps a completed HTTP exchange to the reply text or a failure class.
pub fn classify_response(response: &RawChatResponse) -> Result<String, DispatchError> {
    let body: Option<Value> = serde_json::from_str(&response.body).ok();

    if response.is_success() {
        return body
            .as_ref()
            .and_then(|value| non_empty_str_field(value, "reply"))
            .map(str::to_owned)
            .ok_or(DispatchError::UnexpectedResponse);
    }

    match body
        .as_ref()
        .and_then(|value| non_empty_str_field(value, "error"))
    {
        Some(text) => Err(DispatchError::Backend(text.to_owned())),
        None => Err(DispatchError::Unavailable),
    }
}

fn non_empty_str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubSource {
        result: Result<RawChatResponse, ChatSourceError>,
        captured: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn with_result(result: Result<RawChatResponse, ChatSourceError>) -> Self {
            Self {
                result,
                captured: Mutex::new(Vec::new()),
            }
        }

        fn responding(status: u16, body: &str) -> Self {
            Self::with_result(Ok(RawChatResponse::new(status, body)))
        }

        fn calls(&self) -> Vec<String> {
            self.captured.lock().expect("stub lock").clone()
        }
    }

    #[async_trait]
    impl ChatSource for StubSource {
        async fn post_chat(&self, message: &str) -> Result<RawChatResponse, ChatSourceError> {
            self.captured
                .lock()
                .expect("stub lock")
                .push(message.to_owned());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn returns_reply_field_on_success() {
        let source = StubSource::responding(200, r#"{"reply":"hi"}"#);

        assert_eq!(dispatch(&source, "hello").await, "hi");
        assert_eq!(source.calls(), vec!["hello".to_owned()]);
    }

    #[tokio::test]
    async fn empty_message_returns_sentinel_without_request() {
        let source = StubSource::responding(200, r#"{"reply":"hi"}"#);

        for message in ["", "   ", "\n\t"] {
            assert_eq!(
                dispatch(&source, message).await,
                "Error: Message cannot be empty"
            );
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn wrong_shape_success_is_unexpected_response() {
        let source = StubSource::responding(200, r#"{"data":"wrong shape"}"#);

        assert_eq!(
            dispatch(&source, "hello").await,
            "Error: Unexpected response from API"
        );
    }

    #[tokio::test]
    async fn structured_http_error_is_surfaced() {
        let source = StubSource::responding(429, r#"{"error":"rate limited"}"#);

        let reply = dispatch(&source, "hello").await;

        assert!(reply.contains("rate limited"));
        assert_eq!(reply, "Error: rate limited");
    }

    #[tokio::test]
    async fn unstructured_http_error_is_generic_failure() {
        let source = StubSource::responding(500, "Internal Server Error");

        assert_eq!(
            dispatch(&source, "hello").await,
            "Error: Unable to get response"
        );
    }

    #[tokio::test]
    async fn timeout_is_generic_failure() {
        let source = StubSource::with_result(Err(ChatSourceError::Timeout));

        assert_eq!(
            try_dispatch(&source, "hello").await,
            Err(DispatchError::Unavailable)
        );
        assert_eq!(
            dispatch(&source, "hello").await,
            "Error: Unable to get response"
        );
    }

    #[tokio::test]
    async fn transport_failure_is_generic_failure() {
        let source = StubSource::with_result(Err(ChatSourceError::Transport(
            "connection refused".to_owned(),
        )));

        assert_eq!(
            dispatch(&source, "hello").await,
            "Error: Unable to get response"
        );
    }

    #[test]
    fn success_with_non_json_body_is_unexpected() {
        let response = RawChatResponse::new(200, "<html>ok</html>");

        assert_eq!(
            classify_response(&response),
            Err(DispatchError::UnexpectedResponse)
        );
    }

    #[test]
    fn success_with_non_string_or_empty_reply_is_unexpected() {
        for body in [r#"{"reply":42}"#, r#"{"reply":""}"#, r#"{"reply":null}"#, "[]"] {
            let response = RawChatResponse::new(200, body);

            assert_eq!(
                classify_response(&response),
                Err(DispatchError::UnexpectedResponse),
                "body: {body}"
            );
        }
    }

    #[test]
    fn error_field_on_success_status_is_not_surfaced() {
        let response = RawChatResponse::new(200, r#"{"error":"boom"}"#);

        assert_eq!(
            classify_response(&response),
            Err(DispatchError::UnexpectedResponse)
        );
    }

    #[test]
    fn http_error_with_empty_error_field_is_generic() {
        let response = RawChatResponse::new(400, r#"{"error":""}"#);

        assert_eq!(classify_response(&response), Err(DispatchError::Unavailable));
    }

    #[test]
    fn whitespace_only_fields_are_passed_through() {
        let reply = RawChatResponse::new(200, r#"{"reply":" "}"#);
        let error = RawChatResponse::new(400, r#"{"error":"  "}"#);

        assert_eq!(classify_response(&reply), Ok(" ".to_owned()));
        assert_eq!(
            classify_response(&error),
            Err(DispatchError::Backend("  ".to_owned()))
        );
    }

    #[test]
    fn reply_field_on_error_status_is_ignored() {
        let response = RawChatResponse::new(503, r#"{"reply":"hi"}"#);

        assert_eq!(classify_response(&response), Err(DispatchError::Unavailable));
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(DispatchError::EmptyMessage.code(), "DISPATCH_EMPTY_MESSAGE");
        assert_eq!(
            DispatchError::Backend("x".to_owned()).code(),
            "DISPATCH_BACKEND_ERROR"
        );
        assert_eq!(DispatchError::Unavailable.code(), "DISPATCH_UNAVAILABLE");
    }
}
