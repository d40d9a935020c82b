use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::Serialize;

use crate::{
    infra::{config::BackendConfig, error::AppError},
    usecases::send_message::{ChatSource, ChatSourceError, RawChatResponse},
};

const CHAT_PATH: &str = "/chat";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// `ChatSource` backed by a reqwest client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChatSource {
    client: Client,
    endpoint: String,
}

impl HttpChatSource {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(AppError::HttpClientBuild)?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatSource for HttpChatSource {
    async fn post_chat(&self, message: &str) -> Result<RawChatResponse, ChatSourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;

        Ok(RawChatResponse::new(status, body))
    }
}

/// Joins the base URL and the chat path, tolerating a trailing slash.
pub fn chat_endpoint(base_url: &str) -> String {
    format!("{}{CHAT_PATH}", base_url.trim_end_matches('/'))
}

fn map_transport_error(error: reqwest::Error) -> ChatSourceError {
    if error.is_timeout() {
        ChatSourceError::Timeout
    } else {
        ChatSourceError::Transport(error.to_string())
    }
}
