use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use thiserror::Error;

use crate::models::api::{ ErrorResponse, SubmitRequest, SubmitResponse };
use crate::models::chat::ChatMessage;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to chat server failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat server answered {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },
}

/// Carries the whole transcript to the submit endpoint and returns the answer text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, TransportError>;
}

pub struct HttpTransport {
    http: HttpClient,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        debug!("Posting {} message(s) to {}", messages.len(), self.endpoint);
        let body = SubmitRequest { messages: messages.to_vec() };
        let resp = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorResponse>().await
                .map(|e| e.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(TransportError::Status { status: status.as_u16(), message });
        }

        Ok(resp.json::<SubmitResponse>().await?.text)
    }
}
