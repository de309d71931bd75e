#![allow(dead_code)]

use std::error::Error;
use std::sync::{ Arc, Mutex };

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{ Request, StatusCode };
use axum::Router;
use tower::ServiceExt;

use caesar_chat::agent::ChatAgent;
use caesar_chat::history::{ ExchangeStore, MemoryExchangeStore };
use caesar_chat::llm::chat::{ ChatClient, CompletionResponse };
use caesar_chat::models::chat::{ ChatMessage, StoredExchange };
use caesar_chat::server::{ create_router, AppState };
use caesar_chat::session::{ Transport, TransportError };

pub const TEST_RATE_LIMIT: u32 = 1_000;

pub struct MockChatClient {
    reply: Option<String>,
    pub calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl MockChatClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Some(text.to_string()), calls: Mutex::new(Vec::new()) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { reply: None, calls: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(
        &self,
        prompt: &str,
        prior_turns: &[ChatMessage]
    ) -> Result<CompletionResponse, Box<dyn Error + Send + Sync>> {
        self.calls.lock().unwrap().push((prompt.to_string(), prior_turns.to_vec()));
        match &self.reply {
            Some(text) => Ok(CompletionResponse { response: text.clone() }),
            None => Err("generation service unavailable".into()),
        }
    }

    fn get_model(&self) -> String {
        "mock".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub struct FailingStore;

#[async_trait]
impl ExchangeStore for FailingStore {
    async fn append(
        &self,
        _question: &str,
        _answer: Option<&str>
    ) -> Result<StoredExchange, Box<dyn Error + Send + Sync>> {
        Err("connection refused".into())
    }

    async fn list_all(&self) -> Result<Vec<StoredExchange>, Box<dyn Error + Send + Sync>> {
        Err("connection refused".into())
    }
}

pub fn app_with(client: Arc<dyn ChatClient>, store: Arc<dyn ExchangeStore>, rate_limit: u32) -> Router {
    create_router(AppState::new(ChatAgent::new(client, store), rate_limit))
}

pub fn test_app(client: Arc<dyn ChatClient>) -> (Router, Arc<MemoryExchangeStore>) {
    let store = Arc::new(MemoryExchangeStore::new());
    (app_with(client, store.clone(), TEST_RATE_LIMIT), store)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Drives the submit route of an in-process router, standing in for the network.
pub struct RouterTransport {
    pub app: Router,
}

#[async_trait]
impl Transport for RouterTransport {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let body = serde_json::json!({ "messages": messages }).to_string();
        let (status, json) = send(&self.app, post_json("/api", &body)).await;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: json["error"].as_str().unwrap_or_default().to_string(),
            });
        }
        Ok(json["text"].as_str().unwrap_or_default().to_string())
    }
}
