use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use std::error::Error as StdError;
use log::info;

use super::{ ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmType };
use crate::models::chat::{ ChatMessage, Role };

#[derive(Debug)]
pub struct OllamaChatClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaReply>,
}

#[derive(Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

impl OllamaChatClient {
    pub fn new(
        base_url: Option<String>,
        completion_model: Option<String>,
        max_tokens: Option<u32>
    ) -> Self {
        let model = completion_model.unwrap_or_else(|| "llama3".to_string());
        let url = base_url.unwrap_or_else(|| "http://localhost:11434".into());

        Self {
            http: HttpClient::new(),
            base_url: url.trim_end_matches('/').to_string(),
            completion_model: model,
            max_tokens,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if config.llm_type != LlmType::Ollama {
            return Err("Invalid config type for OllamaChatClient".into());
        }

        Ok(Self::new(config.base_url.clone(), config.completion_model.clone(), config.max_tokens))
    }

    fn build_request(&self, prompt: &str, prior_turns: &[ChatMessage]) -> OllamaChatRequest {
        let mut messages: Vec<OllamaMessage> = prior_turns
            .iter()
            .map(|turn| OllamaMessage {
                role: match turn.role {
                    Role::User => "user",
                    Role::Bot => "assistant",
                },
                content: turn.content.clone(),
            })
            .collect();
        messages.push(OllamaMessage { role: "user", content: prompt.to_string() });

        OllamaChatRequest {
            model: self.completion_model.clone(),
            messages,
            stream: false,
            options: self.max_tokens.map(|num_predict| OllamaOptions { num_predict }),
        }
    }
}

#[async_trait]
impl ChatClient for OllamaChatClient {
    async fn complete(
        &self,
        prompt: &str,
        prior_turns: &[ChatMessage]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let url = format!("{}/api/chat", self.base_url);
        info!("OllamaChatClient::complete() → model={} url={}", self.completion_model, url);
        let req = self.build_request(prompt, prior_turns);
        let resp = self.http.post(&url).json(&req).send().await?.error_for_status()?;
        let data = resp.json::<OllamaChatResponse>().await?;
        Ok(CompletionResponse {
            response: data.message.map(|m| m.content).unwrap_or_default(),
        })
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
