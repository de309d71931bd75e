use async_trait::async_trait;
use std::error::Error as StdError;
use log::{ debug, info };

use super::{ ChatClient, CompletionResponse };
use crate::llm::LlmConfig;
use crate::models::chat::{ ChatMessage as TranscriptMessage, Role };
use rllm::chat::{ ChatMessage, ChatRole, MessageType };
use rllm::builder::{ LLMBackend, LLMBuilder };
use rllm::LLMProvider;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiChatClient {
    llm: Box<dyn LLMProvider + Send + Sync>,
    model: String,
    base_url: Option<String>,
}

/// Builds the message list sent to the provider: the prior turns in order,
/// then the new prompt as a user message.
pub fn to_provider_messages(prompt: &str, prior_turns: &[TranscriptMessage]) -> Vec<ChatMessage> {
    prior_turns
        .iter()
        .map(|turn| ChatMessage {
            role: match turn.role {
                Role::User => ChatRole::User,
                Role::Bot => ChatRole::Assistant,
            },
            content: turn.content.clone(),
            message_type: MessageType::Text,
        })
        .chain(
            std::iter::once(ChatMessage {
                role: ChatRole::User,
                content: prompt.to_string(),
                message_type: MessageType::Text,
            })
        )
        .collect()
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        max_tokens: Option<u32>
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let chat_model = model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let mut builder = LLMBuilder::new()
            .backend(LLMBackend::Google)
            .api_key(api_key)
            .model(&chat_model)
            .stream(false);

        if let Some(url) = &base_url {
            builder = builder.base_url(url);
        }
        if let Some(tokens) = max_tokens {
            builder = builder.max_tokens(tokens);
        }

        let llm_provider = builder.build()?;

        Ok(Self {
            llm: llm_provider,
            model: chat_model,
            base_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| "Google API key is required for GeminiChatClient".to_string())?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
            config.max_tokens
        )
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(
        &self,
        prompt: &str,
        prior_turns: &[TranscriptMessage]
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let messages = to_provider_messages(prompt, prior_turns);
        info!(
            "GeminiChatClient::complete() → model={} base_url={:?} turns={}",
            self.model,
            self.base_url,
            messages.len()
        );
        let resp = self.llm.chat(&messages).await?;
        let text = resp
            .text()
            .map(|s| s.to_string())
            .unwrap_or_default();
        debug!("Gemini returned {} characters", text.len());
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        self.base_url.clone()
    }
}
