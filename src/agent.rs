use crate::cli::Args;
use crate::history::{ initialize_exchange_store, ExchangeStore };
use crate::llm::LlmConfig;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::ChatMessage;

use log::{ info, warn, error };
use std::error::Error;
use std::sync::Arc;
use thiserror::Error as ThisError;

pub const FALLBACK_RESPONSE: &str = "No response from the bot.";

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ChatError {
    #[error("messages must not be empty")]
    EmptyConversation,
    #[error("the last message must come from the user")]
    NotUserTurn,
    #[error("message content must not be blank")]
    BlankMessage,
}

#[derive(Clone)]
pub struct ChatAgent {
    chat_client: Arc<dyn ChatClient>,
    exchange_store: Arc<dyn ExchangeStore>,
}

impl ChatAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, exchange_store: Arc<dyn ExchangeStore>) -> Self {
        Self { chat_client, exchange_store }
    }

    fn initialize_llm_client(args: &Args) -> Result<Arc<dyn ChatClient>, Box<dyn Error + Send + Sync>> {
        let chat_config = LlmConfig {
            llm_type: args.chat_llm_type.parse()?,
            base_url: args.chat_base_url.clone(),
            api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
            completion_model: args.chat_model.clone(),
            max_tokens: Some(args.chat_max_tokens).filter(|t| *t > 0),
        };
        let chat_client = new_chat_client(&chat_config)?;
        info!(
            "Chat client configured: Type={}, Model={}, BaseURL={:?}",
            chat_config.llm_type,
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("adapter default")
        );
        Ok(chat_client)
    }

    pub async fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_client = Self::initialize_llm_client(args)?;
        let exchange_store = initialize_exchange_store(args).await?;
        Ok(Self::new(chat_client, exchange_store))
    }

    pub fn exchange_store(&self) -> Arc<dyn ExchangeStore> {
        Arc::clone(&self.exchange_store)
    }

    /// Splits a submitted transcript into the new prompt and the turns before it.
    pub fn split_submission(messages: &[ChatMessage]) -> Result<(&str, &[ChatMessage]), ChatError> {
        let (last, prior) = messages.split_last().ok_or(ChatError::EmptyConversation)?;
        if !last.is_user() {
            return Err(ChatError::NotUserTurn);
        }
        let prompt = last.content.trim();
        if prompt.is_empty() {
            return Err(ChatError::BlankMessage);
        }
        Ok((prompt, prior))
    }

    /// One generation attempt. Errors and empty completions become the fallback text.
    async fn generate(&self, prompt: &str, prior_turns: &[ChatMessage]) -> String {
        match self.chat_client.complete(prompt, prior_turns).await {
            Ok(resp) if !resp.response.trim().is_empty() => resp.response,
            Ok(_) => {
                warn!("Generation service returned an empty completion");
                FALLBACK_RESPONSE.to_string()
            }
            Err(e) => {
                error!("Generation service error: {}", e);
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    pub async fn process_messages(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let (prompt, prior_turns) = Self::split_submission(messages)?;
        let answer = self.generate(prompt, prior_turns).await;

        if let Err(e) = self.exchange_store.append(prompt, Some(&answer)).await {
            warn!("History write failed, answer delivered anyway: {}", e);
        }

        Ok(answer)
    }
}
