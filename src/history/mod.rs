mod memory;
mod redis;
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::error::Error;
use crate::cli::Args;
use std::sync::Arc;
use uuid::Uuid;
use crate::models::chat::{ format_timestamp, StoredExchange };

pub use memory::MemoryExchangeStore;
pub use self::redis::RedisExchangeStore;

/// Append-only log of question/answer pairs backing the read-only history view.
#[async_trait]
pub trait ExchangeStore: Send + Sync {
    async fn append(
        &self,
        question: &str,
        answer: Option<&str>
    ) -> Result<StoredExchange, Box<dyn Error + Send + Sync>>;

    /// Every stored exchange in insertion order.
    async fn list_all(&self) -> Result<Vec<StoredExchange>, Box<dyn Error + Send + Sync>>;
}

pub(crate) fn new_exchange(question: &str, answer: Option<&str>) -> StoredExchange {
    StoredExchange {
        id: Uuid::new_v4().to_string(),
        question: question.to_string(),
        answer: answer.map(str::to_string),
        created_at: format_timestamp(Utc::now()),
    }
}

pub async fn create_exchange_store(
    args: &Args
) -> Result<Arc<dyn ExchangeStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "redis" => {
            let store = redis::RedisExchangeStore::new(
                &args.history_host,
                &args.history_redis_prefix
            )?;
            store.ping().await.map_err(|e|
                format!("Failed to connect to history store at {}: {}", args.history_host, e)
            )?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::MemoryExchangeStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub async fn initialize_exchange_store(
    args: &Args
) -> Result<Arc<dyn ExchangeStore>, Box<dyn Error + Send + Sync>> {
    info!("Chat exchanges will be stored in: {} at {}", args.history_type, args.history_host);
    let store = create_exchange_store(args).await?;
    info!("History store connected");
    Ok(store)
}
