use async_trait::async_trait;
use std::error::Error;
use tokio::sync::RwLock;

use crate::history::{ new_exchange, ExchangeStore };
use crate::models::chat::StoredExchange;

#[derive(Default)]
pub struct MemoryExchangeStore {
    exchanges: RwLock<Vec<StoredExchange>>,
}

impl MemoryExchangeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExchangeStore for MemoryExchangeStore {
    async fn append(
        &self,
        question: &str,
        answer: Option<&str>
    ) -> Result<StoredExchange, Box<dyn Error + Send + Sync>> {
        let exchange = new_exchange(question, answer);
        self.exchanges.write().await.push(exchange.clone());
        Ok(exchange)
    }

    async fn list_all(&self) -> Result<Vec<StoredExchange>, Box<dyn Error + Send + Sync>> {
        Ok(self.exchanges.read().await.clone())
    }
}
