use async_trait::async_trait;
use crate::models::chat::StoredExchange;
use crate::history::{ new_exchange, ExchangeStore };
use std::error::Error;
use log::error;
use redis::{ Client, AsyncCommands };

const EXCHANGES_KEY: &str = "exchanges";

pub struct RedisExchangeStore {
    client: Client,
    key: String,
}

impl RedisExchangeStore {
    pub fn new(url: &str, key_prefix: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            client: Client::open(url)?,
            key: format!("{}{}", key_prefix, EXCHANGES_KEY),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    pub async fn ping(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

fn parse_entries(json_entries: &[String]) -> Vec<StoredExchange> {
    let mut exchanges = Vec::with_capacity(json_entries.len());
    for json_entry in json_entries {
        match serde_json::from_str::<StoredExchange>(json_entry) {
            Ok(exchange) => exchanges.push(exchange),
            Err(e) => {
                error!("Error parsing stored exchange: {}", e);
            }
        }
    }
    exchanges
}

#[async_trait]
impl ExchangeStore for RedisExchangeStore {
    async fn append(
        &self,
        question: &str,
        answer: Option<&str>
    ) -> Result<StoredExchange, Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let exchange = new_exchange(question, answer);
        let json_entry = serde_json::to_string(&exchange)?;
        let _: i64 = conn.rpush(&self.key, &json_entry).await?;
        Ok(exchange)
    }

    async fn list_all(&self) -> Result<Vec<StoredExchange>, Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let json_entries: Vec<String> = conn.lrange(&self.key, 0, -1).await?;
        Ok(parse_entries(&json_entries))
    }
}
