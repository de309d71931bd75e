pub mod agent;
pub mod cli;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod session;
pub mod transcript;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("adapter default"));
    info!("Chat Max Tokens: {}", args.chat_max_tokens);
    info!("Chat API Key Set: {}", !args.chat_api_key.trim().is_empty());
    info!("History Store Type: {}", args.history_type);
    info!("History Store Host: {}", args.history_host);
    info!("Rate Limit (req/s): {}", args.rate_limit);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = ChatAgent::from_args(&args).await?;
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await?;

    Ok(())
}
