pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod history;
pub mod llm;
pub mod models;
pub mod nexa;
pub mod stats;
pub mod storage;

use agent::AiClient;
use cli::Args;
use config::settings::{ AiSettings, GenerationOptions };
use llm::chat::new_client as new_chat_client;
use llm::{ LlmConfig, LlmType };
use log::{ info, warn };
use nexa::NexaAssistant;
use std::error::Error;
use std::sync::Arc;
use storage::{ initialize_store, KeyValueStore };
use tokio::io::{ AsyncBufReadExt, BufReader };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Assistant: {}", args.assistant);
    info!("Model: {}", args.model);
    info!("Base URL: {}", args.base_url);
    info!("Max History: {}", args.max_history);
    info!("Request Timeout: {}s", args.timeout_secs);
    info!("Store Type: {}", args.store_type);
    info!("Persist History: {}", args.persist_history);
    info!("-------------------------");

    let store = initialize_store(&args)?;
    let llm_type: LlmType = args.assistant.parse()?;
    match llm_type {
        LlmType::Gemini => run_gemini(&args, store).await,
        LlmType::Simulated => run_nexa(store).await,
    }
}

async fn run_gemini(
    args: &Args,
    store: Arc<dyn KeyValueStore>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let client = AiClient::new(AiSettings::from_args(args), store)?;
    client.load_history();

    if args.check_connection {
        let report = client.test_connection().await;
        if report.connected {
            info!("✅ Gemini API connected ({} ms)", report.elapsed_ms);
        } else {
            warn!("❌ Gemini API not connected: {:?}", report.details.error());
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                client.clear_history();
            }
            "/stats" => println!("{}", serde_json::to_string_pretty(&client.get_stats())?),
            "/history" => {
                for msg in client.history() {
                    println!("[{:?}] {}", msg.role, msg.content);
                }
            }
            prompt => {
                let result = client.send_message(prompt, &GenerationOptions::new()).await;
                println!("{}", result.message());
            }
        }
    }
    Ok(())
}

async fn run_nexa(store: Arc<dyn KeyValueStore>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let generator = new_chat_client(&LlmConfig {
        llm_type: LlmType::Simulated,
        ..LlmConfig::default()
    })?;
    let nexa = NexaAssistant::new(generator, store);
    for msg in nexa.messages() {
        println!("[{:?}] {}", msg.sender, msg.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = match line.trim() {
            "/quit" => break,
            "/ideas" => nexa::quick_action("ideas").to_string(),
            "/edit" => nexa::quick_action("edit").to_string(),
            "/analyze" => nexa::quick_action("analyze").to_string(),
            other => other.to_string(),
        };
        if let Some(reply) = nexa.send(&text).await {
            println!("{}", reply.content);
        }
    }
    Ok(())
}
