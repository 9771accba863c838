//! Smart Money Bot - Telegram front-end and webhook server
//!
//! Scans early buyers of Solana tokens, finds wallets common to several
//! tokens and relays wallet activity alerts.

mod config;
mod webhook;

use clap::Parser;
use config::{AppConfig, ConfigError};
use smartmoney_alerts::{
    start_alert_relay, relay::RELAY_CHANNEL_CAPACITY, CommandProcessor, TelegramBot, TelegramSink,
};
use smartmoney_core::OverlapStore;
use smartmoney_feeds::{BirdeyeClient, FeedError, HeliusClient, ProviderBuyerFetcher};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use webhook::WebhookState;

/// Smart Money Bot CLI
#[derive(Parser, Debug)]
#[command(name = "smart-money-bot")]
#[command(about = "Telegram bot for Solana early-buyer overlap analysis", long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Port for the Helius webhook server
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Maximum number of scanned tokens kept for overlap analysis
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Forget scans older than this many seconds
    #[arg(long)]
    token_ttl_secs: Option<u64>,
}

#[derive(Error, Debug)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build provider client: {0}")]
    Provider(#[from] FeedError),
    #[error("failed to start webhook server: {0}")]
    Server(#[from] std::io::Error),
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_logging(level: &str) {
    let builder = FmtSubscriber::builder()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    // RUST_LOG wins over --log-level when present.
    let result = match EnvFilter::try_from_default_env() {
        Ok(filter) => tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish()),
        Err(_) => tracing::subscriber::set_global_default(
            builder.with_max_level(parse_level(level)).finish(),
        ),
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn apply_args(config: &mut AppConfig, args: &Args) -> Result<(), ConfigError> {
    config.server.port = args.port;
    config.retention.max_tokens = args.max_tokens;
    config.retention.ttl_secs = args.token_ttl_secs;
    config.retention.validate()
}

fn build_processor(config: &AppConfig, store: Arc<OverlapStore>) -> Result<CommandProcessor, StartupError> {
    let mut birdeye = BirdeyeClient::new(config.birdeye_api_key.clone())?;
    if let Some(url) = &config.birdeye_base_url {
        birdeye = birdeye.with_base_url(url.clone());
    }

    let mut helius = HeliusClient::new(config.helius_api_key.clone())?;
    if let Some(url) = &config.helius_base_url {
        helius = helius.with_base_url(url.clone());
    }

    let fetcher = Arc::new(ProviderBuyerFetcher::new(birdeye, helius.clone()));
    Ok(CommandProcessor::new(store, fetcher, Arc::new(helius)))
}

async fn run(args: Args) -> Result<(), StartupError> {
    let mut config = AppConfig::from_env()?;
    apply_args(&mut config, &args)?;
    info!("  Webhook port: {}", config.server.port);
    info!("  Retention: {:?}", config.retention);

    let store = Arc::new(OverlapStore::with_policy(config.retention_policy()));
    let processor = Arc::new(build_processor(&config, store)?);
    let bot = Arc::new(TelegramBot::new(&config.telegram_token, processor));

    match config.alert_chat_id {
        Some(chat_id) => {
            let sink = Arc::new(TelegramSink::new(bot.bot().clone(), chat_id));
            let relay = start_alert_relay(sink, RELAY_CHANNEL_CAPACITY);
            let state = Arc::new(WebhookState::new(relay));
            webhook::start_webhook_server(state, config.server.port).await?;
            info!("📡 Wallet alerts relayed to chat {}", chat_id);
        }
        None => {
            warn!("TELEGRAM_CHAT_ID not set, webhook alert relay disabled");
        }
    }

    info!("Bot is running. Press Ctrl+C to stop...");
    bot.run().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    info!("🚀 Smart Money Bot starting...");

    if let Err(e) = run(args).await {
        error!("🚨 {}", e);
        std::process::exit(1);
    }

    info!("👋 Smart Money Bot stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> AppConfig {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TELEGRAM_TOKEN", "123:abc"),
            ("BIRDEYE_API_KEY", "b"),
            ("HELIUS_API_KEY", "h"),
        ]);
        AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "smart-money-bot",
            "--port",
            "8080",
            "--max-tokens",
            "25",
            "--token-ttl-secs",
            "600",
        ]);
        let mut config = config();
        apply_args(&mut config, &args).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.retention_policy().max_tokens, Some(25));
        assert_eq!(
            config.retention_policy().ttl,
            Some(std::time::Duration::from_secs(600))
        );
    }

    #[test]
    fn test_zero_ttl_arg_fails_startup() {
        let args = Args::parse_from(["smart-money-bot", "--token-ttl-secs", "0"]);
        let mut config = config();
        assert!(matches!(
            apply_args(&mut config, &args),
            Err(ConfigError::Invalid { name: "--token-ttl-secs", .. })
        ));
    }

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["smart-money-bot"]);
        assert_eq!(args.port, 5000);
        assert_eq!(args.log_level, "info");
        assert!(args.max_tokens.is_none());
    }

    #[tokio::test]
    async fn test_build_processor() {
        let store = Arc::new(OverlapStore::new());
        let processor = build_processor(&config(), store).unwrap();
        assert_eq!(processor.store().count(), 0);
    }
}
