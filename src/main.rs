mod commands;
mod gateway;
mod pairing;
#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use meow_channels::whatsapp::WhatsAppTransport;
use meow_core::{
    config::{self, Config, ConfigSource},
    context::{build_dialogue_prompt, clean_completion, CompletionRequest},
    traits::Provider,
};
use meow_providers::openai::OpenAiCompletionProvider;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "meow",
    version,
    about = "meow: a WhatsApp auto-reply relay backed by a text-completion model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,

    /// Ask the phone for a full history sync when pairing.
    #[arg(long)]
    request_full_sync: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to WhatsApp and start replying.
    Start,
    /// Show the loaded configuration and provider availability.
    Status,
    /// Send a one-shot prompt to the completion provider.
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

/// Log to stdout and to `{data_dir}/logs/meow.log`. The returned guard
/// flushes the file writer when dropped.
fn init_logging(cfg: &Config, debug: bool) -> anyhow::Result<WorkerGuard> {
    let level = if debug { "debug" } else { cfg.meow.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let logs_dir = cfg.logs_dir();
    std::fs::create_dir_all(&logs_dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&logs_dir, "meow.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .try_init()?;
    Ok(guard)
}

fn build_provider(cfg: &Config) -> Arc<dyn Provider> {
    Arc::new(OpenAiCompletionProvider::from_config(
        cfg.provider.base_url.clone(),
        cfg.provider.api_key.clone(),
        cfg.provider.model.clone(),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut cfg, source) = config::load(&cli.config)?;
    if cli.request_full_sync {
        cfg.whatsapp.request_full_sync = true;
    }
    let log_guard = init_logging(&cfg, cli.debug)?;
    if source == ConfigSource::Defaults {
        info!("Config file not found at {}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Start => {
            if cfg.provider.api_key.is_empty() {
                error!(
                    "No API key configured. Set provider.api_key in {} or the {} env var.",
                    cli.config,
                    config::API_KEY_ENV
                );
            }
            let provider = build_provider(&cfg);

            let transport = Arc::new(WhatsAppTransport::new(
                cfg.whatsapp.clone(),
                cfg.session_db_path(),
            ));
            let (qr_rx, done_rx) = transport.pairing_channels().await;
            tokio::spawn(pairing::run_pairing(cfg.pairing.clone(), qr_rx, done_rx));

            info!("{} starting", cfg.meow.name);
            let gw = Arc::new(gateway::Gateway::new(
                transport,
                provider,
                cfg.replies.clone(),
                cfg.diagnostics.clone(),
                cfg.data_dir(),
            ));
            let cause = gw.run().await?;
            info!("stopped: {cause:?}");

            drop(log_guard);
            // A pending stdin read would otherwise block runtime shutdown.
            std::process::exit(0);
        }
        Commands::Status => {
            let provider = build_provider(&cfg);
            println!("meow status\n");
            println!("Config: {}", cli.config);
            println!("Data dir: {}", cfg.data_dir().display());
            println!("Session db: {}", cfg.session_db_path().display());
            println!(
                "Pairing: http://{}:{}{}",
                cfg.pairing.host, cfg.pairing.port, cfg.pairing.path
            );
            println!("Model: {} at {}", cfg.provider.model, cfg.provider.base_url);
            println!(
                "API key: {}",
                if cfg.provider.api_key.is_empty() {
                    "missing"
                } else {
                    "set"
                }
            );
            println!();
            println!(
                "  {}: {}",
                provider.name(),
                if provider.is_available().await {
                    "available"
                } else {
                    "unreachable"
                }
            );
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: meow ask <message>");
            }
            let provider = build_provider(&cfg);
            let request = CompletionRequest::new(build_dialogue_prompt("", &message.join(" ")));
            let choices = provider.complete(&request).await?;
            match choices.first().and_then(|c| clean_completion(c)) {
                Some(text) => println!("{text}"),
                None => anyhow::bail!("{} returned an empty completion", provider.name()),
            }
        }
    }

    Ok(())
}
