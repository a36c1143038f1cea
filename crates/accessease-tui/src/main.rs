use std::fs::OpenOptions;
use std::sync::Mutex;

use accessease_core::{Config, Provider};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "accessease")]
#[command(about = "Accessibility assistants for blind, deaf, and motor-impaired users", version)]
struct Cli {
    /// Use the offline canned responder
    #[arg(long, global = true, conflicts_with = "live")]
    mock: bool,

    /// Use the Gemini generative-text service (needs GEMINI_API_KEY)
    #[arg(long, global = true)]
    live: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the chat assistant a single question
    Ask {
        /// Your message
        message: String,
        /// Context sent along with the message
        #[arg(short, long, default_value = "")]
        context: String,
    },
    /// Show the information page for a help category
    Category {
        /// transportation, documents, emergency, or communication
        id: String,
    },
    /// Answer a voice command the way the voice assistant would
    Voice {
        /// Transcribed command
        command: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Pick up GEMINI_API_KEY from a local .env, if present
    dotenvy::dotenv().ok();

    match &cli.command {
        None => init_file_logging()?,
        Some(_) => init_stderr_logging(),
    }

    let mut config = Config::load().context("failed to load configuration")?;
    if cli.mock {
        config.provider = Provider::Mock;
    } else if cli.live {
        config.provider = Provider::Gemini;
    }

    match cli.command {
        None => run_tui(&config).await,
        Some(command) => run_command(&config, command).await,
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

/// The terminal belongs to the UI, so logs go to a file in the config dir.
fn init_file_logging() -> Result<()> {
    let dir = Config::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("accessease.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("accessease_tui=info,accessease_core=info")),
        )
        .init();
    Ok(())
}

async fn run_command(config: &Config, command: Commands) -> Result<()> {
    let reply = match command {
        Commands::Config => {
            print_config(config);
            return Ok(());
        }
        Commands::Ask { message, context } => config.build_gateway().reply(&message, &context).await,
        Commands::Category { id } => config.build_gateway().category_reply(&id).await,
        Commands::Voice { command } => config.build_gateway().voice_reply(&command).await,
    };
    println!("{}", reply);
    Ok(())
}

fn print_config(config: &Config) {
    println!("Provider:  {}", config.provider.display_name());
    println!("Model:     {}", config.gemini_model);
    println!("Endpoint:  {}", config.gemini_base_url);
    match (config.redacted_key(), config.key_source()) {
        (Some(key), Some(source)) => println!("API key:   {} (from {})", key, source),
        _ => println!("API key:   not set"),
    }
    if let Some(secs) = config.request_timeout_secs {
        println!("Timeout:   {}s", secs);
    }
    if let Some(seed) = config.mock_seed {
        println!("Mock seed: {}", seed);
    }
    if let Ok(dir) = Config::config_dir() {
        println!("Config:    {}", dir.join("config.json").display());
    }
}

async fn run_tui(config: &Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(config);
    info!(provider = config.provider.as_str(), "starting AccessEase");

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
