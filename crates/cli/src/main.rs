//! Podium CLI
//!
//! Command-line front-end for the debate presenter's retrieval agent:
//! one-shot questions, an interactive chat, corpus inspection and persona
//! listing.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, CorpusCommand, PersonasCommand};
use podium_core::config::{AppConfig, CliOverrides};
use podium_core::logging::{self, LogFormat};
use std::path::PathBuf;

/// Podium - grounded answers for a debate presenter
#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(about = "Retrieval-augmented answers over a debate corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "PODIUM_CONFIG")]
    config: Option<PathBuf>,

    /// Corpus directory
    #[arg(long, global = true, env = "PODIUM_CORPUS")]
    corpus: Option<PathBuf>,

    /// System instruction for the agent
    #[arg(short, long, global = true, env = "PODIUM_SYSTEM_PROMPT")]
    system_prompt: Option<String>,

    /// Persona file whose contents replace the system instruction
    #[arg(short, long, global = true)]
    persona: Option<PathBuf>,

    /// Chat model identifier
    #[arg(short, long, global = true, env = "PODIUM_MODEL")]
    model: Option<String>,

    /// Number of chunks retrieved per question
    #[arg(short = 'k', long, global = true)]
    top_k: Option<usize>,

    /// Use deterministic offline embeddings instead of the embeddings API
    #[arg(long, global = true)]
    offline: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Interactive conversation on stdin
    Chat(ChatCommand),

    /// Load and chunk the corpus, printing per-document statistics
    Corpus(CorpusCommand),

    /// List persona files in a directory
    Personas(PersonasCommand),
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            corpus: self.corpus.clone(),
            system_prompt: self.system_prompt.clone(),
            persona: self.persona.clone(),
            model: self.model.clone(),
            top_k: self.top_k,
            offline: self.offline,
            log_level: self.log_level.clone(),
            verbose: self.verbose,
            no_color: self.no_color,
            log_json: self.log_json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.clone())
        .context("Failed to load configuration")?
        .with_overrides(cli.overrides());

    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init_logging(config.log_level.as_deref(), config.no_color, format)
        .context("Failed to initialize logging")?;

    config.validate().context("Invalid configuration")?;

    tracing::info!("Podium CLI starting");
    tracing::debug!("Corpus: {:?}", config.corpus_path);
    tracing::debug!("Provider: {} ({})", config.provider, config.model);
    tracing::debug!(
        "Embeddings: {} ({})",
        config.embedding.provider,
        config.embedding.model
    );

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Corpus(_) => "corpus",
        Commands::Personas(_) => "personas",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Corpus(cmd) => cmd.execute(&config),
        Commands::Personas(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.with_context(|| format!("{} failed", command_name))
}
