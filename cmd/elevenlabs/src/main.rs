//! ElevenLabs CLI - A command line interface for the ElevenLabs API.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    ConfigCommand, HistoryCommand, ModelCommand, SttCommand, TtsCommand, UserCommand,
    VoiceCommand,
};

/// ElevenLabs CLI - A command line interface for the ElevenLabs API.
///
/// This tool allows you to interact with ElevenLabs services including:
///   - Text-to-speech (buffered and streamed)
///   - Speech-to-text transcription
///   - Voice management (list, clone, edit)
///   - Generation history
///   - Models and account information
///
/// Configuration is stored in ~/.giztoy/elevenlabs/ and supports multiple contexts,
/// similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "elevenlabs")]
#[command(about = "ElevenLabs API CLI tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.giztoy/elevenlabs/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Context name to use
    #[arg(short = 'c', long, global = true)]
    pub context: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Text-to-speech service
    Tts(TtsCommand),
    /// Speech-to-text service
    Stt(SttCommand),
    /// Voice management service
    Voice(VoiceCommand),
    /// Generation history
    History(HistoryCommand),
    /// Available models
    Model(ModelCommand),
    /// Account information
    User(UserCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Tts(cmd) => cmd.run(&cli).await,
        Commands::Stt(cmd) => cmd.run(&cli).await,
        Commands::Voice(cmd) => cmd.run(&cli).await,
        Commands::History(cmd) => cmd.run(&cli).await,
        Commands::Model(cmd) => cmd.run(&cli).await,
        Commands::User(cmd) => cmd.run(&cli).await,
    }
}
