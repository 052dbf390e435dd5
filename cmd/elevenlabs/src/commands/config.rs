//! Configuration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use super::cli_config::{mask_api_key, Config, Context as CliContext};
use super::{get_config, output_result, print_success};
use crate::Cli;

/// Manage API contexts.
///
/// Each context holds an API key plus optional base URL, timeout, default
/// voice and default model. Stored in ~/.giztoy/elevenlabs/config.yaml.
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add or replace a context
    #[command(name = "add-context")]
    AddContext(AddContextArgs),
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Print the current context name
    #[command(name = "get-context")]
    GetContext,
    /// List contexts as a table (or JSON with --json)
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// Show the config file with masked keys
    View,
}

#[derive(Args)]
struct AddContextArgs {
    /// Context name
    name: String,
    /// ElevenLabs API key (xi-api-key)
    #[arg(long)]
    api_key: String,
    /// API base URL (default: https://api.elevenlabs.io)
    #[arg(long)]
    base_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// Default model for text-to-speech
    #[arg(long)]
    default_model: Option<String>,
    /// Default voice for text-to-speech
    #[arg(long)]
    default_voice: Option<String>,
}

impl AddContextArgs {
    fn to_context(&self) -> CliContext {
        CliContext {
            name: self.name.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone().unwrap_or_default(),
            timeout: self.timeout.unwrap_or_default(),
            default_voice: self.default_voice.clone().unwrap_or_default(),
            default_model: self.default_model.clone().unwrap_or_default(),
        }
    }
}

/// Display form of a context. The API key is always masked.
#[derive(Debug, Serialize)]
struct ContextSummary {
    name: String,
    current: bool,
    api_key: String,
    base_url: String,
    timeout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    default_voice: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    default_model: String,
}

impl ContextSummary {
    fn new(name: &str, ctx: &CliContext, current: bool) -> Self {
        Self {
            name: name.to_string(),
            current,
            api_key: mask_api_key(&ctx.api_key),
            base_url: or_default(&ctx.base_url),
            timeout: match ctx.timeout() {
                Some(t) => format!("{}s", t.as_secs()),
                None => "(default)".to_string(),
            },
            default_voice: ctx.default_voice.clone(),
            default_model: ctx.default_model.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ConfigView {
    config_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_context: Option<String>,
    contexts: Vec<ContextSummary>,
}

fn or_default(value: &str) -> String {
    if value.is_empty() {
        "(default)".to_string()
    } else {
        value.to_string()
    }
}

fn summaries(cfg: &Config) -> Vec<ContextSummary> {
    cfg.contexts
        .iter()
        .map(|(name, ctx)| ContextSummary::new(name, ctx, *name == cfg.current_context))
        .collect()
}

fn view(cfg: &Config) -> ConfigView {
    ConfigView {
        config_file: cfg.path().display().to_string(),
        current_context: cfg.current().map(|c| c.name.clone()),
        contexts: summaries(cfg),
    }
}

fn context_table(contexts: &[ContextSummary]) -> String {
    let mut out = format!(
        "{:<2} {:<16} {:<20} {:<10} {}\n",
        "", "NAME", "API_KEY", "TIMEOUT", "DEFAULT_VOICE"
    );
    for c in contexts {
        out.push_str(&format!(
            "{:<2} {:<16} {:<20} {:<10} {}\n",
            if c.current { "*" } else { "" },
            c.name,
            c.api_key,
            c.timeout,
            c.default_voice
        ));
    }
    out
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut cfg = get_config(cli)?;

        match &self.command {
            ConfigSubcommand::AddContext(args) => {
                cfg.add_context(&args.name, args.to_context())?;
                print_success(&format!("Context \"{}\" saved", args.name));
            }
            ConfigSubcommand::DeleteContext { name } => {
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
            }
            ConfigSubcommand::UseContext { name } => {
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
            }
            ConfigSubcommand::GetContext => match cfg.current() {
                Some(ctx) => println!("{}", ctx.name),
                None => anyhow::bail!("no current context, set one with 'config use-context'"),
            },
            ConfigSubcommand::ListContexts => {
                let contexts = summaries(&cfg);
                if cli.json {
                    return output_result(&contexts, cli.output.as_deref(), true);
                }
                if contexts.is_empty() {
                    println!("No contexts configured");
                } else {
                    print!("{}", context_table(&contexts));
                }
            }
            ConfigSubcommand::View => {
                return output_result(&view(&cfg), cli.output.as_deref(), cli.json);
            }
        }

        Ok(())
    }
}
