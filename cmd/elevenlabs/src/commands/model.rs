//! Model commands.

use clap::{Args, Subcommand};

use super::{create_client, get_context, output_result, print_success};
use crate::Cli;

/// Available models.
#[derive(Args)]
pub struct ModelCommand {
    #[command(subcommand)]
    command: ModelSubcommand,
}

#[derive(Subcommand)]
enum ModelSubcommand {
    /// List available models
    List,
}

impl ModelCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ModelSubcommand::List => {
                let ctx = get_context(cli)?;
                let client = create_client(&ctx)?;
                let models = client.models().list().await?;

                print_success(&format!("Found {} model(s)", models.len()));
                output_result(&models, cli.output.as_deref(), cli.json)
            }
        }
    }
}
