//! Account commands.

use clap::{Args, Subcommand};

use super::{create_client, get_context, output_result, print_info};
use crate::Cli;

/// Account information.
#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand)]
enum UserSubcommand {
    /// Show the account owning the API key
    Info,
    /// Show subscription tier and character usage
    Subscription,
}

impl UserCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;

        match &self.command {
            UserSubcommand::Info => {
                let user = client.user().get().await?;
                output_result(&user, cli.output.as_deref(), cli.json)
            }
            UserSubcommand::Subscription => {
                let sub = client.user().subscription().await?;
                print_info(&format!(
                    "{} of {} characters remaining",
                    sub.remaining_characters(),
                    sub.character_limit
                ));
                output_result(&sub, cli.output.as_deref(), cli.json)
            }
        }
    }
}
