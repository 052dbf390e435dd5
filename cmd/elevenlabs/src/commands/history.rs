//! Generation history commands.

use clap::{Args, Subcommand};
use futures::TryStreamExt;

use elevenlabs::{DownloadHistoryRequest, HistoryItem, HistoryQuery};

use super::{
    create_client, format_bytes, get_context, output_bytes, output_result, print_info,
    print_success, print_verbose, require_output_file,
};
use crate::Cli;

/// Generation history.
#[derive(Args)]
pub struct HistoryCommand {
    #[command(subcommand)]
    command: HistorySubcommand,
}

#[derive(Subcommand)]
enum HistorySubcommand {
    /// List history items
    List {
        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,
        /// Start after this history item
        #[arg(long)]
        after: Option<String>,
        /// Only items generated with this voice
        #[arg(long)]
        voice: Option<String>,
        /// Follow continuations until the last page
        #[arg(long)]
        all: bool,
    },
    /// Get a history item
    Get {
        /// History item ID
        history_item_id: String,
    },
    /// Download the audio of a history item
    Audio {
        /// History item ID
        history_item_id: String,
    },
    /// Delete a history item
    Delete {
        /// History item ID
        history_item_id: String,
    },
    /// Download several history items (zip archive for more than one)
    Download {
        /// History item IDs
        #[arg(required = true)]
        history_item_ids: Vec<String>,
    },
}

impl HistoryCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            HistorySubcommand::List {
                page_size,
                after,
                voice,
                all,
            } => {
                let mut query = HistoryQuery::new();
                query.page_size = *page_size;
                query.start_after = after.clone();
                query.voice_id = voice.clone();
                self.list(cli, query, *all).await
            }
            HistorySubcommand::Get { history_item_id } => self.get(cli, history_item_id).await,
            HistorySubcommand::Audio { history_item_id } => self.audio(cli, history_item_id).await,
            HistorySubcommand::Delete { history_item_id } => {
                self.delete(cli, history_item_id).await
            }
            HistorySubcommand::Download { history_item_ids } => {
                self.download(cli, history_item_ids).await
            }
        }
    }

    async fn list(&self, cli: &Cli, query: HistoryQuery, all: bool) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        print_verbose(&format!("Using context: {}", ctx.name));

        let client = create_client(&ctx)?;

        if all {
            let mut items: Vec<HistoryItem> = Vec::new();
            let mut pages = client.history().pages(query);
            let mut count = 0;
            while let Some(page) = pages.try_next().await? {
                count += 1;
                print_verbose(&format!("Page {}: {} item(s)", count, page.history.len()));
                items.extend(page.history);
            }

            print_success(&format!("Fetched {} item(s) in {} page(s)", items.len(), count));
            return output_result(&items, cli.output.as_deref(), cli.json);
        }

        let (page, next) = client.history().list(&query).await?;
        print_success(&format!("Fetched {} item(s)", page.history.len()));
        if let Some(cursor) = next {
            print_info(&format!(
                "More items available, continue with --after {}",
                cursor.start_after()
            ));
        }

        output_result(&page, cli.output.as_deref(), cli.json)
    }

    async fn get(&self, cli: &Cli, history_item_id: &str) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        let item = client.history().get(history_item_id).await?;

        output_result(&item, cli.output.as_deref(), cli.json)
    }

    async fn audio(&self, cli: &Cli, history_item_id: &str) -> anyhow::Result<()> {
        let output_path = require_output_file(cli)?;
        let ctx = get_context(cli)?;

        let client = create_client(&ctx)?;
        let audio = client.history().audio(history_item_id).await?;

        output_bytes(&audio, output_path)?;
        print_success(&format!(
            "Audio saved to: {} ({})",
            output_path,
            format_bytes(audio.len() as u64)
        ));
        Ok(())
    }

    async fn delete(&self, cli: &Cli, history_item_id: &str) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        client.history().delete(history_item_id).await?;

        print_success(&format!("History item {} deleted", history_item_id));
        Ok(())
    }

    async fn download(&self, cli: &Cli, history_item_ids: &[String]) -> anyhow::Result<()> {
        let output_path = require_output_file(cli)?;
        let ctx = get_context(cli)?;

        let req = DownloadHistoryRequest {
            history_item_ids: history_item_ids.to_vec(),
        };

        let client = create_client(&ctx)?;
        let data = client.history().download(&req).await?;

        output_bytes(&data, output_path)?;
        print_success(&format!(
            "Downloaded {} item(s) to: {} ({})",
            history_item_ids.len(),
            output_path,
            format_bytes(data.len() as u64)
        ));
        Ok(())
    }
}
