//! Speech-to-text commands.

use clap::{Args, Subcommand};

use elevenlabs::{
    AudioSource, SpeechToTextOptions, SpeechToTextRequest, TranscriptionResult, MODEL_SCRIBE_V1,
};

use super::{
    create_client, get_context, load_request, output_result, print_info, print_success,
    print_verbose,
};
use crate::Cli;

/// Speech-to-text service.
///
/// Transcription options (diarize, language_code, webhook, use_multi_channel, ...)
/// are read from -f.
#[derive(Args)]
pub struct SttCommand {
    #[command(subcommand)]
    command: SttSubcommand,
}

#[derive(Subcommand)]
enum SttSubcommand {
    /// Transcribe a local audio file or a cloud storage URL
    Transcribe {
        /// Path to a local audio file
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        audio: Option<String>,
        /// HTTPS URL of audio in cloud storage
        #[arg(long)]
        url: Option<String>,
        /// Model ID
        #[arg(long, default_value = MODEL_SCRIBE_V1)]
        model: String,
    },
}

impl SttCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            SttSubcommand::Transcribe { audio, url, model } => {
                self.transcribe(cli, audio.as_deref(), url.as_deref(), model)
                    .await
            }
        }
    }

    async fn transcribe(
        &self,
        cli: &Cli,
        audio: Option<&str>,
        url: Option<&str>,
        model: &str,
    ) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;

        let options: SpeechToTextOptions = match &cli.input {
            Some(path) => load_request(path)?,
            None => SpeechToTextOptions::default(),
        };

        let source = match (audio, url) {
            (Some(path), _) => AudioSource::from_path(path).await?,
            (None, Some(url)) => AudioSource::url(url),
            (None, None) => anyhow::bail!("audio source is required, use --audio or --url"),
        };

        let mut req = SpeechToTextRequest::new(model, source);
        req.options = options;

        print_verbose(&format!("Using context: {}", ctx.name));
        print_verbose(&format!("Model: {}", model));

        let client = create_client(&ctx)?;
        let result = client.transcription().transcribe(&req).await?;

        match &result {
            TranscriptionResult::SingleChannel(t) => print_success(&format!(
                "Transcribed {} word(s), language: {}",
                t.words.len(),
                t.language_code
            )),
            TranscriptionResult::MultiChannel(m) => print_success(&format!(
                "Transcribed {} channel(s)",
                m.transcripts.len()
            )),
            TranscriptionResult::Webhook(ack) => print_info(&format!(
                "Request {} accepted, result will be delivered by webhook",
                ack.request_id
            )),
        }

        output_result(&result, cli.output.as_deref(), cli.json)
    }
}
