//! Text-to-speech commands.

use clap::{Args, Subcommand};

use elevenlabs::{OutputFormat, SpeechOptions, TextToSpeechRequest, VOICE_RACHEL};

use super::cli_config::Context;
use super::{
    create_client, format_bytes, get_context, load_request, output_bytes, output_result,
    print_success, print_verbose, require_output_file,
};
use crate::Cli;

/// Text-to-speech service.
///
/// The request is read from -f (YAML or JSON with `text`, `model_id`,
/// `voice_settings`, ...) or built from --text.
#[derive(Args)]
pub struct TtsCommand {
    #[command(subcommand)]
    command: TtsSubcommand,
}

#[derive(Subcommand)]
enum TtsSubcommand {
    /// Synthesize speech and save the complete audio
    Synthesize(TtsArgs),
    /// Stream synthesized audio into the output file
    Stream(TtsArgs),
}

#[derive(Args)]
struct TtsArgs {
    /// Voice ID (default: context default voice, then Rachel)
    #[arg(long)]
    voice: Option<String>,
    /// Text to synthesize when no request file is given
    #[arg(long)]
    text: Option<String>,
    /// Model ID (default: context default model)
    #[arg(long)]
    model: Option<String>,
    /// Output format, e.g. mp3_44100_128 or pcm_16000
    #[arg(long)]
    format: Option<String>,
    /// Streaming latency optimization level (0-4)
    #[arg(long)]
    latency: Option<u8>,
}

impl TtsArgs {
    fn voice_id(&self, ctx: &Context) -> String {
        match &self.voice {
            Some(voice) => voice.clone(),
            None if !ctx.default_voice.is_empty() => ctx.default_voice.clone(),
            None => VOICE_RACHEL.to_string(),
        }
    }

    fn request(&self, cli: &Cli, ctx: &Context) -> anyhow::Result<TextToSpeechRequest> {
        let mut req: TextToSpeechRequest = match (&cli.input, &self.text) {
            (Some(path), _) => load_request(path)?,
            (None, Some(text)) => TextToSpeechRequest::new(text.clone()),
            (None, None) => anyhow::bail!("text is required, use --text or -f"),
        };

        if let Some(model) = &self.model {
            req.model_id = Some(model.clone());
        } else if req.model_id.is_none() && !ctx.default_model.is_empty() {
            req.model_id = Some(ctx.default_model.clone());
        }

        Ok(req)
    }

    fn options(&self) -> anyhow::Result<SpeechOptions> {
        let output_format = self
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()?;

        Ok(SpeechOptions {
            output_format,
            optimize_streaming_latency: self.latency,
            ..Default::default()
        })
    }
}

impl TtsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            TtsSubcommand::Synthesize(args) => self.synthesize(cli, args).await,
            TtsSubcommand::Stream(args) => self.stream(cli, args).await,
        }
    }

    async fn synthesize(&self, cli: &Cli, args: &TtsArgs) -> anyhow::Result<()> {
        let output_path = require_output_file(cli)?;
        let ctx = get_context(cli)?;

        let voice_id = args.voice_id(&ctx);
        let req = args.request(cli, &ctx)?;
        let options = args.options()?;

        print_verbose(&format!("Using context: {}", ctx.name));
        print_verbose(&format!("Voice: {}", voice_id));
        print_verbose(&format!("Text length: {} characters", req.text.chars().count()));

        let client = create_client(&ctx)?;
        let audio = client.speech().synthesize(&voice_id, &req, &options).await?;

        output_bytes(&audio, output_path)?;
        print_success(&format!(
            "Audio saved to: {} ({})",
            output_path,
            format_bytes(audio.len() as u64)
        ));

        let result = serde_json::json!({
            "voice_id": voice_id,
            "model_id": req.model_id,
            "output_format": options.output_format.unwrap_or_default().as_str(),
            "audio_size": audio.len(),
            "output_file": output_path,
        });

        output_result(&result, None, cli.json)
    }

    async fn stream(&self, cli: &Cli, args: &TtsArgs) -> anyhow::Result<()> {
        let output_path = require_output_file(cli)?;
        let ctx = get_context(cli)?;

        let voice_id = args.voice_id(&ctx);
        let req = args.request(cli, &ctx)?;
        let options = args.options()?;

        print_verbose(&format!("Using context: {}", ctx.name));
        print_verbose(&format!("Streaming to: {}", output_path));

        let client = create_client(&ctx)?;
        let mut file = tokio::fs::File::create(output_path).await?;
        let written = client
            .speech()
            .synthesize_to(&voice_id, &req, &options, &mut file)
            .await?;

        print_success(&format!(
            "Audio saved to: {} ({})",
            output_path,
            format_bytes(written)
        ));

        let result = serde_json::json!({
            "voice_id": voice_id,
            "model_id": req.model_id,
            "audio_size": written,
            "output_file": output_path,
        });

        output_result(&result, None, cli.json)
    }
}
