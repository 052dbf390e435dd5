//! Voice management commands.

use clap::{Args, Subcommand};

use elevenlabs::{AddEditVoiceRequest, VoiceSettings};

use super::{
    create_client, format_bytes, get_context, load_request, output_bytes, output_result,
    print_success, print_verbose, require_input_file, require_output_file,
};
use crate::Cli;

/// Voice management service.
///
/// Supports listing, cloning from samples, editing and deleting voices.
#[derive(Args)]
pub struct VoiceCommand {
    #[command(subcommand)]
    command: VoiceSubcommand,
}

#[derive(Subcommand)]
enum VoiceSubcommand {
    /// List available voices
    List,
    /// Get a voice with its settings
    Get {
        /// Voice ID
        voice_id: String,
    },
    /// Add a voice from sample files (request from -f)
    Add,
    /// Edit a voice (request from -f)
    Edit {
        /// Voice ID
        voice_id: String,
    },
    /// Delete a voice
    Delete {
        /// Voice ID
        voice_id: String,
    },
    /// Show the settings of a voice
    Settings {
        /// Voice ID
        voice_id: String,
    },
    /// Replace the settings of a voice (settings from -f)
    #[command(name = "edit-settings")]
    EditSettings {
        /// Voice ID
        voice_id: String,
    },
    /// Show the default voice settings
    #[command(name = "default-settings")]
    DefaultSettings,
    /// Download the audio of a voice sample
    #[command(name = "sample-audio")]
    SampleAudio {
        /// Voice ID
        voice_id: String,
        /// Sample ID
        sample_id: String,
    },
}

impl VoiceCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            VoiceSubcommand::List => self.list(cli).await,
            VoiceSubcommand::Get { voice_id } => self.get(cli, voice_id).await,
            VoiceSubcommand::Add => self.add(cli).await,
            VoiceSubcommand::Edit { voice_id } => self.edit(cli, voice_id).await,
            VoiceSubcommand::Delete { voice_id } => self.delete(cli, voice_id).await,
            VoiceSubcommand::Settings { voice_id } => self.settings(cli, voice_id).await,
            VoiceSubcommand::EditSettings { voice_id } => self.edit_settings(cli, voice_id).await,
            VoiceSubcommand::DefaultSettings => self.default_settings(cli).await,
            VoiceSubcommand::SampleAudio {
                voice_id,
                sample_id,
            } => self.sample_audio(cli, voice_id, sample_id).await,
        }
    }

    async fn list(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        print_verbose(&format!("Using context: {}", ctx.name));

        let client = create_client(&ctx)?;
        let voices = client.voices().list().await?;

        print_success(&format!("Found {} voice(s)", voices.len()));
        output_result(&voices, cli.output.as_deref(), cli.json)
    }

    async fn get(&self, cli: &Cli, voice_id: &str) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        let voice = client.voices().get(voice_id).await?;

        output_result(&voice, cli.output.as_deref(), cli.json)
    }

    async fn add(&self, cli: &Cli) -> anyhow::Result<()> {
        let input_file = require_input_file(cli)?;
        let ctx = get_context(cli)?;

        let req: AddEditVoiceRequest = load_request(input_file)?;

        print_verbose(&format!("Using context: {}", ctx.name));
        print_verbose(&format!("Uploading {} sample(s)", req.files.len()));

        let client = create_client(&ctx)?;
        let voice_id = client.voices().add(&req).await?;

        print_success(&format!("Voice added: {}", voice_id));

        let result = serde_json::json!({
            "voice_id": voice_id,
            "name": req.name,
        });
        output_result(&result, cli.output.as_deref(), cli.json)
    }

    async fn edit(&self, cli: &Cli, voice_id: &str) -> anyhow::Result<()> {
        let input_file = require_input_file(cli)?;
        let ctx = get_context(cli)?;

        let req: AddEditVoiceRequest = load_request(input_file)?;

        let client = create_client(&ctx)?;
        client.voices().edit(voice_id, &req).await?;

        print_success(&format!("Voice {} updated", voice_id));
        Ok(())
    }

    async fn delete(&self, cli: &Cli, voice_id: &str) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        client.voices().delete(voice_id).await?;

        print_success(&format!("Voice {} deleted", voice_id));
        Ok(())
    }

    async fn settings(&self, cli: &Cli, voice_id: &str) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        let settings = client.voices().settings(voice_id).await?;

        output_result(&settings, cli.output.as_deref(), cli.json)
    }

    async fn edit_settings(&self, cli: &Cli, voice_id: &str) -> anyhow::Result<()> {
        let input_file = require_input_file(cli)?;
        let ctx = get_context(cli)?;

        let settings: VoiceSettings = load_request(input_file)?;

        let client = create_client(&ctx)?;
        client.voices().edit_settings(voice_id, &settings).await?;

        print_success(&format!("Settings of voice {} updated", voice_id));
        Ok(())
    }

    async fn default_settings(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(&ctx)?;
        let settings = client.voices().default_settings().await?;

        output_result(&settings, cli.output.as_deref(), cli.json)
    }

    async fn sample_audio(&self, cli: &Cli, voice_id: &str, sample_id: &str) -> anyhow::Result<()> {
        let output_path = require_output_file(cli)?;
        let ctx = get_context(cli)?;

        let client = create_client(&ctx)?;
        let audio = client.voices().sample_audio(voice_id, sample_id).await?;

        output_bytes(&audio, output_path)?;
        print_success(&format!(
            "Sample saved to: {} ({})",
            output_path,
            format_bytes(audio.len() as u64)
        ));
        Ok(())
    }
}
