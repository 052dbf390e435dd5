//! Voice management service.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    http::{HttpClient, NO_QUERY},
    multipart::MultipartBody,
    stt::base_name,
    types::VoiceSettings,
};

/// Voice management service.
pub struct VoiceService {
    http: Arc<HttpClient>,
}

impl VoiceService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists all voices available to the account.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// for voice in client.voices().list().await? {
    ///     println!("{}: {} ({})", voice.voice_id, voice.name, voice.category);
    /// }
    /// ```
    pub async fn list(&self) -> Result<Vec<Voice>> {
        let resp: VoiceListResponse = self.http.get("/v1/voices", NO_QUERY).await?;
        Ok(resp.voices)
    }

    /// Gets a voice, including its settings.
    pub async fn get(&self, voice_id: &str) -> Result<Voice> {
        let path = format!("/v1/voices/{}", voice_id);
        self.http.get(&path, &[("with_settings", "true")][..]).await
    }

    /// Gets the default voice settings.
    pub async fn default_settings(&self) -> Result<VoiceSettings> {
        self.http.get("/v1/voices/settings/default", NO_QUERY).await
    }

    /// Gets the stored settings of a voice.
    pub async fn settings(&self, voice_id: &str) -> Result<VoiceSettings> {
        let path = format!("/v1/voices/{}/settings", voice_id);
        self.http.get(&path, NO_QUERY).await
    }

    /// Replaces the stored settings of a voice.
    pub async fn edit_settings(&self, voice_id: &str, settings: &VoiceSettings) -> Result<()> {
        let path = format!("/v1/voices/{}/settings/edit", voice_id);
        let _: StatusResponse = self.http.post_json(&path, settings).await?;
        Ok(())
    }

    /// Adds a voice from sample files and returns its identifier.
    ///
    /// All files are read before anything is sent; an unreadable file fails
    /// the call without a request.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let request = AddEditVoiceRequest {
    ///     name: "narrator".to_string(),
    ///     files: vec!["sample1.mp3".into(), "sample2.mp3".into()],
    ///     labels: [("accent".to_string(), "british".to_string())].into(),
    ///     ..Default::default()
    /// };
    ///
    /// let voice_id = client.voices().add(&request).await?;
    /// ```
    pub async fn add(&self, request: &AddEditVoiceRequest) -> Result<String> {
        let body = request.build_body().await?;
        let resp: AddVoiceResponse = self.http.post_multipart("/v1/voices/add", body).await?;
        Ok(resp.voice_id)
    }

    /// Edits the name, description, labels or samples of a voice.
    pub async fn edit(&self, voice_id: &str, request: &AddEditVoiceRequest) -> Result<()> {
        let body = request.build_body().await?;
        let path = format!("/v1/voices/{}/edit", voice_id);
        let _: StatusResponse = self.http.post_multipart(&path, body).await?;
        Ok(())
    }

    /// Deletes a voice.
    pub async fn delete(&self, voice_id: &str) -> Result<()> {
        let path = format!("/v1/voices/{}", voice_id);
        self.http.delete(&path).await
    }

    /// Downloads the audio of a voice sample.
    pub async fn sample_audio(&self, voice_id: &str, sample_id: &str) -> Result<Bytes> {
        let path = format!("/v1/voices/{}/samples/{}/audio", voice_id, sample_id);
        self.http.get_bytes(&path, NO_QUERY).await
    }

    /// Deletes a voice sample.
    pub async fn delete_sample(&self, voice_id: &str, sample_id: &str) -> Result<()> {
        let path = format!("/v1/voices/{}/samples/{}", voice_id, sample_id);
        self.http.delete(&path).await
    }
}

// ==================== Request Types ====================

/// Request for adding or editing a voice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddEditVoiceRequest {
    /// Voice name.
    pub name: String,

    /// Local sample files, uploaded under their base names.
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Voice description. Omitted when empty.
    #[serde(default)]
    pub description: String,

    /// Free-form labels. Omitted when empty.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl AddEditVoiceRequest {
    /// Builds the multipart body, reading every sample file.
    pub async fn build_body(&self) -> Result<MultipartBody> {
        if self.name.is_empty() {
            return Err(Error::Validation("name must be non-empty".to_string()));
        }

        let mut body = MultipartBody::new();
        body.text("name", self.name.as_str());

        if !self.description.is_empty() {
            body.text("description", self.description.as_str());
        }
        if !self.labels.is_empty() {
            body.json("labels", &self.labels)?;
        }

        for path in &self.files {
            let file_name = base_name(path)?;
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| Error::Encode(format!("{}: {}", path.display(), e)))?;
            body.file("files", file_name, data);
        }

        Ok(body)
    }
}

// ==================== Response Types ====================

#[derive(Deserialize)]
struct VoiceListResponse {
    voices: Vec<Voice>,
}

#[derive(Deserialize)]
struct AddVoiceResponse {
    voice_id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    #[allow(dead_code)]
    #[serde(default)]
    status: String,
}

/// A voice and its metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,

    #[serde(default)]
    pub name: String,

    /// `premade`, `cloned`, `generated` or `professional`.
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub preview_url: Option<String>,

    #[serde(default)]
    pub available_for_tiers: Vec<String>,

    #[serde(default)]
    pub high_quality_base_model_ids: Vec<String>,

    #[serde(default)]
    pub samples: Option<Vec<VoiceSample>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<VoiceSettings>,

    #[serde(default)]
    pub fine_tuning: Option<FineTuning>,

    #[serde(default)]
    pub sharing: Option<VoiceSharing>,
}

/// An uploaded sample of a voice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSample {
    pub sample_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub hash: String,
}

/// Fine-tuning state of a voice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FineTuning {
    pub is_allowed_to_fine_tune: bool,
    pub fine_tuning_requested: bool,
    /// Per-model state; older responses report a single string.
    #[serde(rename = "finetuning_state")]
    pub fine_tuning_state: serde_json::Value,
    pub language: Option<String>,
    pub slice_ids: Option<Vec<String>>,
    pub manual_verification_requested: bool,
    pub manual_verification: Option<ManualVerification>,
    pub verification_attempts: Option<Vec<VerificationAttempt>>,
    pub verification_attempts_count: i64,
    pub verification_failures: Vec<String>,
}

/// Manual verification submitted for a voice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualVerification {
    pub extra_text: String,
    pub request_time_unix: i64,
    pub files: Vec<VerificationFile>,
}

/// A file attached to a manual verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationFile {
    pub file_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub upload_date_unix: i64,
}

/// A voice verification attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationAttempt {
    pub text: String,
    pub date_unix: i64,
    pub accepted: bool,
    pub similarity: f64,
    pub levenshtein_distance: f64,
    pub recording: Option<Recording>,
}

/// Recording captured during verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recording {
    pub recording_id: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub upload_date_unix: i64,
    pub transcription: String,
}

/// Voice library sharing information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSharing {
    pub status: String,
    pub history_item_sample_id: Option<String>,
    pub original_voice_id: Option<String>,
    pub public_owner_id: Option<String>,
    pub liked_by_count: i64,
    pub cloned_by_count: i64,
    pub whitelisted_emails: Vec<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub labels: HashMap<String, String>,
    pub review_status: Option<String>,
    pub review_message: Option<String>,
    pub enabled_in_library: bool,
    pub financial_rewards_enabled: bool,
    pub free_users_allowed: bool,
    pub live_moderation_enabled: bool,
    pub notice_period: i64,
    pub disable_at_unix: Option<i64>,
    pub voice_mixing_allowed: bool,
    pub rate: Option<f64>,
    pub date_unix: i64,
}
