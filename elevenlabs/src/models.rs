//! Model listing and predefined model identifiers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    error::Result,
    http::{HttpClient, NO_QUERY},
};

// ==================== Speech Models ====================

/// eleven_monolingual_v1, the original English model.
pub const MODEL_MONOLINGUAL_V1: &str = "eleven_monolingual_v1";

/// eleven_multilingual_v1, first multilingual model.
pub const MODEL_MULTILINGUAL_V1: &str = "eleven_multilingual_v1";

/// eleven_multilingual_v2, lifelike speech in 29 languages.
pub const MODEL_MULTILINGUAL_V2: &str = "eleven_multilingual_v2";

/// eleven_turbo_v2_5, low latency multilingual model.
pub const MODEL_TURBO_V2_5: &str = "eleven_turbo_v2_5";

/// eleven_flash_v2_5, lowest latency multilingual model.
pub const MODEL_FLASH_V2_5: &str = "eleven_flash_v2_5";

// ==================== Transcription Models ====================

/// scribe_v1, speech-to-text model.
pub const MODEL_SCRIBE_V1: &str = "scribe_v1";

// ==================== Voice IDs ====================

/// Adam, a deep American male voice.
pub const VOICE_ADAM: &str = "pNInz6obpgDQGcFmaJgB";

/// Rachel, a calm American female voice.
pub const VOICE_RACHEL: &str = "21m00Tcm4TlvDq8ikWAM";

/// Model listing service.
pub struct ModelService {
    http: Arc<HttpClient>,
}

impl ModelService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists the models available to the account.
    pub async fn list(&self) -> Result<Vec<Model>> {
        self.http.get("/v1/models", NO_QUERY).await
    }
}

/// A language supported by a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub language_id: String,
    pub name: String,
}

/// A synthesis or transcription model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    pub model_id: String,
    pub name: String,
    pub description: String,
    pub can_be_finetuned: bool,
    pub can_do_text_to_speech: bool,
    pub can_do_voice_conversion: bool,
    pub can_use_speaker_boost: bool,
    pub can_use_style: bool,
    pub requires_alpha_access: bool,
    pub serves_pro_voices: bool,
    pub token_cost_factor: f32,
    pub max_characters_request_free_user: i64,
    pub max_characters_request_subscribed_user: i64,
    pub languages: Vec<Language>,
}
