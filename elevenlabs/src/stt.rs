//! Speech-to-text service.
//!
//! The transcription endpoint answers with one of three shapes depending on
//! the request: a single transcript, one transcript per audio channel, or an
//! acknowledgement when the result is delivered by webhook. The shape is
//! resolved here, before the result reaches the caller.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use super::{
    error::{Error, Result},
    http::HttpClient,
    multipart::MultipartBody,
};

/// Speech-to-text service.
pub struct TranscriptionService {
    http: Arc<HttpClient>,
}

impl TranscriptionService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Transcribes audio from an inline file or a cloud-storage URL.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let source = AudioSource::from_path("audio.mp3").await?;
    /// let mut request = SpeechToTextRequest::new(MODEL_SCRIBE_V1, source);
    /// request.options.diarize = Some(true);
    ///
    /// match client.transcription().transcribe(&request).await? {
    ///     TranscriptionResult::SingleChannel(t) => println!("{}", t.text),
    ///     TranscriptionResult::MultiChannel(m) => println!("{} channels", m.transcripts.len()),
    ///     TranscriptionResult::Webhook(ack) => println!("queued: {}", ack.request_id),
    /// }
    /// ```
    pub async fn transcribe(&self, request: &SpeechToTextRequest) -> Result<TranscriptionResult> {
        let body = request.build_body()?;
        let payload = self
            .http
            .post_multipart_bytes("/v1/speech-to-text", body)
            .await?;
        TranscriptionResult::resolve(request, &payload)
    }
}

// ==================== Request Types ====================

/// Where the audio to transcribe comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Inline audio content uploaded with the request.
    File { data: Bytes, file_name: String },
    /// HTTPS URL of audio held in cloud storage.
    CloudStorageUrl(String),
}

impl AudioSource {
    /// Creates an inline source from in-memory content.
    pub fn file(data: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        AudioSource::File {
            data: data.into(),
            file_name: file_name.into(),
        }
    }

    /// Creates a cloud-storage source.
    pub fn url(url: impl Into<String>) -> Self {
        AudioSource::CloudStorageUrl(url.into())
    }

    /// Reads a local file into an inline source named after its base name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = base_name(path)?;
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Encode(format!("{}: {}", path.display(), e)))?;
        Ok(Self::file(data, file_name))
    }

    /// Drains a reader into an inline source.
    pub async fn from_reader<R>(mut reader: R, file_name: impl Into<String>) -> Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| Error::Encode(format!("read audio: {}", e)))?;
        Ok(Self::file(data, file_name))
    }
}

/// Returns the final path component as UTF-8.
pub(crate) fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::Validation(format!("{}: no file name", path.display())))
}

/// Request for speech-to-text conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechToTextRequest {
    /// Transcription model identifier.
    pub model_id: String,

    /// Audio to transcribe.
    pub source: AudioSource,

    /// Optional parameters, each forwarded only when set.
    pub options: SpeechToTextOptions,
}

/// Optional transcription parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechToTextOptions {
    /// ISO-639 language hint. Detected automatically when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    /// Tag non-speech events such as laughter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_audio_events: Option<bool>,

    /// Maximum number of speakers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_speakers: Option<u32>,

    /// Timestamp granularity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps_granularity: Option<TimestampsGranularity>,

    /// Attribute words to speakers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diarize: Option<bool>,

    /// Speaker separation threshold, only meaningful with `diarize`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diarization_threshold: Option<f64>,

    /// Extra export formats.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_formats: Vec<AdditionalFormat>,

    /// Input encoding hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_format: Option<FileFormat>,

    /// Deliver the result to the configured webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<bool>,

    /// Restrict delivery to one webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,

    /// Caller data echoed back with the webhook delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_metadata: Option<serde_json::Value>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Seed for deterministic sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Transcribe each audio channel separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_multi_channel: Option<bool>,
}

/// Granularity of timestamps in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampsGranularity {
    None,
    Word,
    Character,
}

impl TimestampsGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampsGranularity::None => "none",
            TimestampsGranularity::Word => "word",
            TimestampsGranularity::Character => "character",
        }
    }
}

impl std::fmt::Display for TimestampsGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding of the uploaded audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// Raw 16-bit little-endian PCM, 16 kHz mono.
    #[serde(rename = "pcm_s16le_16")]
    PcmS16le16,
    /// Any container the service can detect.
    #[serde(rename = "other")]
    Other,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FileFormat::PcmS16le16 => "pcm_s16le_16",
            FileFormat::Other => "other",
        })
    }
}

/// An additional export format for the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalFormat {
    /// Export format, e.g. `srt`, `txt`, `docx`.
    #[serde(rename = "type")]
    pub format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps_granularity: Option<TimestampsGranularity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diarize: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speakers: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punctuate_only: Option<bool>,
}

impl SpeechToTextRequest {
    /// Creates a request with no optional parameters set.
    pub fn new(model_id: impl Into<String>, source: AudioSource) -> Self {
        Self {
            model_id: model_id.into(),
            source,
            options: SpeechToTextOptions::default(),
        }
    }

    /// Returns true if the result will be delivered by webhook.
    pub fn is_webhook(&self) -> bool {
        self.options.webhook == Some(true)
    }

    /// Returns true if one transcript per channel was requested.
    pub fn is_multi_channel(&self) -> bool {
        self.options.use_multi_channel == Some(true)
    }

    /// Builds the multipart body. Unset options produce no field.
    pub fn build_body(&self) -> Result<MultipartBody> {
        if self.model_id.is_empty() {
            return Err(Error::Validation("model_id must be non-empty".to_string()));
        }

        let mut body = MultipartBody::new();
        body.text("model_id", self.model_id.as_str());

        match &self.source {
            AudioSource::File { data, file_name } => {
                if file_name.is_empty() {
                    return Err(Error::Validation(
                        "file_name is required for inline audio".to_string(),
                    ));
                }
                body.file("file", file_name.as_str(), data.clone());
            }
            AudioSource::CloudStorageUrl(url) => {
                if url.is_empty() {
                    return Err(Error::Validation(
                        "cloud_storage_url must be non-empty".to_string(),
                    ));
                }
                body.text("cloud_storage_url", url.as_str());
            }
        }

        let o = &self.options;
        body.optional("language_code", o.language_code.as_ref())
            .optional("tag_audio_events", o.tag_audio_events.as_ref())
            .optional("num_speakers", o.num_speakers.as_ref())
            .optional("timestamps_granularity", o.timestamps_granularity.as_ref())
            .optional("diarize", o.diarize.as_ref())
            .optional("diarization_threshold", o.diarization_threshold.as_ref());

        if !o.additional_formats.is_empty() {
            body.json("additional_formats", &o.additional_formats)?;
        }

        body.optional("file_format", o.file_format.as_ref())
            .optional("webhook", o.webhook.as_ref())
            .optional("webhook_id", o.webhook_id.as_ref())
            .optional("temperature", o.temperature.as_ref())
            .optional("seed", o.seed.as_ref())
            .optional("use_multi_channel", o.use_multi_channel.as_ref());

        if let Some(metadata) = &o.webhook_metadata {
            body.json("webhook_metadata", metadata)?;
        }

        Ok(body)
    }
}

// ==================== Response Types ====================

/// A word or event in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,

    /// Start time in seconds.
    pub start: f64,

    /// End time in seconds.
    pub end: f64,

    /// `word`, `spacing` or `audio_event`.
    #[serde(rename = "type")]
    pub word_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_index: Option<u32>,

    #[serde(default, rename = "logprob", skip_serializing_if = "Option::is_none")]
    pub log_prob: Option<f64>,
}

/// Transcript of a single audio channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Detected language code.
    pub language_code: String,

    /// Confidence of the detected language.
    pub language_probability: f64,

    /// Full transcript text.
    pub text: String,

    /// Words with timing information.
    pub words: Vec<Word>,

    /// Channel this transcript belongs to, for multi-channel results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_index: Option<u32>,
}

/// One transcript per audio channel, in channel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultichannelTranscript {
    pub transcripts: Vec<Transcript>,
}

/// Acknowledgement of a transcription delivered later by webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub request_id: String,
    pub message: String,
}

/// Result of a transcription call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptionResult {
    SingleChannel(Transcript),
    MultiChannel(MultichannelTranscript),
    Webhook(WebhookAck),
}

impl TranscriptionResult {
    /// Decodes a raw response into the shape implied by the request.
    ///
    /// Webhook delivery wins over everything else, since the service then only
    /// acknowledges the request. Otherwise a multi-channel request yields one
    /// transcript per channel, and anything else a single transcript.
    pub fn resolve(request: &SpeechToTextRequest, payload: &[u8]) -> Result<Self> {
        if request.is_webhook() {
            debug!("resolving transcription as webhook acknowledgement");
            return decode_shape(payload, "webhook acknowledgement").map(Self::Webhook);
        }
        if request.is_multi_channel() {
            debug!("resolving transcription as multi-channel transcript");
            return decode_shape(payload, "multi-channel transcript").map(Self::MultiChannel);
        }
        decode_shape(payload, "single-channel transcript").map(Self::SingleChannel)
    }

    /// Returns the single transcript, if this is one.
    pub fn as_single(&self) -> Option<&Transcript> {
        match self {
            Self::SingleChannel(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the per-channel transcripts, if this is a multi-channel result.
    pub fn as_multi(&self) -> Option<&MultichannelTranscript> {
        match self {
            Self::MultiChannel(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the webhook acknowledgement, if this is one.
    pub fn as_webhook(&self) -> Option<&WebhookAck> {
        match self {
            Self::Webhook(ack) => Some(ack),
            _ => None,
        }
    }
}

fn decode_shape<T: DeserializeOwned>(payload: &[u8], target: &'static str) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| Error::decode(target, e, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE: &str = r#"{
        "language_code": "en",
        "language_probability": 0.98,
        "text": "Hello world",
        "words": [
            {"text": "Hello", "start": 0.0, "end": 0.5, "type": "word", "speaker_id": "speaker_0"},
            {"text": " ", "start": 0.5, "end": 0.55, "type": "spacing"},
            {"text": "world", "start": 0.55, "end": 1.0, "type": "word", "logprob": -0.1}
        ]
    }"#;

    fn file_request() -> SpeechToTextRequest {
        SpeechToTextRequest::new("scribe_v1", AudioSource::file(vec![1u8, 2, 3], "audio.mp3"))
    }

    #[test]
    fn test_resolve_single_channel() {
        let req = file_request();
        let result = TranscriptionResult::resolve(&req, SINGLE.as_bytes()).unwrap();

        let expected: Transcript = serde_json::from_str(SINGLE).unwrap();
        let transcript = result.as_single().expect("single-channel result");
        assert_eq!(transcript, &expected);
        assert_eq!(transcript.words.len(), 3);
        assert_eq!(transcript.words[0].speaker_id.as_deref(), Some("speaker_0"));
        assert_eq!(transcript.words[2].log_prob, Some(-0.1));
    }

    #[test]
    fn test_resolve_multi_channel_preserves_order() {
        let mut req = file_request();
        req.options.use_multi_channel = Some(true);

        let payload = serde_json::json!({
            "transcripts": [
                {"language_code": "en", "language_probability": 0.9, "text": "left", "words": [], "channel_index": 0},
                {"language_code": "en", "language_probability": 0.8, "text": "right", "words": [], "channel_index": 1},
                {"language_code": "fr", "language_probability": 0.7, "text": "third", "words": [], "channel_index": 2}
            ]
        });
        let result = TranscriptionResult::resolve(&req, payload.to_string().as_bytes()).unwrap();

        let multi = result.as_multi().expect("multi-channel result");
        let texts: Vec<_> = multi.transcripts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["left", "right", "third"]);
    }

    #[test]
    fn test_resolve_webhook() {
        let mut req = file_request();
        req.options.webhook = Some(true);

        let payload = br#"{"request_id":"req_123","message":"Request accepted"}"#;
        let result = TranscriptionResult::resolve(&req, payload).unwrap();
        assert_eq!(
            result,
            TranscriptionResult::Webhook(WebhookAck {
                request_id: "req_123".to_string(),
                message: "Request accepted".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_webhook_wins_over_transcript_shape() {
        let mut req = file_request();
        req.options.webhook = Some(true);
        req.options.use_multi_channel = Some(true);

        let mut payload: serde_json::Value = serde_json::from_str(SINGLE).unwrap();
        payload["request_id"] = "req_9".into();
        payload["message"] = "queued".into();
        payload["transcripts"] = serde_json::json!([]);

        let result = TranscriptionResult::resolve(&req, payload.to_string().as_bytes()).unwrap();
        assert_eq!(result.as_webhook().map(|a| a.request_id.as_str()), Some("req_9"));
    }

    #[test]
    fn test_resolve_webhook_false_is_synchronous() {
        let mut req = file_request();
        req.options.webhook = Some(false);
        req.options.use_multi_channel = Some(false);

        let result = TranscriptionResult::resolve(&req, SINGLE.as_bytes()).unwrap();
        assert!(result.as_single().is_some());
    }

    #[test]
    fn test_resolve_malformed_is_decode_error() {
        let cases: Vec<(SpeechToTextRequest, &str)> = vec![
            (file_request(), "single-channel transcript"),
            (
                {
                    let mut r = file_request();
                    r.options.use_multi_channel = Some(true);
                    r
                },
                "multi-channel transcript",
            ),
            (
                {
                    let mut r = file_request();
                    r.options.webhook = Some(true);
                    r
                },
                "webhook acknowledgement",
            ),
        ];

        for (req, expected_target) in cases {
            let payloads: [&[u8]; 4] = [b"{\"text\": ", b"{}", b"[]", b""];
            for payload in payloads {
                match TranscriptionResult::resolve(&req, payload) {
                    Err(Error::Decode { target, .. }) => assert_eq!(target, expected_target),
                    other => panic!("expected decode error, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_resolve_decode_error_carries_fragment() {
        let req = file_request();
        let err = TranscriptionResult::resolve(&req, br#"{"text": 42}"#).unwrap_err();
        match err {
            Error::Decode { fragment, .. } => assert_eq!(fragment, r#"{"text": 42}"#),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_build_body_minimal_file() {
        let body = file_request().build_body().unwrap();

        assert_eq!(body.field("model_id"), Some("scribe_v1"));
        assert!(body.field("cloud_storage_url").is_none());
        let files = body.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "file");
        assert_eq!(files[0].1, "audio.mp3");
        assert_eq!(files[0].2.as_ref(), &[1u8, 2, 3]);
        // model_id + file only
        assert_eq!(body.parts().len(), 2);
    }

    #[test]
    fn test_build_body_cloud_storage() {
        let req = SpeechToTextRequest::new(
            "scribe_v1",
            AudioSource::url("https://example.com/audio.mp3"),
        );
        let body = req.build_body().unwrap();

        assert!(body.files().is_empty());
        assert_eq!(
            body.field("cloud_storage_url"),
            Some("https://example.com/audio.mp3")
        );
    }

    #[test]
    fn test_build_body_forwards_set_options() {
        let mut req = file_request();
        req.options = SpeechToTextOptions {
            language_code: Some("en".to_string()),
            tag_audio_events: Some(false),
            num_speakers: Some(0),
            timestamps_granularity: Some(TimestampsGranularity::Word),
            diarize: Some(true),
            diarization_threshold: Some(0.25),
            additional_formats: vec![AdditionalFormat {
                format: "srt".to_string(),
                timestamps_granularity: None,
                diarize: None,
                max_speakers: None,
                max_words: Some(10),
                punctuate_only: None,
            }],
            file_format: Some(FileFormat::PcmS16le16),
            webhook: Some(false),
            webhook_id: Some("wh_1".to_string()),
            webhook_metadata: Some(serde_json::json!({"job": 7})),
            temperature: Some(0.0),
            seed: Some(42),
            use_multi_channel: Some(false),
        };
        let body = req.build_body().unwrap();

        assert_eq!(body.field("language_code"), Some("en"));
        assert_eq!(body.field("tag_audio_events"), Some("false"));
        assert_eq!(body.field("num_speakers"), Some("0"));
        assert_eq!(body.field("timestamps_granularity"), Some("word"));
        assert_eq!(body.field("diarize"), Some("true"));
        assert_eq!(body.field("diarization_threshold"), Some("0.25"));
        assert_eq!(
            body.field("additional_formats"),
            Some(r#"[{"type":"srt","max_words":10}]"#)
        );
        assert_eq!(body.field("file_format"), Some("pcm_s16le_16"));
        assert_eq!(body.field("webhook"), Some("false"));
        assert_eq!(body.field("webhook_id"), Some("wh_1"));
        assert_eq!(body.field("webhook_metadata"), Some(r#"{"job":7}"#));
        assert_eq!(body.field("temperature"), Some("0"));
        assert_eq!(body.field("seed"), Some("42"));
        assert_eq!(body.field("use_multi_channel"), Some("false"));
    }

    #[test]
    fn test_build_body_requires_file_name() {
        let req = SpeechToTextRequest::new("scribe_v1", AudioSource::file(vec![0u8], ""));
        assert!(matches!(req.build_body(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_build_body_requires_model() {
        let req = SpeechToTextRequest::new("", AudioSource::url("https://example.com/a.mp3"));
        assert!(matches!(req.build_body(), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_from_path_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let source = AudioSource::from_path(&path).await.unwrap();
        assert_eq!(source, AudioSource::file(b"RIFF".to_vec(), "clip.wav"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AudioSource::from_path(dir.path().join("missing.wav")).await;
        assert!(matches!(result, Err(Error::Encode(_))));
    }

    #[tokio::test]
    async fn test_from_reader() {
        let source = AudioSource::from_reader(&b"abc"[..], "a.raw").await.unwrap();
        assert_eq!(source, AudioSource::file(b"abc".to_vec(), "a.raw"));
    }

    #[test]
    fn test_options_load_from_json() {
        let options: SpeechToTextOptions =
            serde_json::from_str(r#"{"diarize": true, "timestamps_granularity": "character"}"#)
                .unwrap();
        assert_eq!(options.diarize, Some(true));
        assert_eq!(
            options.timestamps_granularity,
            Some(TimestampsGranularity::Character)
        );
        assert!(options.webhook.is_none());
    }
}
