//! Text-to-speech service.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::{
    error::{Error, Result},
    http::{ByteStream, HttpClient},
    types::{OutputFormat, VoiceSettings},
};

/// Text-to-speech service.
pub struct SpeechService {
    http: Arc<HttpClient>,
}

impl SpeechService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Synthesizes speech and returns the complete audio.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let request = TextToSpeechRequest {
    ///     text: "Hello, world!".to_string(),
    ///     model_id: Some(MODEL_MONOLINGUAL_V1.to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let audio = client.speech().synthesize("pNInz6obpgDQGcFmaJgB", &request, &SpeechOptions::default()).await?;
    /// std::fs::write("adam.mp3", &audio)?;
    /// ```
    pub async fn synthesize(
        &self,
        voice_id: &str,
        request: &TextToSpeechRequest,
        options: &SpeechOptions,
    ) -> Result<Bytes> {
        request.validate()?;
        let path = format!("/v1/text-to-speech/{}", voice_id);
        self.http.post_json_bytes(&path, options, request).await
    }

    /// Synthesizes speech and returns the audio as it arrives.
    ///
    /// Chunks are passed through unbuffered. Dropping the stream cancels the
    /// transfer. The client timeout applies to connecting and to the wait for
    /// each chunk, not to the whole transfer.
    pub async fn synthesize_stream(
        &self,
        voice_id: &str,
        request: &TextToSpeechRequest,
        options: &SpeechOptions,
    ) -> Result<ByteStream> {
        request.validate()?;
        let path = format!("/v1/text-to-speech/{}/stream", voice_id);
        self.http.post_json_stream(&path, options, request).await
    }

    /// Streams synthesized audio into a writer and returns the number of bytes
    /// copied.
    ///
    /// The writer is flushed but not closed. A failed read or write stops the
    /// copy and is reported as-is; nothing is resumed. As with
    /// [`synthesize_stream`](Self::synthesize_stream), long audio is not cut
    /// off by the client timeout.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut file = tokio::fs::File::create("out.mp3").await?;
    /// let written = client
    ///     .speech()
    ///     .synthesize_to(voice_id, &request, &SpeechOptions::default(), &mut file)
    ///     .await?;
    /// ```
    pub async fn synthesize_to<W>(
        &self,
        voice_id: &str,
        request: &TextToSpeechRequest,
        options: &SpeechOptions,
        writer: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut stream = self.synthesize_stream(voice_id, request, options).await?;
        let written = copy_stream(&mut stream, writer).await?;
        debug!("streamed {} bytes for voice {}", written, voice_id);
        Ok(written)
    }
}

/// Copies every chunk of a byte stream into a writer.
pub(crate) async fn copy_stream<W>(stream: &mut ByteStream, writer: &mut W) -> Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await.map_err(Error::Io)?;
        written += chunk.len() as u64;
    }
    writer.flush().await.map_err(Error::Io)?;
    Ok(written)
}

// ==================== Request/Response Types ====================

/// Request for speech synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextToSpeechRequest {
    /// Text to synthesize.
    pub text: String,

    /// Model identifier. The service default is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    /// Overrides the stored settings of the voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,

    /// ISO 639-1 language code to enforce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    /// Seed for deterministic sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl TextToSpeechRequest {
    /// Creates a request for the given text with service defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(Error::Validation("text must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Query options for speech synthesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechOptions {
    /// Audio output format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Latency optimization level (0-4). Higher values trade quality for speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize_streaming_latency: Option<u8>,

    /// Whether the service may log the request. Disabling it requires an
    /// enterprise account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_logging: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn test_request_skips_unset_fields() {
        let req = TextToSpeechRequest::new("Hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Hello"}));
    }

    #[test]
    fn test_request_rejects_empty_text() {
        let req = TextToSpeechRequest::default();
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_copy_stream_writes_all_chunks() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"abc")),
            Ok(Bytes::from_static(b"de")),
        ];
        let mut stream: ByteStream = stream::iter(chunks).boxed();
        let mut sink = Vec::new();

        let written = copy_stream(&mut stream, &mut sink).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(sink, b"abcde");
    }

    #[tokio::test]
    async fn test_copy_stream_stops_on_error() {
        let chunks: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(Error::Validation("broken".to_string())),
            Ok(Bytes::from_static(b"never")),
        ];
        let mut stream: ByteStream = stream::iter(chunks).boxed();
        let mut sink = Vec::new();

        let result = copy_stream(&mut stream, &mut sink).await;
        assert!(result.is_err());
        assert_eq!(sink, b"abc");
    }
}
