//! ElevenLabs API client.

use std::sync::Arc;
use std::time::Duration;

use super::{
    error::{Error, Result},
    history::HistoryService,
    http::HttpClient,
    models::ModelService,
    speech::SpeechService,
    stt::TranscriptionService,
    user::UserService,
    voice::VoiceService,
};

/// Default ElevenLabs API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "ELEVENLABS_API_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "ELEVENLABS_BASE_URL";

/// ElevenLabs API client.
///
/// The client is cheap to share; every service borrows the same connection
/// pool.
///
/// # Example
///
/// ```rust,ignore
/// use elevenlabs::{Client, TextToSpeechRequest, SpeechOptions};
///
/// let client = Client::new("your-api-key")?;
/// let audio = client
///     .speech()
///     .synthesize(voice_id, &TextToSpeechRequest::new("Hello"), &SpeechOptions::default())
///     .await?;
/// ```
#[derive(Clone)]
pub struct Client {
    http: Arc<HttpClient>,
    config: ClientConfig,
}

/// Client configuration.
#[derive(Clone)]
struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl Client {
    /// Creates a new client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a client from `ELEVENLABS_API_KEY` and, if set,
    /// `ELEVENLABS_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_API_KEY)))?;
        let mut builder = ClientBuilder::new(api_key);
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.is_empty() {
                builder = builder.base_url(url);
            }
        }
        builder.build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Returns the text-to-speech service.
    pub fn speech(&self) -> SpeechService {
        SpeechService::new(self.http.clone())
    }

    /// Returns the speech-to-text service.
    pub fn transcription(&self) -> TranscriptionService {
        TranscriptionService::new(self.http.clone())
    }

    /// Returns the voice management service.
    pub fn voices(&self) -> VoiceService {
        VoiceService::new(self.http.clone())
    }

    /// Returns the history service.
    pub fn history(&self) -> HistoryService {
        HistoryService::new(self.http.clone())
    }

    /// Returns the model listing service.
    pub fn models(&self) -> ModelService {
        ModelService::new(self.http.clone())
    }

    /// Returns the account service.
    pub fn user(&self) -> UserService {
        UserService::new(self.http.clone())
    }

    /// Returns a reference to the internal HTTP client.
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}

/// Builder for creating an ElevenLabs API client.
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    ///
    /// Buffered calls must complete within it. Streamed synthesis only has to
    /// connect and deliver each chunk within it, whatever the total length.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("api_key must be non-empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url must be non-empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be positive".to_string()));
        }

        let http = HttpClient::new(self.base_url.clone(), &self.api_key, self.timeout)?;

        Ok(Client {
            http: Arc::new(http),
            config: ClientConfig {
                api_key: self.api_key,
                base_url: self.base_url,
                timeout: self.timeout,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = Client::new("key").unwrap();
        assert_eq!(client.api_key(), "key");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_overrides() {
        let client = Client::builder("key")
            .base_url("http://localhost:8080/")
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(60));
        assert_eq!(client.http().base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        assert!(matches!(Client::new(""), Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = Client::builder("key").timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
