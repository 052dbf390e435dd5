//! ElevenLabs API SDK for Rust.
//!
//! This crate provides a client for the ElevenLabs speech synthesis and
//! transcription API: text-to-speech (buffered and streamed), speech-to-text,
//! voice management, paginated history and account information.

mod client;
mod error;
mod history;
pub mod http;
mod models;
pub mod multipart;
mod speech;
mod stt;
mod types;
mod user;
mod voice;

pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_API_KEY, ENV_BASE_URL,
};
pub use error::{Error, Result};
pub use history::{
    DownloadHistoryRequest, Feedback, HistoryCursor, HistoryItem, HistoryPage, HistoryQuery,
    HistoryService,
};
pub use models::*;
pub use speech::{SpeechOptions, SpeechService, TextToSpeechRequest};
pub use stt::{
    AdditionalFormat, AudioSource, FileFormat, MultichannelTranscript, SpeechToTextOptions,
    SpeechToTextRequest, TimestampsGranularity, Transcript, TranscriptionResult,
    TranscriptionService, WebhookAck, Word,
};
pub use types::{OutputFormat, VoiceSettings};
pub use user::{Invoice, Subscription, User, UserService};
pub use voice::{
    AddEditVoiceRequest, FineTuning, ManualVerification, Recording, VerificationAttempt,
    VerificationFile, Voice, VoiceSample, VoiceService, VoiceSharing,
};
