//! CLI commands module.

mod cli_config;
mod config;
mod history;
mod model;
mod stt;
mod tts;
mod user;
mod util;
mod voice;

pub use config::ConfigCommand;
pub use history::HistoryCommand;
pub use model::ModelCommand;
pub use stt::SttCommand;
pub use tts::TtsCommand;
pub use user::UserCommand;
pub use voice::VoiceCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
