//! Utility functions for CLI commands.

use std::path::Path;

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use tracing::debug;

use elevenlabs::Client;

use super::cli_config::{load_config, Config, Context};
use crate::Cli;

const APP_NAME: &str = "elevenlabs";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Gets the context configuration to use.
pub fn get_context(cli: &Cli) -> anyhow::Result<Context> {
    let cfg = get_config(cli)?;

    match (cfg.resolve_context(cli.context.as_deref()), cli.context.as_deref()) {
        (Some(ctx), _) => Ok(ctx.clone()),
        (None, Some(name)) => anyhow::bail!("context '{}' not found", name),
        (None, None) => anyhow::bail!(
            "no context specified. Use -c flag or set a default context with 'elevenlabs config use-context'"
        ),
    }
}

/// Creates an ElevenLabs client from context configuration.
pub fn create_client(ctx: &Context) -> anyhow::Result<Client> {
    let mut builder = Client::builder(&ctx.api_key);

    if !ctx.base_url.is_empty() {
        builder = builder.base_url(&ctx.base_url);
    }
    if let Some(timeout) = ctx.timeout() {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// Loads a request from a YAML or JSON file.
pub fn load_request<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
    parse_request(&data, Path::new(path)).with_context(|| format!("failed to parse {}", path))
}

/// Parses request data by file extension, trying YAML then JSON when the
/// extension says neither.
pub fn parse_request<T: DeserializeOwned>(data: &[u8], path: &Path) -> anyhow::Result<T> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("json") => Ok(serde_json::from_slice(data)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        _ => {
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            Ok(serde_json::from_slice(data)?)
        }
    }
}

/// Requires input file to be provided.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("input file is required, use -f flag"))
}

/// Requires output file to be provided.
pub fn require_output_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.output
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("output file is required for audio, use -o flag"))
}

/// Outputs binary data to a file.
pub fn output_bytes(data: &[u8], output_path: &str) -> anyhow::Result<()> {
    std::fs::write(output_path, data).with_context(|| format!("failed to write {}", output_path))?;
    Ok(())
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)? + "\n"
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Logs progress detail at debug level; shown with -v or RUST_LOG=debug.
pub fn print_verbose(msg: &str) {
    debug!("{}", msg);
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints info message.
pub fn print_info(msg: &str) {
    eprintln!("\x1b[34mℹ\x1b[0m {}", msg);
}

/// Formats bytes to human readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestRequest {
        text: String,
        #[serde(default)]
        model_id: Option<String>,
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "text: hello\nmodel_id: eleven_turbo_v2_5").unwrap();

        let req: TestRequest = load_request(file.path().to_str().unwrap()).unwrap();
        assert_eq!(req.text, "hello");
        assert_eq!(req.model_id.as_deref(), Some("eleven_turbo_v2_5"));
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(file, r#"{{"text": "hello"}}"#).unwrap();

        let req: TestRequest = load_request(file.path().to_str().unwrap()).unwrap();
        assert_eq!(req.text, "hello");
        assert!(req.model_id.is_none());
    }

    #[test]
    fn test_parse_unknown_extension() {
        let req: TestRequest = parse_request(b"text: hi", Path::new("req.txt")).unwrap();
        assert_eq!(req.text, "hi");
    }

    #[test]
    fn test_parse_invalid() {
        let result: anyhow::Result<TestRequest> = parse_request(b"{{{{", Path::new("req.json"));
        assert!(result.is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn log_output(level: tracing::Level, f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_verbose_goes_to_debug_log() {
        let shown = log_output(tracing::Level::DEBUG, || print_verbose("Using context: dev"));
        assert!(shown.contains("Using context: dev"));
        assert!(shown.contains("DEBUG"));

        let hidden = log_output(tracing::Level::INFO, || print_verbose("Using context: dev"));
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }
}
