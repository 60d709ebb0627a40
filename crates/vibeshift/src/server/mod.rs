pub mod routes;

use crate::prelude::{eprintln, *};
use crate::provider::{OpenAiProvider, ProviderConfig};
use std::sync::Arc;
use std::time::Duration;
use vibeshift_core::samples::ExampleLibrary;
use vibeshift_core::types::ResponseMode;

pub use routes::{router, AppState};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Mode {
    /// Relay model output as a text/plain stream while it is generated
    Stream,
    /// Wait for the full output and answer with a JSON object
    Batch,
}

impl From<Mode> for ResponseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Stream => ResponseMode::Stream,
            Mode::Batch => ResponseMode::Batch,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "VIBESHIFT_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "VIBESHIFT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// How transformed code is returned to callers
    #[arg(long, value_enum, env = "VIBESHIFT_MODE", default_value = "stream")]
    pub mode: Mode,

    /// Upper bound for a whole transformation, in seconds
    #[arg(
        long,
        env = "VIBESHIFT_TIMEOUT_SECS",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..=crate::client::MAX_TIMEOUT_SECS)
    )]
    pub timeout_secs: u64,

    /// Model identifier sent to the provider
    #[arg(long, env = "OPENAI_MODEL", default_value = ProviderConfig::DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature
    #[arg(long, env = "OPENAI_TEMPERATURE", default_value_t = ProviderConfig::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = ProviderConfig::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let api_key = options.api_key.filter(|key| !key.trim().is_empty());
    if api_key.is_none() {
        log::warn!("OPENAI_API_KEY is not set; every transform request will fail");
    }

    let timeout = Duration::from_secs(options.timeout_secs);
    let config = ProviderConfig {
        base_url: options.base_url,
        api_key,
        model: options.model,
        temperature: options.temperature,
        timeout,
    };

    if global.verbose {
        eprintln!("Provider: {:?}", config);
    }

    let provider = OpenAiProvider::new(config)?;
    let mode = ResponseMode::from(options.mode);

    let state = Arc::new(AppState {
        provider: Arc::new(provider),
        library: ExampleLibrary::builtin(),
        mode,
        timeout,
    });

    let addr = f!("{}:{}", options.host, options.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Listening on http://{} ({:?} mode)", addr, mode);
    if global.verbose {
        eprintln!("Transform endpoint: http://{}/transform", addr);
        eprintln!("Samples endpoint: http://{}/samples", addr);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        options: ServeOptions,
    }

    #[test]
    fn test_timeout_flag_is_bounded() {
        let cli = Cli::try_parse_from(["serve", "--timeout-secs", "45"]).unwrap();
        assert_eq!(cli.options.timeout_secs, 45);
        assert!(Cli::try_parse_from(["serve", "--timeout-secs", "0"]).is_err());
        assert!(Cli::try_parse_from(["serve", "--timeout-secs", "18446744073709551615"]).is_err());
    }

    #[test]
    fn test_temperature_flag() {
        let cli = Cli::try_parse_from(["serve", "--temperature", "0.2"]).unwrap();
        assert_eq!(cli.options.temperature, 0.2);
        assert_eq!(ProviderConfig::DEFAULT_TEMPERATURE, 0.7);
    }
}
