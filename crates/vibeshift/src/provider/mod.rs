mod openai;

pub use openai::OpenAiProvider;

use crate::prelude::*;
use futures::stream::BoxStream;
use std::time::Duration;
use vibeshift_core::prompt::Prompt;

/// Text chunks of a streamed completion, in the order the model emitted them.
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// The hosted model that performs the actual rewrite.
///
/// Implementations make exactly one outbound call per method invocation and
/// never retry.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier sent with every call.
    fn model(&self) -> &str;

    /// Wait for the whole completion.
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Start a streamed completion. Content-free events are filtered out.
    async fn stream(&self, prompt: &Prompt) -> Result<ChunkStream>;
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-3.5-turbo";
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use futures::{stream, StreamExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub enum Behavior {
        Reply(Vec<&'static str>),
        Fail(&'static str),
        FailMidStream(&'static str),
        Hang,
    }

    /// In-memory provider that records every prompt it receives.
    pub struct FakeProvider {
        behavior: Behavior,
        calls: AtomicUsize,
        prompts: Mutex<Vec<Prompt>>,
    }

    impl FakeProvider {
        pub fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(chunks: Vec<&'static str>) -> Self {
            Self::new(Behavior::Reply(chunks))
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<Prompt> {
            self.prompts.lock().unwrap().clone()
        }

        fn record(&self, prompt: &Prompt) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.clone());
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for FakeProvider {
        fn model(&self) -> &str {
            "fake-model"
        }

        async fn complete(&self, prompt: &Prompt) -> Result<String> {
            self.record(prompt);
            match &self.behavior {
                Behavior::Reply(chunks) => Ok(chunks.concat()),
                Behavior::Fail(cause) | Behavior::FailMidStream(cause) => Err(eyre!("{cause}")),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }

        async fn stream(&self, prompt: &Prompt) -> Result<ChunkStream> {
            self.record(prompt);
            match &self.behavior {
                Behavior::Reply(chunks) => {
                    let chunks: Vec<Result<String>> =
                        chunks.iter().map(|chunk| Ok(chunk.to_string())).collect();
                    Ok(stream::iter(chunks).boxed())
                }
                Behavior::Fail(cause) => Err(eyre!("{cause}")),
                Behavior::FailMidStream(cause) => {
                    let chunks = vec![Ok("partial ".to_string()), Err(eyre!("{cause}"))];
                    Ok(stream::iter(chunks).boxed())
                }
                Behavior::Hang => Ok(stream::pending().boxed()),
            }
        }
    }
}
