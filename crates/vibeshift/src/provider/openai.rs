use crate::prelude::*;
use color_eyre::eyre::Report;
use eventsource_stream::Eventsource;
use futures::{future, StreamExt, TryStreamExt};
use vibeshift_core::completion::{
    completion_request, parse_completion, parse_stream_data, StreamEvent,
};
use vibeshift_core::prompt::Prompt;

use super::{ChunkStream, CompletionProvider, ProviderConfig};

/// OpenAI-compatible chat completions client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn send(&self, prompt: &Prompt, stream: bool) -> Result<reqwest::Response> {
        // Fail closed: without a key no request leaves the process.
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential("OPENAI_API_KEY"))?;

        let body = completion_request(prompt, &self.config.model, self.config.temperature, stream);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request to provider: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("Provider returned [{}]: {}", status, body));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let response = self.send(prompt, false).await?;

        let body = response
            .text()
            .await
            .map_err(|e| eyre!("Failed to read completion: {}", e))?;

        parse_completion(&body).map_err(|e| eyre!(e))
    }

    async fn stream(&self, prompt: &Prompt) -> Result<ChunkStream> {
        let response = self.send(prompt, true).await?;

        let chunks = response
            .bytes_stream()
            .eventsource()
            .map(|event| -> Result<StreamEvent> {
                let event = event.map_err(|e| eyre!("Failed to read provider stream: {}", e))?;
                parse_stream_data(&event.data).map_err(|e| eyre!(e))
            })
            .try_take_while(|event| future::ready(Ok::<_, Report>(*event != StreamEvent::Done)))
            .try_filter_map(|event| {
                future::ready(Ok::<_, Report>(match event {
                    StreamEvent::Delta(text) => Some(text),
                    StreamEvent::Done | StreamEvent::Skip => None,
                }))
            });

        Ok(chunks.boxed())
    }
}
