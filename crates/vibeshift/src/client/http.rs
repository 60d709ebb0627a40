use crate::prelude::*;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use vibeshift_core::stream::Utf8ChunkDecoder;
use vibeshift_core::types::{TransformRequest, TransformResponse};

/// What the endpoint answered with, depending on its response mode.
pub enum TransformReply {
    Batch(String),
    Stream(BoxStream<'static, Result<String>>),
}

/// HTTP client for a running transform endpoint.
pub struct TransformClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl TransformClient {
    pub fn new(server: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: format!("{}/transform", server.trim_end_matches('/')),
        })
    }

    pub async fn transform(&self, request: &TransformRequest) -> Result<TransformReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| eyre!("Failed to reach transform endpoint {}: {}", self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or(body);

            return Err(Error::Endpoint {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        // The server's response mode shows up in the content type.
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let body: TransformResponse = response
                .json()
                .await
                .map_err(|e| eyre!("Failed to parse transform response: {}", e))?;
            return Ok(TransformReply::Batch(body.transformed_code));
        }

        Ok(TransformReply::Stream(
            decode_chunks(response.bytes_stream()).boxed(),
        ))
    }
}

/// Turn a byte stream into text chunks without splitting characters.
fn decode_chunks<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>> + Send + 'static
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    stream::unfold(
        Some((bytes.boxed(), Utf8ChunkDecoder::new())),
        |state| async move {
            let Some((mut bytes, mut decoder)) = state else {
                return None;
            };

            loop {
                match bytes.next().await {
                    Some(Ok(chunk)) => {
                        let text = decoder.push(chunk.as_ref());
                        if !text.is_empty() {
                            return Some((Ok(text), Some((bytes, decoder))));
                        }
                    }
                    Some(Err(e)) => {
                        let error = Error::StreamInterrupted(e.to_string());
                        return Some((Err(eyre!(error)), None));
                    }
                    None => {
                        let rest = decoder.finish();
                        return (!rest.is_empty()).then(|| (Ok(rest), None));
                    }
                }
            }
        },
    )
}
