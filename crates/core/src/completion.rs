//! Wire format of the OpenAI-compatible chat completions API.
//!
//! Only the pieces needed to send one system+user exchange and read the text
//! back are modelled. Everything else in the provider payloads is ignored.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::prompt::Prompt;

/// Sentinel sent as the last SSE `data:` payload of a streamed completion.
pub const STREAM_DONE: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Build the request body for one completion call.
pub fn completion_request<'a>(
    prompt: &'a Prompt,
    model: &'a str,
    temperature: f32,
    stream: bool,
) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: &prompt.system,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user,
            },
        ],
        temperature,
        stream,
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Pull the assistant text out of a non-streamed completion body.
pub fn parse_completion(body: &str) -> Result<String, TransformError> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| TransformError::failed(format!("Failed to parse completion: {e}")))?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| TransformError::failed("Completion contained no content"))
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// What a single SSE `data:` payload means for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text to forward to the caller.
    Delta(String),
    /// The provider finished the completion.
    Done,
    /// Role announcements, finish markers and other content-free chunks.
    Skip,
}

/// Interpret one SSE `data:` payload of a streamed completion.
pub fn parse_stream_data(data: &str) -> Result<StreamEvent, TransformError> {
    let data = data.trim();

    if data == STREAM_DONE {
        return Ok(StreamEvent::Done);
    }

    if data.is_empty() {
        return Ok(StreamEvent::Skip);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| TransformError::failed(format!("Failed to parse stream chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(TransformError::failed(format!(
            "Provider reported an error mid-stream: {error}"
        )));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty())
        .map_or(StreamEvent::Skip, StreamEvent::Delta))
}
