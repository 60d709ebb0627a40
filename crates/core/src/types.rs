use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransformError;

/// Tone and vocabulary preset applied to the rewritten code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationStyle {
    #[serde(rename = "Gen Z")]
    GenZ,
    Millennial,
    Boomer,
}

impl GenerationStyle {
    pub const ALL: [GenerationStyle; 3] = [Self::GenZ, Self::Millennial, Self::Boomer];

    /// Name used on the wire and in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenZ => "Gen Z",
            Self::Millennial => "Millennial",
            Self::Boomer => "Boomer",
        }
    }
}

impl fmt::Display for GenerationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationStyle {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "genz" => Ok(Self::GenZ),
            "millennial" | "millenial" => Ok(Self::Millennial),
            "boomer" => Ok(Self::Boomer),
            _ => Err(TransformError::InvalidRequest(format!(
                "Unsupported style: {}",
                s.trim()
            ))),
        }
    }
}

/// Languages the example library and the prompt builder know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgrammingLanguage {
    JavaScript,
    Python,
    Java,
    TypeScript,
    #[serde(rename = "C++")]
    Cpp,
    Ruby,
    Go,
}

impl ProgrammingLanguage {
    pub const ALL: [ProgrammingLanguage; 7] = [
        Self::JavaScript,
        Self::Python,
        Self::TypeScript,
        Self::Java,
        Self::Cpp,
        Self::Ruby,
        Self::Go,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Java => "Java",
            Self::TypeScript => "TypeScript",
            Self::Cpp => "C++",
            Self::Ruby => "Ruby",
            Self::Go => "Go",
        }
    }

    /// Identifier a code editor uses for syntax highlighting.
    pub fn editor_id(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::TypeScript => "typescript",
            Self::Cpp => "cpp",
            Self::Ruby => "ruby",
            Self::Go => "go",
        }
    }
}

impl fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgrammingLanguage {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "c++" | "cpp" => Ok(Self::Cpp),
            "ruby" | "rb" => Ok(Self::Ruby),
            "go" | "golang" => Ok(Self::Go),
            _ => Err(TransformError::InvalidRequest(format!(
                "Unsupported language: {}",
                s.trim()
            ))),
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// How the endpoint hands the model output back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Forward each chunk as a `text/plain` body as soon as the model emits it.
    #[default]
    Stream,
    /// Wait for the whole completion and answer with a [`TransformResponse`].
    Batch,
}

/// Body of `POST /transform` as it arrives on the wire.
///
/// Every field is optional here so that an absent field becomes a
/// `Missing required fields` error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TransformRequest {
    pub fn new(
        code: impl Into<String>,
        style: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            style: Some(style.into()),
            language: Some(language.into()),
        }
    }

    /// Check that all three fields are present and parse the enumerations.
    pub fn validate(&self) -> Result<Transform, TransformError> {
        let (Some(code), Some(style), Some(language)) = (
            present(&self.code),
            present(&self.style),
            present(&self.language),
        ) else {
            return Err(TransformError::missing_fields());
        };

        Ok(Transform {
            code: code.to_string(),
            style: style.parse()?,
            language: language.parse()?,
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// A validated transformation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    pub code: String,
    pub style: GenerationStyle,
    pub language: ProgrammingLanguage,
}

/// Batch-mode response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub transformed_code: String,
}
