/// Errors produced while turning a request into transformed code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The caller sent something we can't work with. The message is safe to
    /// return to the caller as-is.
    #[error("{0}")]
    InvalidRequest(String),

    /// The provider failed, timed out, or answered with something unusable.
    /// The message is for server-side diagnostics only.
    #[error("Transform failed: {0}")]
    TransformFailed(String),
}

impl TransformError {
    /// The message every caller sees for a [`TransformError::TransformFailed`].
    pub const PUBLIC_FAILURE_MESSAGE: &'static str = "Failed to transform code";

    /// The message every caller sees when a field is absent or blank.
    pub const MISSING_FIELDS_MESSAGE: &'static str = "Missing required fields";

    pub fn missing_fields() -> Self {
        Self::InvalidRequest(Self::MISSING_FIELDS_MESSAGE.to_string())
    }

    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self::TransformFailed(cause.to_string())
    }

    /// Message that is safe to put in a response body.
    pub fn public_message(&self) -> &str {
        match self {
            Self::InvalidRequest(message) => message,
            Self::TransformFailed(_) => Self::PUBLIC_FAILURE_MESSAGE,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_message_hides_failure_cause() {
        let err = TransformError::failed("upstream said 401: invalid api key sk-123");
        assert_eq!(err.public_message(), "Failed to transform code");
        assert!(err.to_string().contains("sk-123"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_invalid_request_message_is_public() {
        let err = TransformError::missing_fields();
        assert_eq!(err.public_message(), "Missing required fields");
        assert!(err.is_client_error());
    }
}
