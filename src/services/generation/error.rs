use thiserror::Error;

use crate::services::validation_service::ShapeError;

/// Failures while asking the language model for an itinerary. None of these
/// are retried; each carries a message the client can act on.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OpenAI API quota exceeded. Please check your OpenAI account billing and usage limits at https://platform.openai.com/account/billing")]
    QuotaExceeded,

    #[error("Invalid OpenAI API key. Please check your API key configuration.")]
    InvalidCredential,

    #[error("OpenAI API rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Failed to generate itinerary: the model returned a reply that is not valid JSON ({0})")]
    MalformedReply(String),

    #[error("Failed to generate itinerary: {0}")]
    InvalidShape(#[from] ShapeError),

    #[error("Failed to generate itinerary: {0}")]
    Upstream(String),
}

impl GenerationError {
    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::QuotaExceeded => "quota_exceeded",
            GenerationError::InvalidCredential => "invalid_credential",
            GenerationError::RateLimited => "rate_limited",
            GenerationError::MalformedReply(_) => "malformed_reply",
            GenerationError::InvalidShape(_) => "invalid_shape",
            GenerationError::Upstream(_) => "upstream",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Upstream(format!("request to OpenAI timed out ({})", err))
        } else {
            GenerationError::Upstream(format!("request to OpenAI failed ({})", err))
        }
    }
}

/// Maps a non-success OpenAI response to an error. `code` and `message` come
/// from the `{"error": {...}}` body when the upstream sent one.
pub fn classify_api_error(status: u16, code: Option<&str>, message: &str) -> GenerationError {
    let lowered = message.to_lowercase();

    match code {
        Some("insufficient_quota") => return GenerationError::QuotaExceeded,
        Some("invalid_api_key") => return GenerationError::InvalidCredential,
        Some("rate_limit_exceeded") => return GenerationError::RateLimited,
        _ => {}
    }

    if lowered.contains("quota") || lowered.contains("billing") {
        return GenerationError::QuotaExceeded;
    }

    match status {
        401 => GenerationError::InvalidCredential,
        429 => GenerationError::RateLimited,
        _ if message.is_empty() => {
            GenerationError::Upstream(format!("OpenAI returned status {}", status))
        }
        _ => GenerationError::Upstream(format!("OpenAI returned status {}: {}", status, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_and_rate_limit_are_distinct() {
        let quota = classify_api_error(429, Some("insufficient_quota"), "You exceeded your current quota");
        let rate = classify_api_error(429, Some("rate_limit_exceeded"), "Rate limit reached for gpt-4o");
        assert!(matches!(quota, GenerationError::QuotaExceeded));
        assert!(matches!(rate, GenerationError::RateLimited));
        assert_ne!(quota.kind(), rate.kind());
        assert_ne!(quota.to_string(), rate.to_string());
    }

    #[test]
    fn test_quota_detected_from_message() {
        let err = classify_api_error(403, None, "Please check your plan and billing details");
        assert!(matches!(err, GenerationError::QuotaExceeded));
    }

    #[test]
    fn test_credential_errors() {
        assert!(matches!(
            classify_api_error(401, None, "Incorrect API key provided"),
            GenerationError::InvalidCredential
        ));
        assert!(matches!(
            classify_api_error(400, Some("invalid_api_key"), ""),
            GenerationError::InvalidCredential
        ));
    }

    #[test]
    fn test_bare_429_is_rate_limited() {
        assert!(matches!(
            classify_api_error(429, None, "Too many requests"),
            GenerationError::RateLimited
        ));
    }

    #[test]
    fn test_server_errors_are_upstream() {
        let err = classify_api_error(503, None, "The engine is currently overloaded");
        match err {
            GenerationError::Upstream(message) => {
                assert!(message.contains("503"));
                assert!(message.contains("overloaded"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shape_error_converts() {
        let err: GenerationError = ShapeError {
            path: "days".to_string(),
            expected: "an array",
        }
        .into();
        assert_eq!(err.kind(), "invalid_shape");
        assert!(err.to_string().contains("`days`"));
    }
}
