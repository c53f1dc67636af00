//! Gateway failure classification.

use portal_model::EntityId;

/// Errors from the gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The service does not know this character.
    #[error("character {0} not found")]
    NotFound(EntityId),

    /// A steal found no eligible character.
    #[error("no characters left to steal")]
    NothingToSteal,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("service error ({status}): {message}")]
    Api {
        status: u16,
        /// `detail`/`message` field of the body, or the raw body.
        message: String,
    },

    /// A 2xx body that did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The configured base URL cannot carry API paths.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// Injected failure from the in-memory gateway.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// Text suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "Character not found".to_string(),
            Self::NothingToSteal => {
                "There are no characters left for Rick Prime to steal".to_string()
            }
            Self::Request(err) if err.is_timeout() => "The portal service timed out".to_string(),
            Self::Request(_) => "Could not reach the portal service".to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Decode(_) => "Unexpected response from the portal service".to_string(),
            Self::InvalidUrl(url) => format!("Invalid service URL: {url}"),
            Self::Unavailable(message) => message.clone(),
        }
    }

    /// Stable short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::NothingToSteal => "nothing_to_steal",
            Self::Request(_) => "request",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Pull a human message out of an error body.
///
/// Prefers a string `detail` field, then a string `message` field, then the
/// trimmed body itself; an empty body yields the status text.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                return text.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {status}")
    } else {
        trimmed.to_string()
    }
}
