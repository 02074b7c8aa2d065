use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of a non-success admin API response. Older endpoints send
/// `message` instead of `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    pub fn message_from_bytes(body: &[u8]) -> Option<String> {
        let parsed: ApiErrorBody = serde_json::from_slice(body).ok()?;
        parsed
            .error
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown approval status '{value}', expected pending, approved or rejected")]
pub struct ParseStatusError {
    pub value: String,
}

impl ParseStatusError {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
