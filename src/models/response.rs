use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };

use crate::error::AiError;
use crate::stats::RequestStats;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
}

impl From<&AiError> for ErrorDescriptor {
    fn from(err: &AiError) -> Self {
        Self {
            message: err.to_string(),
            kind: err.kind().to_string(),
            code: err.code(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
    pub tokens: u64,
    pub response_time: DateTime<Utc>,
    pub request_id: String,
    pub stats: RequestStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub success: bool,
    /// Fallback reply shown to the user in place of the model output.
    pub message: String,
    pub error: ErrorDescriptor,
    pub request_id: String,
    pub stats: RequestStats,
}

/// Outcome of `AiClient::send_message`. Always returned, never raised.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendResult {
    Success(SuccessResponse),
    Failure(FailureResponse),
}

impl SendResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SendResult::Success(r) => &r.message,
            SendResult::Failure(r) => &r.message,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            SendResult::Success(r) => &r.request_id,
            SendResult::Failure(r) => &r.request_id,
        }
    }

    pub fn stats(&self) -> &RequestStats {
        match self {
            SendResult::Success(r) => &r.stats,
            SendResult::Failure(r) => &r.stats,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            SendResult::Success(_) => None,
            SendResult::Failure(r) => Some(&r.error),
        }
    }

    pub fn response_time(&self) -> Option<DateTime<Utc>> {
        match self {
            SendResult::Success(r) => Some(r.response_time),
            SendResult::Failure(_) => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub connected: bool,
    pub response_time: Option<DateTime<Utc>>,
    pub elapsed_ms: u128,
    pub message: String,
    pub details: SendResult,
}
