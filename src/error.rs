use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NodeError>;

#[derive(Error, Debug)]
pub enum NodeError {
    /// A required field is absent or outside its declared bounds.
    #[error("Invalid parameter '{field}' for item {index}: {reason}")]
    Parameter {
        index: usize,
        field: String,
        reason: String,
    },
    /// The API rejected the credential.
    #[error("Authentication failed for item {index} (HTTP {status}): {body}")]
    Authentication {
        index: usize,
        status: u16,
        body: Value,
    },
    #[error("Order submission failed for item {index}: {message}{}", remote_detail(.body))]
    OrderSubmission {
        index: usize,
        status: Option<u16>,
        message: String,
        body: Option<Value>,
    },
    /// Node-level misconfiguration, detected before any item runs.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn remote_detail(body: &Option<Value>) -> String {
    match body {
        Some(body) => format!(" (response: {})", body),
        None => String::new(),
    }
}

impl NodeError {
    pub fn parameter(index: usize, field: &str, reason: impl Into<String>) -> Self {
        NodeError::Parameter {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn item_index(&self) -> Option<usize> {
        match self {
            NodeError::Parameter { index, .. }
            | NodeError::Authentication { index, .. }
            | NodeError::OrderSubmission { index, .. } => Some(*index),
            NodeError::Configuration(_) => None,
        }
    }

    /// HTTP status and response body returned by the API, when one was received.
    pub fn remote_response(&self) -> Option<(u16, &Value)> {
        match self {
            NodeError::Authentication { status, body, .. } => Some((*status, body)),
            NodeError::OrderSubmission { status: Some(status), body: Some(body), .. } => Some((*status, body)),
            _ => None,
        }
    }
}
