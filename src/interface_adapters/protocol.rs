use serde::Serialize;
use serde_json::Value;

use crate::domain::StoreError;

// Error envelope returned when the document store call fails.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    // Upstream status code, absent when the store was never reached.
    pub status: Option<u16>,
    // Raw upstream error payload.
    pub body: Option<Value>,
}

impl From<&StoreError> for ErrorResponse {
    fn from(err: &StoreError) -> Self {
        let body = match err {
            StoreError::Upstream { body, .. } if !body.is_null() => Some(body.clone()),
            _ => None,
        };
        Self {
            message: err.to_string(),
            status: err.status(),
            body,
        }
    }
}
