use serde_json::Value;
use std::fmt;

// Failures reported by a guest store adapter.
#[derive(Debug)]
pub enum StoreError {
    // The store could not be reached at all.
    Transport(String),
    // The store answered with a non-success status; `body` holds its raw error
    // payload (JSON when parseable, otherwise the text as a JSON string).
    Upstream { status: u16, body: Value },
    // A success response did not have the expected shape.
    Decode(String),
    // Credentials could not be exchanged for an access token.
    Auth(String),
}

impl StoreError {
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(err) => write!(f, "store transport error: {err}"),
            StoreError::Upstream { status, body } => {
                write!(f, "store upstream error {status}: {body}")
            }
            StoreError::Decode(err) => write!(f, "store response decode error: {err}"),
            StoreError::Auth(err) => write!(f, "store authentication error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}
