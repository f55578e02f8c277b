use thiserror::Error;

/// Failure to complete a backend call at all (as opposed to the backend
/// answering with `success: false`).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response whose body carried a `message`.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("backend responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid backend payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Message embedded in the backend's error response, when there is one.
    pub fn embedded_message(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Builds the error for a non-2xx response body.
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .filter(|m| !m.is_empty());

        match message {
            Some(message) => BackendError::Rejected { status, message },
            None => BackendError::Status {
                status,
                body: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_embedded_message() {
        let err = BackendError::from_response(400, br#"{"message":"Invalid field: salary"}"#);
        assert_eq!(err.embedded_message(), Some("Invalid field: salary"));
        assert_eq!(err.to_string(), "Invalid field: salary");
    }

    #[test]
    fn falls_back_to_raw_body() {
        let err = BackendError::from_response(502, b"Bad Gateway");
        assert!(err.embedded_message().is_none());
        assert_eq!(err.to_string(), "backend responded with HTTP 502: Bad Gateway");
    }
}
