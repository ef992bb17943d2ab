use thiserror::Error;

/// Failures from the credential service.
///
/// The session collapses every variant into a single error string for
/// consumers, so the `Display` messages are written to be shown as-is.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials or expired token")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AuthError {
    /// Truncate a response body to avoid carrying excessive data in messages
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back off to a char boundary so slicing can't split a multi-byte
        // character.
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => AuthError::Unauthorized,
            403 => AuthError::AccessDenied(truncated),
            429 => AuthError::RateLimited,
            500..=599 => AuthError::ServerError(truncated),
            _ => AuthError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}
