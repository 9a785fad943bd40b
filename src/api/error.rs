use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(600);
        let err = ApiError::from_status(StatusCode::FORBIDDEN, &body);
        let message = err.to_string();
        assert!(message.contains("truncated"));
        assert!(message.len() < body.len());
    }
}
