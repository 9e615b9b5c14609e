use reqwest::StatusCode;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Feature disabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code of a failed API call, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::HttpClient(e) => e.status(),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status_and_body() {
        let err = AppError::Api {
            status: StatusCode::NOT_FOUND,
            body: "no such recommendation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API returned status 404 Not Found: no such recommendation"
        );
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        assert_eq!(AppError::InvalidInput("id".to_string()).status(), None);
        assert_eq!(AppError::FeatureDisabled("delete").status(), None);
    }
}
