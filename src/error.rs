use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::fmt;
use thiserror::Error as ThisError;

/// Authorization failure codes, in the order the checker can produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    MissingHeader,
    MalformedHeader,
    InvalidHeader,
    TokenExpired,
    InvalidClaims,
    Unauthorized,
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::MissingHeader => "missing_header",
            AuthErrorCode::MalformedHeader => "malformed_header",
            AuthErrorCode::InvalidHeader => "invalid_header",
            AuthErrorCode::TokenExpired => "token_expired",
            AuthErrorCode::InvalidClaims => "invalid_claims",
            AuthErrorCode::Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal authorization failure. The checker never retries; the caller
/// must present a new token.
#[derive(Debug, Clone, ThisError)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub status: StatusCode,
    pub code: AuthErrorCode,
    pub description: String,
}

impl AuthError {
    fn new(status: StatusCode, code: AuthErrorCode, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    pub fn missing_header() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::MissingHeader,
            "Authorization header is expected.",
        )
    }

    pub fn malformed_header(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::MalformedHeader,
            description,
        )
    }

    pub fn invalid_header(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::InvalidHeader,
            description,
        )
    }

    pub fn token_expired() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::TokenExpired,
            "Token expired.",
        )
    }

    pub fn invalid_claims(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            AuthErrorCode::InvalidClaims,
            description,
        )
    }

    /// The `permissions` claim is absent from an otherwise valid token.
    pub fn permissions_not_included() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            AuthErrorCode::InvalidClaims,
            "Permissions not included in token.",
        )
    }

    pub fn permission_not_found() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            AuthErrorCode::Unauthorized,
            "Permission not found.",
        )
    }
}

#[derive(Debug, ThisError)]
pub enum BaristaError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("resource not found")]
    NotFound,

    #[error("bad request: {0}")]
    Validation(String),

    #[error("unprocessable")]
    Unprocessable,

    #[error("forbidden")]
    Forbidden,
}

/// Standardized API error response body.
#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl IntoResponse for BaristaError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            BaristaError::Auth(err) => (err.status, err.description),
            BaristaError::NotFound => (StatusCode::NOT_FOUND, "resource not found".to_string()),
            BaristaError::Validation(_) => (StatusCode::BAD_REQUEST, "Bad Request".to_string()),
            BaristaError::Unprocessable => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable".to_string())
            }
            BaristaError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            BaristaError::Reqwest(_) | BaristaError::UrlParse(_) => (
                StatusCode::BAD_GATEWAY,
                "upstream service unavailable".to_string(),
            ),
            BaristaError::Database(_)
            | BaristaError::Json(_)
            | BaristaError::Config(_)
            | BaristaError::UnsupportedAlgorithm(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
