// Backend client error types
use serde_json::Value;

use crate::filter::FilterError;

/// Failure talking to the hosted backend, classified by response status
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden (row-level security rejections land here)
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // Any other non-success status
    #[error("{message}")]
    Backend { status: u16, code: Option<String>, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    Filter(#[from] FilterError),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Build from a non-success response. Understands both the REST error
    /// shape `{code, message}` and the auth shape `{error, error_description}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let message = field("message")
            .or_else(|| field("msg"))
            .or_else(|| field("error_description"))
            .or_else(|| field("error"))
            .unwrap_or_else(|| if body.is_empty() { format!("HTTP {}", status) } else { body.to_string() });
        let code = field("code").or_else(|| field("error_code"));

        match status {
            400 => ClientError::BadRequest(message),
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            _ => ClientError::Backend { status, code, message },
        }
    }

    /// HTTP status code, when the error came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Json(_) | ClientError::Filter(_) | ClientError::InvalidUrl(_) => None,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::BadRequest(_) => "BAD_REQUEST",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Forbidden(_) => "FORBIDDEN",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Conflict(_) => "CONFLICT",
            ClientError::Backend { .. } => "BACKEND_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Json(_) => "INVALID_RESPONSE",
            ClientError::Filter(_) => "INVALID_QUERY",
            ClientError::InvalidUrl(_) => "INVALID_URL",
        }
    }
}
