//! Client error types

use medportal_core::CoreError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The access token could not be refreshed; the session was cleared
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflicting resource (e.g. email already registered)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other client-side status
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage area could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    ///
    /// Only bodies shaped like `{"error": "..."}` or `{"message": "..."}`
    /// carry a message. Anything else (proxy HTML, plain text) is dropped.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = extract_server_message(body).unwrap_or_default();
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            code if code >= 500 => Self::ServerError {
                status: code,
                message,
            },
            code => Self::Rejected {
                status: code,
                message,
            },
        }
    }

    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::ServerError { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The message the server sent along with an error status
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest(m)
            | Self::AuthenticationFailed(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::ServerError { message: m, .. }
            | Self::Rejected { message: m, .. } => {
                if m.is_empty() {
                    None
                } else {
                    Some(m.as_str())
                }
            }
            _ => None,
        }
    }
}

fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Outcome of a failed login or registration
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend refused the credentials
    #[error("{0}")]
    InvalidCredentials(String),

    /// The backend rejected the request for another reason
    #[error("{0}")]
    Rejected(String),

    /// The response could not be used to establish a session
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request never produced a usable response
    #[error(transparent)]
    Transport(ClientError),
}

impl AuthError {
    /// Message suitable for a user-facing notification
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::InvalidCredentials(m) | Self::Rejected(m) if !m.is_empty() => m.clone(),
            Self::Transport(err) => err
                .server_message()
                .map_or_else(|| fallback.to_string(), str::to_string),
            _ => fallback.to_string(),
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthenticationFailed(m) => Self::InvalidCredentials(m),
            ClientError::BadRequest(m)
            | ClientError::Forbidden(m)
            | ClientError::Conflict(m)
            | ClientError::NotFound(m) => Self::Rejected(m),
            ClientError::Serialization(e) => Self::MalformedResponse(e.to_string()),
            other => Self::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn json_error_body_yields_server_message() {
        let err = ClientError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Invalid credentials"}"#,
        );
        assert!(matches!(err, ClientError::AuthenticationFailed(_)));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
    }

    #[test]
    fn non_json_body_carries_no_message() {
        let html = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, html);
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.server_message(), None);

        let err = ClientError::from_status(StatusCode::BAD_REQUEST, "upstream down");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn message_key_is_used_when_error_is_absent() {
        let err = ClientError::from_status(
            StatusCode::CONFLICT,
            r#"{"message": "Email already registered"}"#,
        );
        assert_eq!(err.server_message(), Some("Email already registered"));
    }

    #[test]
    fn unmapped_client_status_is_rejected() {
        let err = ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn auth_error_falls_back_when_server_is_silent() {
        let err = AuthError::from(ClientError::ServerError {
            status: 500,
            message: String::new(),
        });
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = AuthError::from(ClientError::AuthenticationFailed("Account is deactivated".into()));
        assert_eq!(err.user_message("Login failed"), "Account is deactivated");
    }
}
