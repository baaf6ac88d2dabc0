use actix_web::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Response body for a missing or malformed `Authorization` header
pub const MSG_MISSING_CREDENTIAL: &str = "Missing or invalid Authorization header";
/// Response body for every verification failure
pub const MSG_INVALID_TOKEN: &str = "Invalid token";
/// Response body for a role check failure
pub const MSG_ADMIN_REQUIRED: &str = "Admin access required";

/// Gateway failure taxonomy.
///
/// The `Display` text carries the cause for logs. Clients only ever see
/// [`AuthError::public_message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredential,

    #[error("malformed Authorization header")]
    MalformedCredential,

    #[error("no signing key for kid={kid}")]
    KeyNotFound { kid: String },

    #[error("failed to fetch signing keys: {0}")]
    KeyFetchFailed(String),

    #[error("token rejected: {0}")]
    InvalidToken(String),

    #[error("role {actual} lacks {required} access")]
    InsufficientRole { required: String, actual: String },
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential | AuthError::MalformedCredential => {
                MSG_MISSING_CREDENTIAL
            }
            AuthError::KeyNotFound { .. }
            | AuthError::KeyFetchFailed(_)
            | AuthError::InvalidToken(_) => MSG_INVALID_TOKEN,
            AuthError::InsufficientRole { .. } => MSG_ADMIN_REQUIRED,
        }
    }

    /// Label used for the gateway decision counter
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthError::MissingCredential | AuthError::MalformedCredential => "missing_credential",
            AuthError::KeyNotFound { .. } => "unknown_key",
            AuthError::KeyFetchFailed(_) => "key_fetch_failed",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::InsufficientRole { .. } => "forbidden",
        }
    }
}
