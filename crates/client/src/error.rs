use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// 401: the token is missing, invalid or expired. The session must be cleared.
    #[error("{0}")]
    Unauthenticated(String),

    /// 403: authenticated but not permitted. The session stays intact.
    #[error("{0}")]
    Forbidden(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("token storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ClientError::Unauthenticated(message),
            403 => ClientError::Forbidden(message),
            _ => ClientError::Api { status, message },
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::Unauthenticated(_))
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthenticated(m) | ClientError::Forbidden(m) => m.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(_) => "Unable to reach the server".to_string(),
            ClientError::Parse(_) | ClientError::Storage(_) => "Something went wrong".to_string(),
        }
    }
}
