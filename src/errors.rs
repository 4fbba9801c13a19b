use reqwest::StatusCode;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("habit was already completed on that day")]
    AlreadyCompleted,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Maps a non-2xx status and its server message onto the taxonomy.
    ///
    /// A 409 stays an [`ClientError::Api`] here; only the mark-complete call
    /// knows that a conflict means the day was already completed.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Api { status, message },
        }
    }

    /// Reads a conflict from the mark-complete endpoint as a duplicate day.
    pub fn into_completion_conflict(self) -> Self {
        match self {
            Self::Api {
                status: StatusCode::CONFLICT,
                ..
            } => Self::AlreadyCompleted,
            other => other,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::AlreadyCompleted => Some(StatusCode::CONFLICT),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Network(err) => err.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
