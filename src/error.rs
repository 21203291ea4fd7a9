use thiserror::Error;

/// Failure modes of a single translation attempt
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    /// Input was empty after trimming
    #[error("Empty text provided")]
    EmptyText,

    /// Connection, TLS or body read failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Remote answered with a non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Body was not the JSON shape the provider expects
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    /// Remote answered 200 but flagged the translation as failed in its payload
    #[error("Translation failed ({status}): {details}")]
    Rejected { status: i64, details: String },

    #[error("Unknown translation provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Coarse classification used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Input,
    Transport,
    Semantic,
    Config,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Input => "input",
            FailureKind::Transport => "transport",
            FailureKind::Semantic => "semantic",
            FailureKind::Config => "config",
        }
    }
}

impl TranslateError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TranslateError::EmptyText => FailureKind::Input,
            TranslateError::Transport(_)
            | TranslateError::HttpStatus(_)
            | TranslateError::MalformedResponse(_) => FailureKind::Transport,
            TranslateError::Rejected { .. } => FailureKind::Semantic,
            TranslateError::UnknownProvider(_) | TranslateError::InvalidUrl(_) => {
                FailureKind::Config
            }
        }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TranslateError::HttpStatus(status.as_u16()),
            None if err.is_decode() => TranslateError::MalformedResponse(err.to_string()),
            None => TranslateError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        TranslateError::MalformedResponse(err.to_string())
    }
}

impl From<url::ParseError> for TranslateError {
    fn from(err: url::ParseError) -> Self {
        TranslateError::InvalidUrl(err.to_string())
    }
}
