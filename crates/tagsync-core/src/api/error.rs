use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagsApiError {
    #[error("request throttled: {0}")]
    Throttled(String),

    #[error("service error {code}: {message}")]
    Service { code: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),
}
