use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid tag '{input}': {reason}")]
    InvalidTag { input: String, reason: &'static str },
}

pub type ModelResult<T> = Result<T, ModelError>;
