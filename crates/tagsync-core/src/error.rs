use thiserror::Error;

use tagsync_model::ModelError;

use crate::api::TagsApiError;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Remote tagging call failed; the API error is passed through as is.
    #[error(transparent)]
    Api(#[from] TagsApiError),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("invalid tag configuration: {0}")]
    Config(String),
}
