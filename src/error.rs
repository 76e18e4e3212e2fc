//! Failure kinds of the fetch-and-parse pipeline.
//!
//! None of these ever reach the caller of [`crate::api::fetch_story_data`] as an
//! `Err`; they are recorded in [`crate::api::FetchReport::failure`] next to the
//! (possibly partial) list of stories.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("malformed URL {url:?}: {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("error response code: {0}")]
    Status(u16),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl FetchError {
    /// Short stage label used as a structured logging field.
    pub fn stage(&self) -> &'static str {
        match self {
            FetchError::MalformedUrl { .. } => "url",
            FetchError::Network(_) | FetchError::Status(_) => "http",
            FetchError::Json(_) | FetchError::Shape(_) => "parse",
        }
    }
}
