use thiserror::Error;

/// Failure of a single source attempt. The resolver logs these and
/// moves on to the next source; they never reach its caller.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("parse failed: {0}")]
    Parse(String),
}
