//! Error type for `syllabus-client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The backend answered but declined the request. `message` is the
  /// backend's own text, suitable for display as-is.
  #[error("{message}")]
  Rejected {
    status:  StatusCode,
    message: String,
  },

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),
}

impl Error {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Rejected { status, .. } => Some(*status),
      Self::Http(e) => e.status(),
      Self::Decode(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
