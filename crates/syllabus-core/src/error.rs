//! Error types for `syllabus-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid identifier: {0:?}")]
  InvalidId(String),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown difficulty: {0:?}")]
  UnknownDifficulty(String),

  #[error("invalid premium flag: {0:?} (expected true, false, 1, 0 or empty)")]
  InvalidPremiumFlag(String),

  #[error("rating must be between 1 and 5 stars, got {0}")]
  InvalidRating(u8),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of an enrollment transition.
///
/// `Clone` so a single in-flight enrollment can hand its outcome to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// No user is signed in. Prompt for login; never retried.
  #[error("please log in to continue")]
  IdentityRequired,

  /// The backend declined the operation. The message is the backend's own,
  /// unmodified.
  #[error("{0}")]
  RemoteRejected(String),

  /// The caller asked for a transition the current state does not allow.
  #[error("cannot {op} while {from}")]
  InvalidTransition {
    from: &'static str,
    op:   &'static str,
  },
}
