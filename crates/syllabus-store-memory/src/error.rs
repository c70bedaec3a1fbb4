//! Error type for `syllabus-store-memory`.
//!
//! Messages are shown to the user verbatim by the resolver, so they read as
//! sentences rather than codes.

use syllabus_core::id::{CourseId, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] syllabus_core::Error),

  #[error("user {0} not found")]
  UserNotFound(UserId),

  #[error("course {0} not found")]
  CourseNotFound(CourseId),

  #[error("user {user} is already enrolled in course {course}")]
  AlreadyEnrolled { user: UserId, course: CourseId },

  #[error("user {user} is not enrolled in course {course}")]
  NotEnrolled { user: UserId, course: CourseId },

  #[error("\"{0}\" is a premium course. Upgrade your account to enroll.")]
  PremiumRequired(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
