//! Enrollment records, progress, and the presentation state derived from
//! them.
//!
//! The enrollment backend owns every [`EnrollmentRecord`]. This crate only
//! derives an [`EnrollmentState`] from a record's presence or absence and
//! reports transitions back to the caller.

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::{CourseId, UserId};

// ─── State ───────────────────────────────────────────────────────────────────

/// What the viewer of a course page should see about their enrollment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrollmentState {
  /// The viewer's identity is not established yet. Never the same thing as
  /// [`EnrollmentState::NotEnrolled`].
  #[default]
  Unknown,
  NotEnrolled,
  Enrolled { progress_percentage: u8 },
}

impl EnrollmentState {
  pub fn enrolled(progress_percentage: u8) -> Self {
    Self::Enrolled {
      progress_percentage: progress_percentage.min(100),
    }
  }

  pub fn is_enrolled(&self) -> bool { matches!(self, Self::Enrolled { .. }) }

  pub fn progress(&self) -> Option<u8> {
    match self {
      Self::Enrolled {
        progress_percentage,
      } => Some(*progress_percentage),
      _ => None,
    }
  }

  /// Short lowercase label used in logs and error messages.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Unknown => "unknown",
      Self::NotEnrolled => "not_enrolled",
      Self::Enrolled { .. } => "enrolled",
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// The relationship between one user and one course. At most one record
/// exists per `(user_id, course_id)` pair at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
  pub user_id:             UserId,
  pub course_id:           CourseId,
  /// In `[0, 100]`; never decreases while the record exists.
  #[serde(default, deserialize_with = "percentage")]
  pub progress_percentage: u8,
}

/// Completion of an enrolled course, as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
  #[serde(default, deserialize_with = "percentage")]
  pub progress_percentage: u8,
}

/// Response of an enrollment-create call. The backend may seed an initial
/// percentage; most of the time it does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEnrollment {
  #[serde(default, deserialize_with = "optional_percentage")]
  pub progress_percentage: Option<u8>,
}

/// One entry of a user's enrolled-course listing. The listing returns course
/// objects, keyed `id` by some endpoints and `courseId` by others.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnrolledCourse {
  #[serde(rename = "courseId", alias = "id")]
  pub course_id: CourseId,
}

// ─── Percentage decoding ─────────────────────────────────────────────────────

fn clamp_percentage(raw: f64) -> u8 {
  if raw.is_nan() {
    return 0;
  }
  raw.round().clamp(0.0, 100.0) as u8
}

fn percentage<'de, D: Deserializer<'de>>(de: D) -> Result<u8, D::Error> {
  Ok(optional_percentage(de)?.unwrap_or(0))
}

fn optional_percentage<'de, D: Deserializer<'de>>(
  de: D,
) -> Result<Option<u8>, D::Error> {
  Ok(Option::<f64>::deserialize(de)?.map(clamp_percentage))
}
