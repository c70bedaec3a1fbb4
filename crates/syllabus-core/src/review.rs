//! Course reviews and their aggregate rating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  course::null_as_default,
  id::{CourseId, UserId},
};

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// A stored review of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  #[serde(default)]
  pub rating_id:  Option<u64>,
  pub user_id:    UserId,
  #[serde(default)]
  pub course_id:  Option<CourseId>,
  pub stars:      u8,
  #[serde(default, deserialize_with = "null_as_default")]
  pub comment:    String,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

/// Input to [`crate::store::ReviewStore::submit_review`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
  pub user_id: UserId,
  pub stars:   u8,
  pub comment: String,
}

impl NewReview {
  pub fn new(user_id: UserId, stars: u8, comment: impl Into<String>) -> Self {
    Self {
      user_id,
      stars,
      comment: comment.into(),
    }
  }

  /// Reject ratings outside one to five stars. The comment is optional.
  pub fn validate(&self) -> Result<()> {
    if (MIN_STARS..=MAX_STARS).contains(&self.stars) {
      Ok(())
    } else {
      Err(Error::InvalidRating(self.stars))
    }
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Count and mean star rating over a set of reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewSummary {
  pub count:   usize,
  /// `None` when there are no reviews.
  pub average: Option<f64>,
}

impl ReviewSummary {
  pub fn from_reviews(reviews: &[Review]) -> Self {
    if reviews.is_empty() {
      return Self::default();
    }
    let total: u64 = reviews.iter().map(|r| u64::from(r.stars)).sum();
    Self {
      count:   reviews.len(),
      average: Some(total as f64 / reviews.len() as f64),
    }
  }

  /// The mean to one decimal place, or `"N/A"`.
  pub fn display(&self) -> String {
    match self.average {
      Some(avg) => format!("{avg:.1}"),
      None => "N/A".to_owned(),
    }
  }

  /// `"1 review"` / `"3 reviews"`.
  pub fn count_label(&self) -> String {
    match self.count {
      1 => "1 review".to_owned(),
      n => format!("{n} reviews"),
    }
  }
}
