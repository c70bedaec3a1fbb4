//! Course records and the closed enumerations used to classify them.
//!
//! A [`Course`] is owned by the catalog backend; this crate only reads it.
//! Records coming off the wire are often incomplete, so every display string
//! tolerates `null` or a missing key and reads as `""`.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::id::CourseId;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The subject area a course belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  Serialize,
  Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
  Programming,
  #[strum(serialize = "Digital Marketing")]
  #[serde(rename = "Digital Marketing")]
  DigitalMarketing,
  #[strum(serialize = "Project Management")]
  #[serde(rename = "Project Management")]
  ProjectManagement,
  #[strum(serialize = "Economics and Finance")]
  #[serde(rename = "Economics and Finance")]
  EconomicsAndFinance,
  #[strum(serialize = "Data Science and Machine Learning")]
  #[serde(rename = "Data Science and Machine Learning")]
  DataScienceAndMachineLearning,
}

/// How demanding a course is.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  Serialize,
  Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

// ─── Course ──────────────────────────────────────────────────────────────────

/// One learnable unit, as served by the course catalog.
///
/// `category` and `difficulty` are kept as the raw strings the backend sent;
/// use [`Course::category_kind`] and [`Course::difficulty_kind`] to classify
/// them against the closed enumerations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
  pub course_id:    CourseId,
  #[serde(default, deserialize_with = "null_as_default")]
  pub title:        String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub description:  String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub category:     String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub difficulty:   String,
  /// Enrollment in a premium course requires a premium account. The gate is
  /// enforced by the enrollment backend, not here.
  #[serde(default, deserialize_with = "null_as_default")]
  pub premium:      bool,
  /// Awarded on completion; never computed by the client.
  #[serde(default, deserialize_with = "null_as_default")]
  pub total_points: u32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub course_image: String,
}

impl Course {
  /// Convenience constructor for a course with only an id and a title.
  pub fn new(course_id: impl Into<CourseId>, title: impl Into<String>) -> Self {
    Self {
      course_id:    course_id.into(),
      title:        title.into(),
      description:  String::new(),
      category:     String::new(),
      difficulty:   String::new(),
      premium:      false,
      total_points: 0,
      course_image: String::new(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn with_category(mut self, category: Category) -> Self {
    self.category = category.to_string();
    self
  }

  pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
    self.difficulty = difficulty.to_string();
    self
  }

  pub fn with_premium(mut self, premium: bool) -> Self {
    self.premium = premium;
    self
  }

  pub fn with_total_points(mut self, total_points: u32) -> Self {
    self.total_points = total_points;
    self
  }

  pub fn category_kind(&self) -> Option<Category> { self.category.parse().ok() }

  pub fn difficulty_kind(&self) -> Option<Difficulty> {
    self.difficulty.parse().ok()
  }
}

/// Deserialize `null` as the type's default instead of failing.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
