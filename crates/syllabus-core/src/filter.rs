//! Client-side course search and filtering.
//!
//! [`filter`] is pure: it never touches the network, never mutates its input
//! and always returns matches in the order they appeared in the input.
//! Every active constraint of a [`FilterSpec`] must hold for a course to
//! match; unset constraints match everything.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  course::{Category, Course, Difficulty},
};

// ─── FilterSpec ──────────────────────────────────────────────────────────────

/// One search/filter request.
///
/// A field that is `None` (or blank, for the string fields) imposes no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
  /// Case-insensitive substring matched against title, description and
  /// category.
  pub keyword:    Option<String>,
  /// Case-insensitive exact match against the course category.
  pub category:   Option<String>,
  /// Case-insensitive exact match against the course difficulty.
  pub difficulty: Option<String>,
  /// Exact match against the premium flag.
  pub premium:    Option<bool>,
}

impl FilterSpec {
  pub fn new() -> Self { Self::default() }

  pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
    self.keyword = Some(keyword.into());
    self
  }

  pub fn category(mut self, category: Category) -> Self {
    self.category = Some(category.to_string());
    self
  }

  pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
    self.difficulty = Some(difficulty.to_string());
    self
  }

  pub fn premium(mut self, premium: bool) -> Self {
    self.premium = Some(premium);
    self
  }

  /// `true` if no field constrains the result.
  pub fn is_unconstrained(&self) -> bool {
    Predicate::new(self).is_identity()
  }

  /// Test a single course against this spec.
  pub fn matches(&self, course: &Course) -> bool {
    Predicate::new(self).matches(course)
  }
}

/// Interpret the tri-state premium flag sent by a search form.
///
/// `""` means unset; `yes`/`true`/`1` and `no`/`false`/`0` are accepted in
/// any case.
pub fn parse_premium_flag(raw: &str) -> Result<Option<bool>> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "" => Ok(None),
    "yes" | "true" | "1" => Ok(Some(true)),
    "no" | "false" | "0" => Ok(Some(false)),
    _ => Err(Error::InvalidPremiumFlag(raw.to_owned())),
  }
}

// ─── Predicate ───────────────────────────────────────────────────────────────

/// A [`FilterSpec`] with blank fields dropped and needles lower-cased once.
struct Predicate {
  keyword:    Option<String>,
  category:   Option<String>,
  difficulty: Option<String>,
  premium:    Option<bool>,
}

impl Predicate {
  fn new(spec: &FilterSpec) -> Self {
    fn active(field: &Option<String>) -> Option<String> {
      field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
    }

    Self {
      keyword:    active(&spec.keyword),
      category:   active(&spec.category),
      difficulty: active(&spec.difficulty),
      premium:    spec.premium,
    }
  }

  fn is_identity(&self) -> bool {
    self.keyword.is_none()
      && self.category.is_none()
      && self.difficulty.is_none()
      && self.premium.is_none()
  }

  fn matches(&self, course: &Course) -> bool {
    let keyword_ok = self.keyword.as_deref().is_none_or(|kw| {
      course.title.to_lowercase().contains(kw)
        || course.description.to_lowercase().contains(kw)
        || course.category.to_lowercase().contains(kw)
    });

    keyword_ok
      && self
        .category
        .as_deref()
        .is_none_or(|c| course.category.trim().to_lowercase() == c)
      && self
        .difficulty
        .as_deref()
        .is_none_or(|d| course.difficulty.trim().to_lowercase() == d)
      && self.premium.is_none_or(|p| course.premium == p)
  }
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Return the courses that satisfy every active constraint of `spec`, in
/// input order. A missing collection is treated as empty.
pub fn filter(courses: Option<&[Course]>, spec: &FilterSpec) -> Vec<Course> {
  filter_refs(courses.unwrap_or_default(), spec)
    .into_iter()
    .cloned()
    .collect()
}

/// Borrowing variant of [`filter`] for callers that render in place.
pub fn filter_refs<'a>(courses: &'a [Course], spec: &FilterSpec) -> Vec<&'a Course> {
  let predicate = Predicate::new(spec);
  if predicate.is_identity() {
    return courses.iter().collect();
  }
  courses.iter().filter(|c| predicate.matches(c)).collect()
}
