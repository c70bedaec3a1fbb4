//! Identifier newtypes and the single normalization point for ids arriving
//! from collaborators.
//!
//! Course and user ids reach the client as JSON numbers from some endpoints
//! and as strings from others (`5` vs `"5"`). Every id that crosses into this
//! crate goes through [`RawId`], so comparisons downstream are always numeric.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Raw wire form ───────────────────────────────────────────────────────────

/// An id exactly as a collaborator sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
  Int(u64),
  Float(f64),
  Str(String),
}

impl RawId {
  /// Coerce to a numeric id. Integral floats (`5.0`) and numeric strings
  /// (`" 5 "`) are accepted; anything else is [`Error::InvalidId`].
  pub fn normalize(&self) -> Result<u64> {
    match self {
      Self::Int(n) => Ok(*n),
      Self::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64 => {
        Ok(*f as u64)
      }
      Self::Float(f) => Err(Error::InvalidId(f.to_string())),
      Self::Str(s) => normalize_str(s),
    }
  }
}

/// Parse a textual id, tolerating surrounding whitespace.
pub fn normalize_str(raw: &str) -> Result<u64> {
  raw
    .trim()
    .parse::<u64>()
    .map_err(|_| Error::InvalidId(raw.to_owned()))
}

/// Build an enrolled-course set from raw ids. Entries that are not numeric
/// are dropped with a warning rather than failing the whole listing.
pub fn normalize_membership<I>(raw: I) -> HashSet<CourseId>
where
  I: IntoIterator<Item = RawId>,
{
  raw
    .into_iter()
    .filter_map(|id| match CourseId::try_from(id) {
      Ok(id) => Some(id),
      Err(e) => {
        tracing::warn!("skipping enrolled course with {e}");
        None
      }
    })
    .collect()
}

// ─── Newtypes ────────────────────────────────────────────────────────────────

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
      Deserialize,
    )]
    #[serde(try_from = "RawId", into = "u64")]
    pub struct $name(pub u64);

    impl $name {
      pub fn get(self) -> u64 { self.0 }
    }

    impl TryFrom<RawId> for $name {
      type Error = Error;

      fn try_from(raw: RawId) -> Result<Self> { raw.normalize().map(Self) }
    }

    impl From<u64> for $name {
      fn from(n: u64) -> Self { Self(n) }
    }

    impl From<$name> for u64 {
      fn from(id: $name) -> u64 { id.0 }
    }

    impl FromStr for $name {
      type Err = Error;

      fn from_str(s: &str) -> Result<Self> { normalize_str(s).map(Self) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  };
}

id_type! {
  /// Unique, immutable identifier of a course.
  CourseId
}

id_type! {
  /// Identifier of a user account.
  UserId
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numbers_and_strings_normalize_to_the_same_id() {
    let a: CourseId = serde_json::from_str("5").unwrap();
    let b: CourseId = serde_json::from_str("\"5\"").unwrap();
    let c: CourseId = serde_json::from_str("5.0").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.get(), 5);
  }

  #[test]
  fn whitespace_around_textual_ids_is_tolerated() {
    assert_eq!(" 12 ".parse::<UserId>().unwrap(), UserId(12));
  }

  #[test]
  fn non_numeric_ids_are_rejected() {
    assert!(serde_json::from_str::<CourseId>("\"abc\"").is_err());
    assert!(serde_json::from_str::<CourseId>("1.5").is_err());
    assert!(serde_json::from_str::<CourseId>("-3").is_err());
    assert!(matches!("".parse::<CourseId>(), Err(Error::InvalidId(_))));
  }

  #[test]
  fn membership_sets_mix_strings_and_numbers() {
    let set = normalize_membership(vec![
      RawId::Str("5".into()),
      RawId::Int(7),
      RawId::Str("bogus".into()),
    ]);
    assert_eq!(set.len(), 2);
    assert!(set.contains(&CourseId(5)));
    assert!(set.contains(&CourseId(7)));
  }

  #[test]
  fn ids_serialize_as_plain_numbers() {
    let json = serde_json::to_string(&CourseId(7)).unwrap();
    assert_eq!(json, "7");
  }
}
