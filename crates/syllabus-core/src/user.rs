//! User profiles, as far as the course client needs them.

use serde::{Deserialize, Serialize};

use crate::{course::null_as_default, id::UserId};

/// A user account. `premium` is the entitlement checked by the enrollment
/// backend before admitting the user to a premium course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  #[serde(alias = "id")]
  pub user_id:      UserId,
  #[serde(default, alias = "username", deserialize_with = "null_as_default")]
  pub name:         String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub email:        String,
  #[serde(default, alias = "isPremium", deserialize_with = "null_as_default")]
  pub premium:      bool,
  #[serde(default, deserialize_with = "null_as_default")]
  pub total_points: u32,
}
