//! [`MemoryStore`]: the in-process implementation of the collaborator
//! traits.

use std::{
  collections::{BTreeMap, HashMap},
  sync::Arc,
};

use chrono::Utc;
use syllabus_core::{
  course::Course,
  enrollment::{CreatedEnrollment, Progress},
  id::{CourseId, UserId},
  review::{NewReview, Review},
  store::{CourseCatalog, EnrollmentStore, ReviewStore, UserDirectory},
  user::UserProfile,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
  Error, Result,
  seed::{demo_courses, demo_users},
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
  /// Catalog order is insertion order.
  courses:        Vec<Course>,
  users:          HashMap<UserId, UserProfile>,
  /// Progress percentage per enrolled pair.
  enrollments:    BTreeMap<(UserId, CourseId), u8>,
  reviews:        Vec<Review>,
  /// Last rating id handed out.
  next_rating_id: u64,
}

impl State {
  fn course(&self, id: CourseId) -> Option<&Course> {
    self.courses.iter().find(|c| c.course_id == id)
  }

  fn require_user(&self, id: UserId) -> Result<&UserProfile> {
    self.users.get(&id).ok_or(Error::UserNotFound(id))
  }

  fn require_course(&self, id: CourseId) -> Result<&Course> {
    self.course(id).ok_or(Error::CourseNotFound(id))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A course backend held entirely in memory.
///
/// Cloning is cheap: clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
  state: Arc<RwLock<State>>,
}

impl MemoryStore {
  /// An empty store.
  pub fn new() -> Self { Self::default() }

  /// A store seeded with [`demo_courses`] and [`demo_users`].
  pub fn with_demo_catalog() -> Self {
    let users = demo_users()
      .into_iter()
      .map(|u| (u.user_id, u))
      .collect();
    let state = State {
      courses: demo_courses(),
      users,
      ..State::default()
    };
    Self {
      state: Arc::new(RwLock::new(state)),
    }
  }

  /// Add or replace a course, keeping its catalog position on replace.
  pub async fn put_course(&self, course: Course) {
    let mut state = self.state.write().await;
    match state.courses.iter().position(|c| c.course_id == course.course_id) {
      Some(i) => state.courses[i] = course,
      None => state.courses.push(course),
    }
  }

  /// Add or replace a user profile.
  pub async fn put_user(&self, user: UserProfile) {
    self.state.write().await.users.insert(user.user_id, user);
  }

  /// Record learning progress for an enrolled pair.
  ///
  /// Progress never decreases while enrolled: a lower value than the
  /// current one is ignored. Values above 100 are capped.
  pub async fn record_progress(
    &self,
    user: UserId,
    course: CourseId,
    percentage: u8,
  ) -> Result<u8> {
    let mut state = self.state.write().await;
    let current = state
      .enrollments
      .get_mut(&(user, course))
      .ok_or(Error::NotEnrolled { user, course })?;
    *current = (*current).max(percentage.min(100));
    Ok(*current)
  }
}

// ─── CourseCatalog impl ──────────────────────────────────────────────────────

impl CourseCatalog for MemoryStore {
  type Error = Error;

  async fn list_courses(&self) -> Result<Vec<Course>> {
    Ok(self.state.read().await.courses.clone())
  }

  async fn get_course(&self, course: CourseId) -> Result<Option<Course>> {
    Ok(self.state.read().await.course(course).cloned())
  }
}

// ─── EnrollmentStore impl ────────────────────────────────────────────────────

impl EnrollmentStore for MemoryStore {
  type Error = Error;

  async fn list_enrolled_course_ids(&self, user: UserId) -> Result<Vec<CourseId>> {
    let state = self.state.read().await;
    state.require_user(user)?;
    Ok(
      state
        .enrollments
        .range((user, CourseId(0))..=(user, CourseId(u64::MAX)))
        .map(|((_, course), _)| *course)
        .collect(),
    )
  }

  async fn create(&self, user: UserId, course: CourseId) -> Result<CreatedEnrollment> {
    let mut state = self.state.write().await;
    let profile = state.require_user(user)?;
    let record = state.require_course(course)?;
    if record.premium && !profile.premium {
      return Err(Error::PremiumRequired(record.title.clone()));
    }
    if state.enrollments.contains_key(&(user, course)) {
      return Err(Error::AlreadyEnrolled { user, course });
    }

    state.enrollments.insert((user, course), 0);
    debug!(%user, %course, "enrollment created");
    Ok(CreatedEnrollment {
      progress_percentage: Some(0),
    })
  }

  async fn delete(&self, user: UserId, course: CourseId) -> Result<()> {
    let mut state = self.state.write().await;
    state
      .enrollments
      .remove(&(user, course))
      .ok_or(Error::NotEnrolled { user, course })?;
    debug!(%user, %course, "enrollment deleted");
    Ok(())
  }

  async fn get_progress(&self, user: UserId, course: CourseId) -> Result<Progress> {
    let state = self.state.read().await;
    let progress_percentage = *state
      .enrollments
      .get(&(user, course))
      .ok_or(Error::NotEnrolled { user, course })?;
    Ok(Progress {
      progress_percentage,
    })
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for MemoryStore {
  type Error = Error;

  async fn list_reviews(&self, course: CourseId) -> Result<Vec<Review>> {
    let state = self.state.read().await;
    Ok(
      state
        .reviews
        .iter()
        .filter(|r| r.course_id == Some(course))
        .cloned()
        .collect(),
    )
  }

  async fn submit_review(&self, course: CourseId, review: NewReview) -> Result<Review> {
    review.validate()?;
    let mut state = self.state.write().await;
    state.require_user(review.user_id)?;
    state.require_course(course)?;

    state.next_rating_id += 1;
    let stored = Review {
      rating_id:  Some(state.next_rating_id),
      user_id:    review.user_id,
      course_id:  Some(course),
      stars:      review.stars,
      comment:    review.comment,
      created_at: Some(Utc::now()),
    };
    state.reviews.push(stored.clone());
    Ok(stored)
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

impl UserDirectory for MemoryStore {
  type Error = Error;

  async fn get_user(&self, user: UserId) -> Result<Option<UserProfile>> {
    Ok(self.state.read().await.users.get(&user).cloned())
  }

  async fn upgrade_to_premium(&self, user: UserId) -> Result<()> {
    let mut state = self.state.write().await;
    let profile = state.users.get_mut(&user).ok_or(Error::UserNotFound(user))?;
    if !profile.premium {
      profile.premium = true;
      debug!(%user, "upgraded to premium");
    }
    Ok(())
  }
}
