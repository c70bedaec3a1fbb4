//! Collaborator traits: the course catalog, the enrollment backend, reviews
//! and user profiles.
//!
//! The traits are implemented by backends (e.g. `syllabus-client` over HTTP,
//! `syllabus-store-memory` in process). The filter engine and the resolver
//! depend on this abstraction, never on a concrete backend.

use std::future::Future;

use crate::{
  course::Course,
  enrollment::{CreatedEnrollment, Progress},
  id::{CourseId, UserId},
  review::{NewReview, Review},
  user::UserProfile,
};

/// Read access to the course catalog.
///
/// All methods return `Send` futures so implementations can be driven from
/// multi-threaded async runtimes.
pub trait CourseCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the full catalog, in the backend's order.
  fn list_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  /// Fetch one course. Returns `None` if it does not exist.
  fn get_course(
    &self,
    course: CourseId,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;
}

/// The backend that owns enrollment records.
///
/// Every error is expected to carry a message fit for display: the resolver
/// passes it through to the user unchanged.
pub trait EnrollmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ids of every course `user` is currently enrolled in.
  fn list_enrolled_course_ids(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<CourseId>, Self::Error>> + Send + '_;

  /// Enroll `user` in `course`.
  ///
  /// Must fail with a descriptive error for an unknown user, a duplicate
  /// enrollment, or a premium course the user is not entitled to.
  fn create(
    &self,
    user: UserId,
    course: CourseId,
  ) -> impl Future<Output = Result<CreatedEnrollment, Self::Error>> + Send + '_;

  /// Remove the enrollment, discarding its progress.
  fn delete(
    &self,
    user: UserId,
    course: CourseId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_progress(
    &self,
    user: UserId,
    course: CourseId,
  ) -> impl Future<Output = Result<Progress, Self::Error>> + Send + '_;
}

/// Course reviews.
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn list_reviews(
    &self,
    course: CourseId,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Persist a review. Callers validate with [`NewReview::validate`] first.
  fn submit_review(
    &self,
    course: CourseId,
    review: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;
}

/// User profile lookup and the premium upgrade.
pub trait UserDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Returns `None` if the user does not exist.
  fn get_user(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + '_;

  /// Grant the premium entitlement, after which the enrollment backend
  /// admits the user to premium courses. Upgrading a premium user is a
  /// no-op.
  fn upgrade_to_premium(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
