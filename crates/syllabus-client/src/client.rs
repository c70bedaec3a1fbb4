//! Async HTTP client wrapping the course REST API.
//!
//! | Method   | Path | Trait method |
//! |----------|------|--------------|
//! | `GET`    | `/courses` | [`CourseCatalog::list_courses`] |
//! | `GET`    | `/courses/{id}` | [`CourseCatalog::get_course`] |
//! | `GET`    | `/users/{id}/courses` | [`EnrollmentStore::list_enrolled_course_ids`] |
//! | `POST`   | `/users/{id}/courses` | [`EnrollmentStore::create`] |
//! | `DELETE` | `/users/{id}/courses/{courseId}` | [`EnrollmentStore::delete`] |
//! | `GET`    | `/users/{id}/courses/{courseId}/progress` | [`EnrollmentStore::get_progress`] |
//! | `GET`    | `/courses/{id}/ratings` | [`ReviewStore::list_reviews`] |
//! | `POST`   | `/courses/{id}/ratings` | [`ReviewStore::submit_review`] |
//! | `GET`    | `/users/{id}` | [`UserDirectory::get_user`] |
//! | `PUT`    | `/users/{id}` | [`UserDirectory::upgrade_to_premium`] |

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use syllabus_core::{
  course::Course,
  enrollment::{CreatedEnrollment, EnrolledCourse, Progress},
  filter::{FilterSpec, filter},
  id::{CourseId, UserId},
  review::{NewReview, Review},
  store::{CourseCatalog, EnrollmentStore, ReviewStore, UserDirectory},
  user::UserProfile,
};
use tracing::{debug, warn};

use crate::{
  Error, Result,
  envelope::{into_list, rejection_message, soft_failure, unwrap_envelope},
};

/// Connection settings for the course API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Bearer token attached to every request when set.
  pub token:    Option<String>,
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:5000".to_owned(),
      token:    None,
      timeout:  Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the course REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    debug!(%method, path, "api request");
    let req = self.client.request(method, self.url(path));
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req` and return the unwrapped payload. Non-2xx statuses and
  /// `"success": false` envelopes become [`Error::Rejected`].
  async fn send(&self, req: RequestBuilder) -> Result<Value> {
    let resp = req.send().await?;
    let status = resp.status();
    let path = resp.url().path().to_owned();
    let body = resp.bytes().await?;
    debug!(%status, path = %path, bytes = body.len(), "api response");

    if !status.is_success() {
      let message = rejection_message(status, &body);
      warn!(%status, path = %path, "api rejected request: {message}");
      return Err(Error::Rejected { status, message });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
      return Ok(Value::Null);
    }
    let value: Value = serde_json::from_slice(&body)?;
    if let Some(message) = soft_failure(&value) {
      warn!(%status, path = %path, "api reported failure: {message}");
      return Err(Error::Rejected { status, message });
    }
    Ok(unwrap_envelope(value))
  }

  async fn send_as<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
    Ok(serde_json::from_value(self.send(req).await?)?)
  }

  /// Send and decode a list, skipping entries that do not decode.
  async fn send_list<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>> {
    let items = into_list(self.send(req).await?);
    Ok(
      items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
          Ok(decoded) => Some(decoded),
          Err(e) => {
            warn!("skipping malformed list entry: {e}");
            None
          }
        })
        .collect(),
    )
  }

  /// Like [`Self::send_as`] but maps a 404 to `None`.
  async fn send_optional<T: DeserializeOwned>(
    &self,
    req: RequestBuilder,
  ) -> Result<Option<T>> {
    match self.send(req).await {
      Ok(Value::Null) => Ok(None),
      Ok(value) => Ok(Some(serde_json::from_value(value)?)),
      Err(Error::Rejected { status, .. }) if status == StatusCode::NOT_FOUND => {
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// `GET /courses?keyword=..&category=..&difficulty=..&Premium=..`
  ///
  /// The backend may or may not honour the query, so the response is run
  /// through the local filter engine before it is returned.
  pub async fn search(&self, spec: &FilterSpec) -> Result<Vec<Course>> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(keyword) = spec.keyword.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
      query.push(("keyword", keyword.to_owned()));
    }
    if let Some(category) = &spec.category {
      query.push(("category", category.clone()));
    }
    if let Some(difficulty) = &spec.difficulty {
      query.push(("difficulty", difficulty.clone()));
    }
    if let Some(premium) = spec.premium {
      query.push(("Premium", premium.to_string()));
    }

    let courses: Vec<Course> = self
      .send_list(self.request(Method::GET, "/courses").query(&query))
      .await?;
    Ok(filter(Some(courses.as_slice()), spec))
  }
}

// ─── CourseCatalog impl ──────────────────────────────────────────────────────

impl CourseCatalog for ApiClient {
  type Error = Error;

  async fn list_courses(&self) -> Result<Vec<Course>> {
    self.send_list(self.request(Method::GET, "/courses")).await
  }

  async fn get_course(&self, course: CourseId) -> Result<Option<Course>> {
    self
      .send_optional(self.request(Method::GET, &format!("/courses/{course}")))
      .await
  }
}

// ─── EnrollmentStore impl ────────────────────────────────────────────────────

impl EnrollmentStore for ApiClient {
  type Error = Error;

  async fn list_enrolled_course_ids(&self, user: UserId) -> Result<Vec<CourseId>> {
    let courses: Vec<EnrolledCourse> = self
      .send_list(self.request(Method::GET, &format!("/users/{user}/courses")))
      .await?;
    Ok(courses.into_iter().map(|c| c.course_id).collect())
  }

  async fn create(&self, user: UserId, course: CourseId) -> Result<CreatedEnrollment> {
    let body = self
      .send(
        self
          .request(Method::POST, &format!("/users/{user}/courses"))
          .json(&json!({ "courseId": course })),
      )
      .await?;
    // The create response carries no guaranteed shape; only a progress
    // percentage is of interest when one is present.
    Ok(serde_json::from_value(body).unwrap_or_else(|e| {
      debug!(%user, %course, "create response carries no progress: {e}");
      CreatedEnrollment::default()
    }))
  }

  async fn delete(&self, user: UserId, course: CourseId) -> Result<()> {
    self
      .send(self.request(
        Method::DELETE,
        &format!("/users/{user}/courses/{course}"),
      ))
      .await?;
    Ok(())
  }

  async fn get_progress(&self, user: UserId, course: CourseId) -> Result<Progress> {
    self
      .send_as(self.request(
        Method::GET,
        &format!("/users/{user}/courses/{course}/progress"),
      ))
      .await
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for ApiClient {
  type Error = Error;

  async fn list_reviews(&self, course: CourseId) -> Result<Vec<Review>> {
    self
      .send_list(self.request(Method::GET, &format!("/courses/{course}/ratings")))
      .await
  }

  async fn submit_review(&self, course: CourseId, review: NewReview) -> Result<Review> {
    let body = self
      .send(
        self
          .request(Method::POST, &format!("/courses/{course}/ratings"))
          .json(&review),
      )
      .await?;
    // Some deployments acknowledge with `{ "success": true }` only.
    Ok(serde_json::from_value(body).unwrap_or_else(|e| {
      debug!(%course, "review acknowledged without a record: {e}");
      Review {
        rating_id:  None,
        user_id:    review.user_id,
        course_id:  Some(course),
        stars:      review.stars,
        comment:    review.comment,
        created_at: None,
      }
    }))
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

impl UserDirectory for ApiClient {
  type Error = Error;

  async fn get_user(&self, user: UserId) -> Result<Option<UserProfile>> {
    self
      .send_optional(self.request(Method::GET, &format!("/users/{user}")))
      .await
  }

  async fn upgrade_to_premium(&self, user: UserId) -> Result<()> {
    self
      .send(
        self
          .request(Method::PUT, &format!("/users/{user}"))
          .json(&json!({ "isPremium": true })),
      )
      .await?;
    Ok(())
  }
}
