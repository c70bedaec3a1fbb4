//! Plain-text rendering of courses, enrollment state and reviews.

use std::fmt::Write as _;

use syllabus_core::{
  course::Course,
  enrollment::EnrollmentState,
  review::{Review, ReviewSummary},
  user::UserProfile,
};

const BAR_WIDTH: usize = 20;

/// One line per course: id, title, classification, premium marker.
pub fn course_line(course: &Course) -> String {
  let mut tags: Vec<&str> = [course.category.as_str(), course.difficulty.as_str()]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
  if course.premium {
    tags.push("premium");
  }
  if tags.is_empty() {
    format!("{:>4}  {}", course.course_id, course.title)
  } else {
    format!("{:>4}  {}  [{}]", course.course_id, course.title, tags.join(", "))
  }
}

pub fn course_list(courses: &[Course]) -> String {
  if courses.is_empty() {
    return "No courses match.".to_owned();
  }
  let mut out = String::new();
  for course in courses {
    let _ = writeln!(out, "{}", course_line(course));
  }
  let _ = write!(
    out,
    "{} course{}",
    courses.len(),
    if courses.len() == 1 { "" } else { "s" }
  );
  out
}

/// `[######--------------]  30%`
pub fn progress_bar(percentage: u8) -> String {
  let filled = usize::from(percentage.min(100)) * BAR_WIDTH / 100;
  format!(
    "[{}{}] {:>3}%",
    "#".repeat(filled),
    "-".repeat(BAR_WIDTH - filled),
    percentage
  )
}

pub fn enrollment(state: &EnrollmentState) -> String {
  match state {
    EnrollmentState::Unknown => "Sign in to enroll.".to_owned(),
    EnrollmentState::NotEnrolled => "Not enrolled.".to_owned(),
    EnrollmentState::Enrolled {
      progress_percentage,
    } => format!("Enrolled  {}", progress_bar(*progress_percentage)),
  }
}

pub fn course_detail(course: &Course, state: &EnrollmentState, summary: &ReviewSummary) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", course.title);
  let _ = writeln!(out, "{}", "=".repeat(course.title.chars().count()));
  if !course.description.is_empty() {
    let _ = writeln!(out, "{}\n", course.description);
  }
  let _ = writeln!(out, "Category:   {}", or_dash(&course.category));
  let _ = writeln!(out, "Difficulty: {}", or_dash(&course.difficulty));
  let _ = writeln!(out, "Premium:    {}", if course.premium { "yes" } else { "no" });
  let _ = writeln!(out, "Points:     {}", course.total_points);
  let _ = writeln!(
    out,
    "Rating:     {} ({})",
    summary.display(),
    summary.count_label()
  );
  let _ = write!(out, "\n{}", enrollment(state));
  out
}

pub fn reviews(reviews: &[Review]) -> String {
  let summary = ReviewSummary::from_reviews(reviews);
  let mut out = format!("Rating {} ({})", summary.display(), summary.count_label());
  if reviews.is_empty() {
    out.push_str("\nNo reviews yet. Be the first to review this course!");
    return out;
  }
  for review in reviews {
    let stars = "*".repeat(usize::from(review.stars.min(5)));
    let _ = write!(out, "\n\n{stars:<5}  user {}", review.user_id);
    if let Some(at) = review.created_at {
      let _ = write!(out, "  {}", at.format("%Y-%m-%d"));
    }
    if !review.comment.is_empty() {
      let _ = write!(out, "\n  {}", review.comment);
    }
  }
  out
}

pub fn profile(user: &UserProfile) -> String {
  format!(
    "user {}  {}  <{}>  {}  {} points",
    user.user_id,
    or_dash(&user.name),
    user.email,
    if user.premium { "premium" } else { "free" },
    user.total_points
  )
}

fn or_dash(s: &str) -> &str { if s.is_empty() { "-" } else { s } }

#[cfg(test)]
mod tests {
  use syllabus_core::{
    course::{Category, Difficulty},
    id::{CourseId, UserId},
  };

  use super::*;

  #[test]
  fn course_lines_show_classification() {
    let course = Course::new(5u64, "Data Science with Python")
      .with_category(Category::DataScienceAndMachineLearning)
      .with_difficulty(Difficulty::Intermediate)
      .with_premium(true);
    assert_eq!(
      course_line(&course),
      "   5  Data Science with Python  [Data Science and Machine Learning, \
       Intermediate, premium]"
    );
    assert_eq!(course_line(&Course::new(12u64, "Bare")), "  12  Bare");
  }

  #[test]
  fn empty_list_message() {
    assert_eq!(course_list(&[]), "No courses match.");
    assert!(course_list(&[Course::new(1u64, "A")]).ends_with("1 course"));
  }

  #[test]
  fn progress_bar_scales() {
    assert_eq!(progress_bar(0), "[--------------------]   0%");
    assert_eq!(progress_bar(50), "[##########----------]  50%");
    assert_eq!(progress_bar(100), "[####################] 100%");
  }

  #[test]
  fn unknown_is_not_rendered_as_not_enrolled() {
    assert_ne!(
      enrollment(&EnrollmentState::Unknown),
      enrollment(&EnrollmentState::NotEnrolled)
    );
  }

  #[test]
  fn reviews_render_summary_and_entries() {
    let out = reviews(&[Review {
      rating_id:  Some(1),
      user_id:    UserId(3),
      course_id:  Some(CourseId(1)),
      stars:      4,
      comment:    "Solid".into(),
      created_at: None,
    }]);
    assert!(out.starts_with("Rating 4.0 (1 review)"));
    assert!(out.contains("****   user 3"));
    assert!(out.contains("Solid"));
  }
}
