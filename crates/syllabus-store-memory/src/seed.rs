//! The demo catalog and accounts used for offline runs.

use syllabus_core::{
  course::{Category, Course, Difficulty},
  id::UserId,
  user::UserProfile,
};

fn course(
  id: u64,
  title: &str,
  description: &str,
  category: Category,
  difficulty: Difficulty,
  premium: bool,
  total_points: u32,
) -> Course {
  Course::new(id, title)
    .with_description(description)
    .with_category(category)
    .with_difficulty(difficulty)
    .with_premium(premium)
    .with_total_points(total_points)
}

/// Ten courses spanning every category and difficulty.
pub fn demo_courses() -> Vec<Course> {
  use Category::*;
  use Difficulty::*;

  vec![
    course(
      1,
      "Introduction to Python Programming",
      "Learn Python basics including variables, loops, and functions",
      Programming,
      Beginner,
      false,
      100,
    ),
    course(
      2,
      "Advanced React Patterns",
      "Master hooks, context, performance optimization, and design patterns in React",
      Programming,
      Advanced,
      true,
      200,
    ),
    course(
      3,
      "Digital Marketing 101",
      "Learn SEO, PPC advertising, and social media marketing fundamentals",
      DigitalMarketing,
      Beginner,
      false,
      80,
    ),
    course(
      4,
      "Project Management Essentials",
      "Master Agile and Scrum methodologies for effective project delivery",
      ProjectManagement,
      Intermediate,
      false,
      120,
    ),
    course(
      5,
      "Data Science with Python",
      "Learn Pandas, NumPy, scikit-learn, and machine learning basics",
      DataScienceAndMachineLearning,
      Intermediate,
      true,
      220,
    ),
    course(
      6,
      "Economics Basics",
      "Understanding microeconomics and macroeconomics principles",
      EconomicsAndFinance,
      Beginner,
      false,
      70,
    ),
    course(
      7,
      "JavaScript Fundamentals",
      "Core JavaScript concepts for web development",
      Programming,
      Beginner,
      false,
      110,
    ),
    course(
      8,
      "Advanced Financial Analysis",
      "Deep dive into financial modeling and investment strategies",
      EconomicsAndFinance,
      Advanced,
      true,
      250,
    ),
    course(
      9,
      "Content Marketing Strategy",
      "Create compelling content that drives engagement and conversions",
      DigitalMarketing,
      Intermediate,
      false,
      130,
    ),
    course(
      10,
      "Machine Learning Algorithms",
      "Deep learning, neural networks, and advanced ML techniques",
      DataScienceAndMachineLearning,
      Advanced,
      true,
      280,
    ),
  ]
}

/// A free account (user 1) and a premium account (user 2).
pub fn demo_users() -> Vec<UserProfile> {
  vec![
    UserProfile {
      user_id:      UserId(1),
      name:         "Demo Learner".into(),
      email:        "learner@example.com".into(),
      premium:      false,
      total_points: 0,
    },
    UserProfile {
      user_id:      UserId(2),
      name:         "Premium Learner".into(),
      email:        "premium@example.com".into(),
      premium:      true,
      total_points: 0,
    },
  ]
}
