//! Subcommands and their execution against any backend.

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use strum::IntoEnumIterator;
use syllabus_client::ApiClient;
use syllabus_core::{
  ResolveError,
  course::{Category, Difficulty},
  enrollment::EnrollmentState,
  filter::{FilterSpec, filter, parse_premium_flag},
  id::{CourseId, UserId},
  resolver::EnrollmentStateResolver,
  review::{NewReview, ReviewSummary},
  store::{CourseCatalog, EnrollmentStore, ReviewStore, UserDirectory},
};
use tracing::info;

use crate::render;

/// Everything a command may need from a backend.
pub trait Backend:
  CourseCatalog + EnrollmentStore + ReviewStore + UserDirectory + 'static
{
}

impl<T> Backend for T where
  T: CourseCatalog + EnrollmentStore + ReviewStore + UserDirectory + 'static
{
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// List courses, optionally filtered.
  Search(SearchArgs),
  /// Show one course with its rating and your enrollment.
  Show { course: CourseId },
  /// Enroll in a course.
  Enroll { course: CourseId },
  /// Withdraw from a course. Progress is discarded.
  Withdraw {
    course: CourseId,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes:    bool,
  },
  /// Show your progress in a course.
  Progress { course: CourseId },
  /// List the reviews of a course.
  Reviews { course: CourseId },
  /// Review a course.
  Review {
    course:  CourseId,
    /// Rating from 1 to 5.
    #[arg(short, long)]
    stars:   u8,
    #[arg(short, long, default_value = "")]
    comment: String,
  },
  /// List the courses you are enrolled in.
  MyCourses,
  /// Show the signed-in user.
  Whoami,
  /// Upgrade the signed-in user to premium.
  Upgrade,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
  /// Case-insensitive substring of the title, description or category.
  #[arg(short, long)]
  keyword:    Option<String>,
  #[arg(long)]
  category:   Option<String>,
  #[arg(long)]
  difficulty: Option<String>,
  /// `yes`, `no`, or empty for either.
  #[arg(long)]
  premium:    Option<String>,
}

impl SearchArgs {
  /// Validate the arguments into a filter.
  pub fn spec(&self) -> Result<FilterSpec> {
    let mut spec = FilterSpec::new();
    if let Some(keyword) = &self.keyword {
      spec = spec.keyword(keyword.as_str());
    }
    if let Some(raw) = non_blank(&self.category) {
      let category: Category = raw.parse().map_err(|_| {
        anyhow::anyhow!("unknown category {raw:?}; expected one of: {}", options::<Category>())
      })?;
      spec = spec.category(category);
    }
    if let Some(raw) = non_blank(&self.difficulty) {
      let difficulty: Difficulty = raw.parse().map_err(|_| {
        anyhow::anyhow!(
          "unknown difficulty {raw:?}; expected one of: {}",
          options::<Difficulty>()
        )
      })?;
      spec = spec.difficulty(difficulty);
    }
    if let Some(raw) = &self.premium
      && let Some(premium) = parse_premium_flag(raw)?
    {
      spec = spec.premium(premium);
    }
    Ok(spec)
  }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
  field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn options<E: IntoEnumIterator + AsRef<str>>() -> String {
  E::iter()
    .map(|e| e.as_ref().to_owned())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Search through the API, letting the server narrow the listing first.
pub async fn search_api(client: &ApiClient, args: &SearchArgs) -> Result<String> {
  let courses = client.search(&args.spec()?).await?;
  Ok(render::course_list(&courses))
}

/// Asked before a destructive action; returns whether to go ahead.
pub type Confirm<'a> = &'a mut dyn FnMut(&str) -> Result<bool>;

/// Run one command and return what should be printed.
pub async fn run<B: Backend>(
  backend: Arc<B>,
  user: Option<UserId>,
  command: Command,
  confirm: Confirm<'_>,
) -> Result<String> {
  let resolver = EnrollmentStateResolver::new(Arc::clone(&backend));

  match command {
    Command::Search(args) => {
      let courses = backend.list_courses().await?;
      Ok(render::course_list(&filter(Some(courses.as_slice()), &args.spec()?)))
    }

    Command::Show { course } => {
      let found = find_course(&*backend, course).await?;
      let state = resolver.load(user, course).await?;
      let reviews = backend.list_reviews(course).await?;
      Ok(render::course_detail(
        &found,
        &state,
        &ReviewSummary::from_reviews(&reviews),
      ))
    }

    Command::Enroll { course } => {
      let found = find_course(&*backend, course).await?;
      resolver.load(user, course).await.map_err(sign_in_hint)?;
      let state = resolver.enroll(user, course).await.map_err(sign_in_hint)?;
      info!(?user, %course, "enrolled");
      Ok(format!("Enrolled in \"{}\".\n{}", found.title, render::enrollment(&state)))
    }

    Command::Withdraw { course, yes } => {
      let found = find_course(&*backend, course).await?;
      let state = resolver.load(user, course).await.map_err(sign_in_hint)?;
      if user.is_some() && state.is_enrolled() && !yes {
        let prompt = format!(
          "Are you sure you want to withdraw from \"{}\"? Your progress will be lost.",
          found.title
        );
        if !confirm(&prompt)? {
          return Ok("Cancelled.".to_owned());
        }
      }
      resolver.withdraw(user, course).await.map_err(sign_in_hint)?;
      info!(?user, %course, "withdrawn");
      Ok(format!("Withdrawn from \"{}\".", found.title))
    }

    Command::Progress { course } => {
      let state = resolver.load(user, course).await.map_err(sign_in_hint)?;
      match state {
        EnrollmentState::Unknown => Err(sign_in_hint(ResolveError::IdentityRequired)),
        state => Ok(render::enrollment(&state)),
      }
    }

    Command::Reviews { course } => {
      let reviews = backend.list_reviews(course).await?;
      Ok(render::reviews(&reviews))
    }

    Command::Review {
      course,
      stars,
      comment,
    } => {
      let user = user.ok_or(ResolveError::IdentityRequired).map_err(sign_in_hint)?;
      let review = NewReview::new(user, stars, comment);
      review.validate()?;
      backend.submit_review(course, review).await?;
      Ok("Thank you for your review!".to_owned())
    }

    Command::MyCourses => {
      let user = user.ok_or(ResolveError::IdentityRequired).map_err(sign_in_hint)?;
      let mut ids = backend.list_enrolled_course_ids(user).await?;
      ids.sort();
      ids.dedup();
      if ids.is_empty() {
        return Ok("You are not enrolled in any course.".to_owned());
      }
      let mut lines = Vec::with_capacity(ids.len());
      for id in ids {
        let progress = backend
          .get_progress(user, id)
          .await
          .map(|p| p.progress_percentage)
          .unwrap_or(0);
        let title = match backend.get_course(id).await? {
          Some(course) => course.title,
          None => format!("course {id}"),
        };
        lines.push(format!("{:>4}  {}  {title}", id, render::progress_bar(progress)));
      }
      Ok(lines.join("\n"))
    }

    Command::Upgrade => {
      let user = user.ok_or(ResolveError::IdentityRequired).map_err(sign_in_hint)?;
      backend.upgrade_to_premium(user).await?;
      info!(%user, "upgraded to premium");
      let profile = backend
        .get_user(user)
        .await?
        .with_context(|| format!("user {user} does not exist"))?;
      Ok(format!("You are now premium!\n{}", render::profile(&profile)))
    }

    Command::Whoami => match user {
      None => Ok("Not signed in.".to_owned()),
      Some(id) => match backend.get_user(id).await? {
        Some(profile) => Ok(render::profile(&profile)),
        None => bail!("user {id} does not exist"),
      },
    },
  }
}

async fn find_course<B: CourseCatalog>(
  backend: &B,
  course: CourseId,
) -> Result<syllabus_core::course::Course> {
  backend
    .get_course(course)
    .await?
    .with_context(|| format!("course {course} does not exist"))
}

fn sign_in_hint(err: ResolveError) -> anyhow::Error {
  match err {
    ResolveError::IdentityRequired => anyhow::Error::new(err)
      .context("pass --user <ID> or set user_id in config.toml"),
    other => other.into(),
  }
}

#[cfg(test)]
mod tests {
  use syllabus_store_memory::MemoryStore;

  use super::*;

  const FREE: Option<UserId> = Some(UserId(1));

  fn yes() -> impl FnMut(&str) -> Result<bool> { |_| Ok(true) }

  async fn exec(store: &Arc<MemoryStore>, user: Option<UserId>, command: Command) -> Result<String> {
    run(Arc::clone(store), user, command, &mut yes()).await
  }

  #[test]
  fn search_args_validate() {
    let args = SearchArgs {
      keyword:    Some("python".into()),
      category:   Some("programming".into()),
      difficulty: Some(" ".into()),
      premium:    Some("".into()),
    };
    let spec = args.spec().unwrap();
    assert_eq!(spec.keyword.as_deref(), Some("python"));
    assert_eq!(spec.category.as_deref(), Some("Programming"));
    assert_eq!(spec.difficulty, None);
    assert_eq!(spec.premium, None);

    let bad = SearchArgs {
      category: Some("Cooking".into()),
      ..SearchArgs::default()
    };
    let err = bad.spec().unwrap_err().to_string();
    assert!(err.contains("Digital Marketing"), "{err}");

    let bad = SearchArgs {
      premium: Some("maybe".into()),
      ..SearchArgs::default()
    };
    assert!(bad.spec().is_err());
  }

  #[tokio::test]
  async fn search_filters_demo_catalog() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    let out = exec(
      &store,
      None,
      Command::Search(SearchArgs {
        keyword: Some("PYTHON".into()),
        ..SearchArgs::default()
      }),
    )
    .await
    .unwrap();
    assert!(out.ends_with("2 courses"), "{out}");
  }

  #[tokio::test]
  async fn enroll_then_withdraw() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    let out = exec(&store, FREE, Command::Enroll { course: CourseId(1) }).await.unwrap();
    assert!(out.starts_with("Enrolled in"), "{out}");

    let out = exec(&store, FREE, Command::MyCourses).await.unwrap();
    assert!(out.contains("0%"), "{out}");

    let out = exec(&store, FREE, Command::Withdraw {
      course: CourseId(1),
      yes:    false,
    })
    .await
    .unwrap();
    assert!(out.starts_with("Withdrawn"), "{out}");
    assert!(store.list_enrolled_course_ids(UserId(1)).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn declined_withdraw_keeps_enrollment() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    exec(&store, FREE, Command::Enroll { course: CourseId(1) }).await.unwrap();

    let mut prompts = Vec::new();
    let mut decline = |p: &str| {
      prompts.push(p.to_owned());
      Ok::<_, anyhow::Error>(false)
    };
    let out = run(
      Arc::clone(&store),
      FREE,
      Command::Withdraw {
        course: CourseId(1),
        yes:    false,
      },
      &mut decline,
    )
    .await
    .unwrap();
    assert_eq!(out, "Cancelled.");
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Your progress will be lost."));
    assert_eq!(
      store.list_enrolled_course_ids(UserId(1)).await.unwrap(),
      vec![CourseId(1)]
    );
  }

  #[tokio::test]
  async fn signed_out_enroll_asks_for_identity() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    let err = exec(&store, None, Command::Enroll { course: CourseId(1) })
      .await
      .unwrap_err();
    assert!(err.to_string().contains("--user"));
    assert!(
      err
        .chain()
        .any(|e| e.to_string() == "please log in to continue")
    );
  }

  #[tokio::test]
  async fn premium_gate_message_reaches_the_user() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    let err = exec(&store, FREE, Command::Enroll { course: CourseId(2) })
      .await
      .unwrap_err();
    assert_eq!(
      err.to_string(),
      "\"Advanced React Patterns\" is a premium course. Upgrade your account to enroll."
    );
  }

  #[tokio::test]
  async fn review_and_list() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    exec(&store, FREE, Command::Review {
      course:  CourseId(4),
      stars:   3,
      comment: "Fine".into(),
    })
    .await
    .unwrap();

    let out = exec(&store, None, Command::Reviews { course: CourseId(4) }).await.unwrap();
    assert!(out.starts_with("Rating 3.0 (1 review)"), "{out}");

    let err = exec(&store, FREE, Command::Review {
      course:  CourseId(4),
      stars:   6,
      comment: String::new(),
    })
    .await;
    assert!(err.is_err());
  }

  #[tokio::test]
  async fn missing_course_is_reported() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    let err = exec(&store, FREE, Command::Show { course: CourseId(99) })
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "course 99 does not exist");
  }

  #[tokio::test]
  async fn upgrade_unlocks_premium_enrollment() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    assert!(
      exec(&store, FREE, Command::Enroll { course: CourseId(2) })
        .await
        .is_err()
    );

    let out = exec(&store, FREE, Command::Upgrade).await.unwrap();
    assert!(out.starts_with("You are now premium!"), "{out}");

    let out = exec(&store, FREE, Command::Enroll { course: CourseId(2) }).await.unwrap();
    assert!(out.starts_with("Enrolled in \"Advanced React Patterns\""), "{out}");
    assert!(exec(&store, None, Command::Upgrade).await.is_err());
  }

  #[tokio::test]
  async fn whoami_reports_profile() {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    assert_eq!(exec(&store, None, Command::Whoami).await.unwrap(), "Not signed in.");
    let out = exec(&store, Some(UserId(2)), Command::Whoami).await.unwrap();
    assert!(out.contains("premium"), "{out}");
  }
}
