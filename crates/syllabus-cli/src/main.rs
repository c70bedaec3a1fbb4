//! `syllabus`: command-line client for the course catalog.
//!
//! # Usage
//!
//! ```text
//! syllabus search --keyword python --difficulty beginner
//! syllabus --user 1 enroll 3
//! syllabus --offline --user 1 my-courses
//! ```

mod commands;
mod render;
mod settings;

use std::{
  io::{self, BufRead as _, Write as _},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use settings::Settings;
use syllabus_client::ApiClient;
use syllabus_core::id::UserId;
use syllabus_store_memory::MemoryStore;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse courses and manage enrollments")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Base URL of the course API.
  #[arg(long)]
  api_base: Option<String>,

  /// Bearer token for the course API.
  #[arg(long)]
  token: Option<String>,

  /// Act as this user.
  #[arg(short, long)]
  user: Option<UserId>,

  /// Use the built-in demo catalog instead of the API.
  #[arg(long)]
  offline: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  // Flags override the config file and environment.
  let mut settings = Settings::load(&cli.config)?;
  if let Some(api_base) = cli.api_base {
    settings.api_base = api_base;
  }
  if cli.token.is_some() {
    settings.token = cli.token;
  }
  settings.offline |= cli.offline;
  let user = match cli.user {
    Some(user) => Some(user),
    None => settings.user()?,
  };
  debug!(?user, offline = settings.offline, api_base = %settings.api_base, "settings loaded");

  let mut confirm = prompt_yes_no;
  let output = if settings.offline {
    let store = Arc::new(MemoryStore::with_demo_catalog());
    commands::run(store, user, cli.command, &mut confirm).await?
  } else {
    let client = ApiClient::new(settings.api_config()).context("failed to build HTTP client")?;
    match cli.command {
      Command::Search(args) => commands::search_api(&client, &args).await?,
      command => commands::run(Arc::new(client), user, command, &mut confirm).await?,
    }
  };

  println!("{output}");
  Ok(())
}

fn prompt_yes_no(question: &str) -> anyhow::Result<bool> {
  let mut stdout = io::stdout().lock();
  write!(stdout, "{question} [y/N] ")?;
  stdout.flush()?;

  let mut answer = String::new();
  io::stdin().lock().read_line(&mut answer)?;
  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
