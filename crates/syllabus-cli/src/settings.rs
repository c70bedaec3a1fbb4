//! Runtime settings: `config.toml`, then `SYLLABUS_*` environment variables,
//! then command-line flags.

use std::{path::Path, time::Duration};

use anyhow::Context as _;
use serde::Deserialize;
use syllabus_client::ApiConfig;
use syllabus_core::id::UserId;

/// Settings as read from the config file and environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_api_base")]
  pub api_base:     String,
  /// Bearer token for the API.
  #[serde(default)]
  pub token:        Option<String>,
  /// The signed-in user. Kept textual so it goes through id normalization.
  #[serde(default)]
  pub user_id:      Option<String>,
  /// Serve everything from the in-memory demo backend.
  #[serde(default)]
  pub offline:      bool,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_api_base() -> String { "http://localhost:5000".to_owned() }

fn default_timeout_secs() -> u64 { 30 }

impl Settings {
  /// Read `path` (if it exists) and the `SYLLABUS_*` environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SYLLABUS"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// The configured user, if any. A blank value means signed out.
  pub fn user(&self) -> anyhow::Result<Option<UserId>> {
    match self.user_id.as_deref().map(str::trim) {
      None | Some("") => Ok(None),
      Some(raw) => raw
        .parse()
        .map(Some)
        .with_context(|| format!("invalid user_id in settings: {raw:?}")),
    }
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url: self.api_base.clone(),
      token:    self.token.clone().filter(|t| !t.is_empty()),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
      .suffix(".toml")
      .tempfile()
      .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.api_base, "http://localhost:5000");
    assert_eq!(settings.timeout_secs, 30);
    assert!(!settings.offline);
  }

  #[test]
  fn file_values_are_read() {
    let file = write_config(
      r#"
        api_base = "https://courses.example.com"
        token = "abc"
        user_id = "7"
        offline = true
        timeout_secs = 5
      "#,
    );
    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.user().unwrap(), Some(UserId(7)));
    assert!(settings.offline);

    let api = settings.api_config();
    assert_eq!(api.base_url, "https://courses.example.com");
    assert_eq!(api.token.as_deref(), Some("abc"));
    assert_eq!(api.timeout, Duration::from_secs(5));
  }

  #[test]
  fn blank_user_is_signed_out() {
    let file = write_config(r#"user_id = "  ""#);
    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.user().unwrap(), None);
  }

  #[test]
  fn malformed_user_is_an_error() {
    let file = write_config(r#"user_id = "alice""#);
    let settings = Settings::load(file.path()).unwrap();
    assert!(settings.user().is_err());
  }
}
