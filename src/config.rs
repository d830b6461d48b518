use crate::error::{BracketError, Result};
use crate::types::*;
use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

pub fn repo_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Relative paths in config and env vars are anchored at the repo root.
pub fn resolve_repo_path(raw: &str) -> PathBuf {
  let path = Path::new(raw);
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    repo_root().join(path)
  }
}

fn configured_path(raw: &str) -> Option<PathBuf> {
  Some(raw.trim()).filter(|raw| !raw.is_empty()).map(resolve_repo_path)
}

pub fn config_path() -> PathBuf {
  match env_default("BRACKET_CONFIG_PATH") {
    Some(raw) => resolve_repo_path(&raw),
    None => repo_root().join("config.json"),
  }
}

pub fn logs_dir() -> PathBuf {
  repo_root().join("logs")
}

/// A set, non-blank environment variable, trimmed.
pub fn env_default(key: &str) -> Option<String> {
  let value = env::var(key).ok()?;
  let value = value.trim();
  (!value.is_empty()).then(|| value.to_string())
}

pub fn apply_env_defaults(mut config: AppConfig) -> AppConfig {
  if config.bind_addr.trim().is_empty() {
    config.bind_addr = env_default("BRACKET_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
  }
  if config.static_dir.trim().is_empty() {
    if let Some(value) = env_default("BRACKET_STATIC_DIR") {
      config.static_dir = value;
    }
  }
  if config.roster_path.trim().is_empty() {
    if let Some(value) = env_default("BRACKET_ROSTER_PATH") {
      config.roster_path = value;
    }
  }
  config
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
  if !path.is_file() {
    return Ok(apply_env_defaults(AppConfig::default()));
  }
  let data = fs::read_to_string(path)
    .map_err(|e| BracketError::Config(format!("read config {}: {e}", path.display())))?;
  let config = serde_json::from_str::<AppConfig>(&data)
    .map_err(|e| BracketError::Config(format!("parse config {}: {e}", path.display())))?;
  Ok(apply_env_defaults(config))
}

pub fn load_config_inner() -> Result<AppConfig> {
  load_config_from(&config_path())
}

pub fn roster_path_from_config(config: &AppConfig) -> Option<PathBuf> {
  configured_path(&config.roster_path)
}

pub fn static_dir_from_config(config: &AppConfig) -> Option<PathBuf> {
  configured_path(&config.static_dir)
}

/// Applies `<repo>/.env` on top of the process environment.
pub fn load_env_file() -> usize {
  load_env_file_from(&repo_root().join(".env"))
}

/// Sets every `KEY=value` from `path` that the environment does not already
/// define, and returns how many were applied. A missing file applies nothing.
pub fn load_env_file_from(path: &Path) -> usize {
  let Ok(contents) = fs::read_to_string(path) else {
    return 0;
  };
  let mut applied = 0;
  for (key, value) in contents.lines().filter_map(parse_env_line) {
    if env::var_os(&key).is_none() {
      env::set_var(key, value);
      applied += 1;
    }
  }
  applied
}

pub fn parse_env_line(line: &str) -> Option<(String, String)> {
  let line = line.trim();
  if line.starts_with('#') {
    return None;
  }
  let line = line.strip_prefix("export ").unwrap_or(line);
  let (key, value) = line.split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }
  Some((key.to_string(), env_value(value.trim()).to_string()))
}

/// Quoted values are taken literally; bare values stop at a `#` comment.
fn env_value(raw: &str) -> &str {
  for quote in ['"', '\''] {
    if let Some(inner) = raw.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
      return inner;
    }
  }
  match raw.split_once('#') {
    Some((value, _)) => value.trim_end(),
    None => raw,
  }
}

pub fn log_config_warnings(config: &AppConfig) {
  if let Some(dir) = static_dir_from_config(config) {
    if !dir.is_dir() {
      tracing::warn!("static dir {} does not exist; only the JSON API will be served", dir.display());
    }
  }
  if let Some(path) = roster_path_from_config(config) {
    if !path.is_file() {
      tracing::warn!("roster {} does not exist; start-up will fail", path.display());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_env_lines() {
    assert_eq!(parse_env_line("# comment"), None);
    assert_eq!(parse_env_line("   "), None);
    assert_eq!(parse_env_line("=value"), None);
    assert_eq!(
      parse_env_line("export BRACKET_BIND_ADDR=0.0.0.0:8080"),
      Some(("BRACKET_BIND_ADDR".to_string(), "0.0.0.0:8080".to_string()))
    );
    assert_eq!(
      parse_env_line("KEY=\"quoted # kept\""),
      Some(("KEY".to_string(), "quoted # kept".to_string()))
    );
    assert_eq!(
      parse_env_line("KEY='single'"),
      Some(("KEY".to_string(), "single".to_string()))
    );
    assert_eq!(
      parse_env_line("KEY=value # trailing"),
      Some(("KEY".to_string(), "value".to_string()))
    );
  }

  #[test]
  fn env_file_fills_unset_keys_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(
      &path,
      "# bracket overrides\nKNOCKOUT_BRACKET_TEST_ENV_NEW=\"from file\"\nKNOCKOUT_BRACKET_TEST_ENV_SET=from file\n",
    )
    .unwrap();
    env::set_var("KNOCKOUT_BRACKET_TEST_ENV_SET", "from shell");

    assert_eq!(load_env_file_from(&path), 1);
    assert_eq!(env_default("KNOCKOUT_BRACKET_TEST_ENV_NEW").as_deref(), Some("from file"));
    assert_eq!(env_default("KNOCKOUT_BRACKET_TEST_ENV_SET").as_deref(), Some("from shell"));
    assert_eq!(load_env_file_from(&dir.path().join("missing.env")), 0);
  }

  #[test]
  fn reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = AppConfig {
      bind_addr: "127.0.0.1:9999".to_string(),
      static_dir: "web".to_string(),
      roster_path: "/tmp/roster.json".to_string(),
    };
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    assert_eq!(load_config_from(&path).unwrap(), config);
  }

  #[test]
  fn partial_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "bindAddr": "127.0.0.1:1234" }"#).unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.bind_addr, "127.0.0.1:1234");
  }

  #[test]
  fn malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "not json").unwrap();
    assert!(matches!(load_config_from(&path), Err(BracketError::Config(_))));
  }

  #[test]
  fn resolves_relative_paths_against_repo_root() {
    let config = AppConfig {
      roster_path: "rosters/cup.json".to_string(),
      ..AppConfig::default()
    };
    assert_eq!(roster_path_from_config(&config), Some(repo_root().join("rosters/cup.json")));
    assert_eq!(static_dir_from_config(&config), None);
    assert_eq!(resolve_repo_path("/abs/path"), PathBuf::from("/abs/path"));
  }
}
