#![allow(clippy::unwrap_used, reason = "Fine in tests")]

use std::fs;

use quire_config::{Aside, Config, Sidebar};
use tempfile::TempDir;

#[test]
fn test_load_merges_files_in_order() {
  let dir = TempDir::new().unwrap();
  let base = dir.path().join("base.toml");
  let site = dir.path().join("site.json");

  fs::write(
    &base,
    r#"
[outline]
max_level = 4
label = "On this page"

[reading]
words_per_minute = 250

[[sidebar]]
text = "Intro"
link = "/intro"
"#,
  )
  .unwrap();
  fs::write(
    &site,
    r#"{ "outline": { "min_level": 1 }, "layout": { "aside": "left" } }"#,
  )
  .unwrap();

  let config = Config::load(&[base, site], &[]).unwrap();

  // The later outline section replaces the earlier one as a whole.
  assert_eq!(config.outline.min_level, 1);
  assert_eq!(config.outline.max_level, 3);
  assert_eq!(config.outline.label, None);
  assert_eq!(config.reading.words_per_minute, 250);
  assert_eq!(config.layout.aside, Aside::Left);
  assert!(matches!(config.sidebar, Some(Sidebar::Flat(ref items)) if items.len() == 1));
}

#[test]
fn test_load_applies_overrides_then_validates() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("quire.toml");
  fs::write(&path, "[outline]\nmin_level = 2\n").unwrap();

  let config =
    Config::load(&[path.clone()], &["outline.max_level=5".to_string()])
      .unwrap();
  assert_eq!(config.outline.max_level, 5);

  let err =
    Config::load(&[path], &["outline.max_level=1".to_string()]).unwrap_err();
  assert!(err.to_string().contains("validation failed"));
}

#[test]
fn test_load_reports_unreadable_and_unsupported_files() {
  let dir = TempDir::new().unwrap();

  let missing = dir.path().join("missing.toml");
  let err = Config::load(&[missing], &[]).unwrap_err();
  assert!(err.to_string().contains("Failed to read config file"));

  let yaml = dir.path().join("quire.yaml");
  fs::write(&yaml, "outline: {}").unwrap();
  let err = Config::from_file(&yaml).unwrap_err();
  assert!(err.to_string().contains("Unsupported config file format"));

  let broken = dir.path().join("broken.json");
  fs::write(&broken, "{ not json").unwrap();
  let err = Config::from_file(&broken).unwrap_err();
  assert!(err.to_string().contains("Failed to parse JSON config"));
}

#[test]
fn test_find_config_file_in_prefers_toml() {
  let dir = TempDir::new().unwrap();
  assert_eq!(Config::find_config_file_in(dir.path()), None);

  fs::write(dir.path().join(".quire.json"), "{}").unwrap();
  fs::write(dir.path().join("quire.json"), "{}").unwrap();
  assert_eq!(
    Config::find_config_file_in(dir.path()),
    Some(dir.path().join("quire.json"))
  );

  fs::write(dir.path().join("quire.toml"), "").unwrap();
  assert_eq!(
    Config::find_config_file_in(dir.path()),
    Some(dir.path().join("quire.toml"))
  );
}

#[test]
fn test_generate_default_config_round_trips() {
  let dir = TempDir::new().unwrap();

  for format in ["toml", "json"] {
    let path = dir.path().join(format!("quire.{format}"));
    Config::generate_default_config(format, &path).unwrap();
    let config = Config::from_file(&path).unwrap();
    config.validate().unwrap();
    assert_eq!(config.outline.ignore_class, "ignore-header");
  }

  let err = Config::generate_default_config("yaml", &dir.path().join("x"))
    .unwrap_err();
  assert!(err.to_string().contains("Unsupported config format"));
}
