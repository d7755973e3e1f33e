use std::{
  fmt::Display,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, layout::LayoutConfig, sidebar::Sidebar, templates};

/// File names searched for by [`Config::find_config_file`], in order.
pub const CONFIG_FILENAMES: [&str; 4] =
  ["quire.toml", "quire.json", ".quire.toml", ".quire.json"];

/// Configuration for Quire.
///
/// [`Config`] groups the options of every component: the in-page outline,
/// the scroll tracker, the sidebar, reading-time estimates and Markdown
/// processing. Every section has defaults, so an empty file is a valid
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub outline: OutlineConfig,
  pub tracker: TrackerConfig,
  pub reading: ReadingConfig,
  pub markup:  MarkupConfig,
  pub layout:  LayoutConfig,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub sidebar: Option<Sidebar>,
}

/// In-page outline options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
  /// Whether pages get an outline at all.
  pub enabled: bool,

  /// Shallowest heading level included.
  pub min_level: u8,

  /// Deepest heading level included.
  pub max_level: u8,

  /// Class that removes a heading and its subsections from the outline.
  pub ignore_class: String,

  /// Outline title; preferred over `title`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
}

impl Default for OutlineConfig {
  fn default() -> Self {
    Self {
      enabled:      true,
      min_level:    2,
      max_level:    3,
      ignore_class: "ignore-header".to_string(),
      label:        None,
      title:        None,
    }
  }
}

/// Scroll tracking thresholds, in CSS pixels unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
  /// Scroll offsets closer than this to the top clear the active link.
  pub top_threshold: f64,

  /// Scroll offsets closer than this to the bottom activate the last link.
  pub bottom_threshold: f64,

  /// How far below the scroll margin a heading may start and still count
  /// as reached.
  pub activation_slack: f64,

  /// Minimum interval between scroll evaluations, in milliseconds.
  pub throttle_ms: u64,

  /// Initial sticky offset of the outline panel.
  pub min_sticky: f64,

  /// Marker top while no link is active.
  pub hidden_marker_top: f64,
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self {
      top_threshold:     1.0,
      bottom_threshold:  1.0,
      activation_slack:  4.0,
      throttle_ms:       100,
      min_sticky:        172.0,
      hidden_marker_top: 33.0,
    }
  }
}

/// Reading-time estimate options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
  pub words_per_minute: u32,
}

impl Default for ReadingConfig {
  fn default() -> Self {
    Self {
      words_per_minute: 200,
    }
  }
}

/// Markdown processing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Wrap unbreakable abbreviations in `<nobr>`.
  pub nobr: bool,

  /// Replaces the built-in `c++` pattern when set.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nobr_pattern: Option<String>,

  /// Render ```` ```mermaid ```` fences as diagram sources.
  pub mermaid: bool,
}

impl Default for MarkupConfig {
  fn default() -> Self {
    Self {
      gfm:          true,
      nobr:         true,
      nobr_pattern: None,
      mermaid:      true,
    }
  }
}

/// One configuration file as written: sections it leaves out stay `None` so
/// that merging only replaces what the file actually sets.
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
  outline: Option<OutlineConfig>,
  tracker: Option<TrackerConfig>,
  reading: Option<ReadingConfig>,
  markup:  Option<MarkupConfig>,
  layout:  Option<LayoutConfig>,
  sidebar: Option<Sidebar>,
}

impl ConfigLayer {
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse JSON config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse TOML config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    config.merge_layer(ConfigLayer::from_file(path.as_ref())?);
    Ok(config)
  }

  /// Load configuration from files and `KEY=VALUE` overrides.
  ///
  /// Files are applied in order; a section present in a later file replaces
  /// the same section from earlier ones. Without explicit files, a discovered
  /// config file is used, if any. The result is validated.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed or
  /// the final configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if config_files.is_empty() {
      if let Some(discovered) = Self::find_config_file() {
        log::info!("Using discovered config file: {}", discovered.display());
        config.merge_layer(ConfigLayer::from_file(&discovered)?);
      }
    } else {
      for path in config_files {
        let layer = ConfigLayer::from_file(path).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to load config from {}: {}",
            path.display(),
            e
          ))
        })?;
        config.merge_layer(layer);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
    }

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;
    Ok(config)
  }

  fn merge_layer(&mut self, layer: ConfigLayer) {
    if let Some(outline) = layer.outline {
      self.outline = outline;
    }
    if let Some(tracker) = layer.tracker {
      self.tracker = tracker;
    }
    if let Some(reading) = layer.reading {
      self.reading = reading;
    }
    if let Some(markup) = layer.markup {
      self.markup = markup;
    }
    if let Some(layout) = layer.layout {
      self.layout = layout;
    }
    if layer.sidebar.is_some() {
      self.sidebar = layer.sidebar;
    }
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Keys are dotted section paths such as `outline.max_level` or
  /// `markup.nobr`. An empty value clears optional keys.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
      "outline.enabled" => self.outline.enabled = parse_bool(key, value)?,
      "outline.min_level" => self.outline.min_level = parse_value(key, value)?,
      "outline.max_level" => self.outline.max_level = parse_value(key, value)?,
      "outline.ignore_class" => self.outline.ignore_class = value.to_string(),
      "outline.label" => self.outline.label = optional_string(value),
      "outline.title" => self.outline.title = optional_string(value),
      "tracker.top_threshold" => {
        self.tracker.top_threshold = parse_value(key, value)?;
      },
      "tracker.bottom_threshold" => {
        self.tracker.bottom_threshold = parse_value(key, value)?;
      },
      "tracker.activation_slack" => {
        self.tracker.activation_slack = parse_value(key, value)?;
      },
      "tracker.throttle_ms" => {
        self.tracker.throttle_ms = parse_value(key, value)?;
      },
      "tracker.min_sticky" => self.tracker.min_sticky = parse_value(key, value)?,
      "tracker.hidden_marker_top" => {
        self.tracker.hidden_marker_top = parse_value(key, value)?;
      },
      "reading.words_per_minute" => {
        self.reading.words_per_minute = parse_value(key, value)?;
      },
      "markup.gfm" => self.markup.gfm = parse_bool(key, value)?,
      "markup.nobr" => self.markup.nobr = parse_bool(key, value)?,
      "markup.nobr_pattern" => self.markup.nobr_pattern = optional_string(value),
      "markup.mermaid" => self.markup.mermaid = parse_bool(key, value)?,
      "layout.aside" => self.layout.aside = parse_value(key, value)?,
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }
    Ok(())
  }

  /// Check value ranges and patterns.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    let outline = &self.outline;
    for (name, level) in [
      ("outline.min_level", outline.min_level),
      ("outline.max_level", outline.max_level),
    ] {
      if !(1..=6).contains(&level) {
        errors.push(format!("{name} must be between 1 and 6, got {level}"));
      }
    }
    if outline.min_level > outline.max_level {
      errors.push(format!(
        "outline.min_level ({}) is greater than outline.max_level ({})",
        outline.min_level, outline.max_level
      ));
    }

    let tracker = &self.tracker;
    for (name, value) in [
      ("tracker.top_threshold", tracker.top_threshold),
      ("tracker.bottom_threshold", tracker.bottom_threshold),
      ("tracker.activation_slack", tracker.activation_slack),
      ("tracker.min_sticky", tracker.min_sticky),
      ("tracker.hidden_marker_top", tracker.hidden_marker_top),
    ] {
      if !value.is_finite() || value < 0.0 {
        errors.push(format!(
          "{name} must be a non-negative number, got {value}"
        ));
      }
    }

    if self.reading.words_per_minute == 0 {
      errors.push("reading.words_per_minute must be positive".to_string());
    }

    if let Some(ref pattern) = self.markup.nobr_pattern
      && let Err(e) = Regex::new(pattern)
    {
      errors.push(format!("markup.nobr_pattern does not compile: {e}"));
    }

    if let Some(Sidebar::Multi(ref sections)) = self.sidebar
      && sections.keys().any(String::is_empty)
    {
      errors.push("sidebar keys must not be empty".to_string());
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(format!(
        "Configuration validation failed:\n{}",
        errors.join("\n")
      )))
    }
  }

  /// Search for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search `dir` for the first of [`CONFIG_FILENAMES`].
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
  T: FromStr,
  T::Err: Display,
{
  value.parse().map_err(|e| {
    ConfigError::Config(format!("Invalid value for '{key}': '{value}' - {e}"))
  })
}

fn optional_string(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::useless_vec,
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    clippy::float_cmp,
    reason = "Fine in tests"
  )]

  use super::*;
  use crate::{layout::Aside, sidebar::SidebarItem};

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert!(config.outline.enabled);
    assert_eq!((config.outline.min_level, config.outline.max_level), (2, 3));
    assert_eq!(config.outline.ignore_class, "ignore-header");
    assert_eq!(config.tracker.activation_slack, 4.0);
    assert_eq!(config.tracker.throttle_ms, 100);
    assert_eq!(config.reading.words_per_minute, 200);
    assert!(config.sidebar.is_none());
    config.validate().unwrap();
  }

  #[test]
  fn test_apply_overrides_boolean() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "outline.enabled=no".to_string(),
        "markup.nobr=false".to_string(),
        "markup.mermaid=0".to_string(),
      ])
      .unwrap();

    assert!(!config.outline.enabled);
    assert!(!config.markup.nobr);
    assert!(!config.markup.mermaid);
  }

  #[test]
  fn test_apply_overrides_numeric() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "outline.max_level=4".to_string(),
        "tracker.activation_slack=8.5".to_string(),
        "reading.words_per_minute = 250".to_string(),
      ])
      .unwrap();

    assert_eq!(config.outline.max_level, 4);
    assert_eq!(config.tracker.activation_slack, 8.5);
    assert_eq!(config.reading.words_per_minute, 250);
  }

  #[test]
  fn test_apply_overrides_optional_strings() {
    let mut config = Config::default();
    config.outline.label = Some("On this page".to_string());

    config
      .apply_overrides(&vec![
        "outline.label=".to_string(),
        "outline.title=Contents".to_string(),
        "layout.aside=left".to_string(),
      ])
      .unwrap();

    assert_eq!(config.outline.label, None);
    assert_eq!(config.outline.title.as_deref(), Some("Contents"));
    assert_eq!(config.layout.aside, Aside::Left);
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["no_equals_sign".to_string()]);

    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["sidebar=x".to_string()]);

    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Unknown configuration key")
    );
  }

  #[test]
  fn test_apply_overrides_invalid_values() {
    let mut config = Config::default();

    let err = config
      .apply_overrides(&vec!["markup.gfm=maybe".to_string()])
      .unwrap_err();
    assert!(err.to_string().contains("Invalid boolean value"));

    let err = config
      .apply_overrides(&vec!["outline.min_level=-1".to_string()])
      .unwrap_err();
    assert!(err.to_string().contains("Invalid value for 'outline.min_level'"));
  }

  #[test]
  fn test_validate_rejects_inverted_levels() {
    let mut config = Config::default();
    config.outline.min_level = 4;
    config.outline.max_level = 2;

    let message = config.validate().unwrap_err().to_string();
    assert!(message.contains("greater than outline.max_level"));
  }

  #[test]
  fn test_validate_collects_every_problem() {
    let mut config = Config::default();
    config.outline.max_level = 7;
    config.tracker.top_threshold = f64::NAN;
    config.reading.words_per_minute = 0;
    config.markup.nobr_pattern = Some("(unclosed".to_string());
    config.sidebar = Some(Sidebar::Multi(
      [(String::new(), crate::SidebarSection::Items(vec![]))].into(),
    ));

    let message = config.validate().unwrap_err().to_string();
    for needle in [
      "outline.max_level must be between 1 and 6",
      "tracker.top_threshold",
      "words_per_minute",
      "nobr_pattern",
      "sidebar keys",
    ] {
      assert!(message.contains(needle), "missing '{needle}' in {message}");
    }
  }

  #[test]
  fn test_merge_layer_replaces_present_sections_only() {
    let mut config = Config::default();
    config.reading.words_per_minute = 300;
    config.sidebar = Some(Sidebar::Flat(vec![SidebarItem::link("A", "/a")]));

    let layer: ConfigLayer =
      toml::from_str("[outline]\nmax_level = 4\n").unwrap();
    config.merge_layer(layer);

    assert_eq!(config.outline.max_level, 4);
    assert_eq!(config.outline.min_level, 2);
    assert_eq!(config.reading.words_per_minute, 300);
    assert!(config.sidebar.is_some());
  }

  #[test]
  fn test_templates_parse_to_valid_configs() {
    let from_toml: Config =
      toml::from_str(templates::DEFAULT_TOML_TEMPLATE).unwrap();
    from_toml.validate().unwrap();
    assert_eq!(from_toml.outline, OutlineConfig::default());
    assert_eq!(from_toml.tracker, TrackerConfig::default());

    let from_json: Config =
      serde_json::from_str(templates::DEFAULT_JSON_TEMPLATE).unwrap();
    from_json.validate().unwrap();
    assert!(matches!(from_json.sidebar, Some(Sidebar::Multi(_))));
  }
}
