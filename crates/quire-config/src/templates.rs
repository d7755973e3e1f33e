use crate::error::ConfigError;

/// Default configuration template in TOML, commented so that a fresh
/// `quire.toml` explains itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# Quire Configuration File

[outline]
# Set to false to hide the in-page outline entirely
enabled = true

# Heading levels that appear in the outline (1-6)
min_level = 2
max_level = 3

# Headings with this class are left out together with their subsections
ignore_class = "ignore-header"

# Title shown above the outline; falls back to `title`, then "Contents"
# label = "On this page"
# title = "Contents"

[tracker]
# Scroll positions within this many pixels of the top reset the active heading
top_threshold = 1.0

# Scroll positions within this many pixels of the bottom pin the last heading
bottom_threshold = 1.0

# Extra pixels a heading may sit below the scroll margin and still be active
activation_slack = 4.0

# Scroll handler rate limit in milliseconds
throttle_ms = 100

# Offset below which the outline panel sticks to the page
min_sticky = 172.0

# Marker position when no heading is active
hidden_marker_top = 33.0

[reading]
# Reading speed used for reading-time estimates
words_per_minute = 200

[markup]
# GitHub Flavored Markdown extensions (tables, footnotes, task lists, ...)
gfm = true

# Keep abbreviations such as C++ on one line
nobr = true

# Custom pattern for unbreakable spans, replaces the built-in C++ pattern
# nobr_pattern = '(?i)\w*c\+\+\w*'

# Render ```mermaid fences as <pre class="mermaid"> for mermaid.js
mermaid = true

[layout]
# Outline aside placement: true, false, "left" or "right"
aside = true

# Sidebar entries, either one list for all pages:
#
# [[sidebar]]
# text = "Introduction"
# link = "/intro"
#
# or lists keyed by path prefix; the deepest matching prefix wins:
#
# [[sidebar."/guide/"]]
# text = "Getting Started"
# collapsed = false
# items = [
#   { text = "Install", link = "/guide/install" },
#   { text = "Usage", link = "/guide/usage" },
# ]
"#;

/// Default configuration template in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "outline": {
    "enabled": true,
    "min_level": 2,
    "max_level": 3,
    "ignore_class": "ignore-header"
  },
  "tracker": {
    "top_threshold": 1.0,
    "bottom_threshold": 1.0,
    "activation_slack": 4.0,
    "throttle_ms": 100,
    "min_sticky": 172.0,
    "hidden_marker_top": 33.0
  },
  "reading": {
    "words_per_minute": 200
  },
  "markup": {
    "gfm": true,
    "nobr": true,
    "mermaid": true
  },
  "layout": {
    "aside": true
  },
  "sidebar": {
    "/guide/": [
      {
        "text": "Getting Started",
        "collapsed": false,
        "items": [
          { "text": "Install", "link": "/guide/install" },
          { "text": "Usage", "link": "/guide/usage" }
        ]
      }
    ]
  }
}
"#;

/// Get the default configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns an error if the format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => {
      Err(ConfigError::Template(format!(
        "Unsupported config format: {format}"
      )))
    },
  }
}
