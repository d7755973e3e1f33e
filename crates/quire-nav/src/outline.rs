//! In-page outline construction.
//!
//! Headings arrive as a flat list in document order and are folded into a
//! tree bounded by an [`OutlineLevels`] range. A heading carrying the ignore
//! class is left out together with every deeper heading that follows it,
//! until a heading at the same or a shallower level closes the scope.
use std::sync::LazyLock;

use log::{debug, trace};
use quire_config::OutlineConfig;
use regex::Regex;
use serde::Serialize;

/// Class names of inline decorations that are not part of a heading title.
static DECORATION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(r"\b(?:VPBadge|header-anchor|footnote-ref|ignore-header)\b")
    .map_err(|e| log::error!("Failed to compile DECORATION_RE regex: {e}"))
    .ok()
});

const DEFAULT_OUTLINE_LABEL: &str = "Contents";

/// A heading element as seen by the outline.
pub trait HeadingNode {
  fn has_class(&self, class: &str) -> bool;
}

/// A heading element that can describe itself, see [`collect_headings`].
pub trait HeadingElement: HeadingNode {
  /// Anchor id; empty when the heading has none.
  fn id(&self) -> &str;

  fn level(&self) -> u8;

  fn child_nodes(&self) -> &[HeadingChild];
}

/// A direct child node of a heading element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingChild {
  Text(String),
  Element {
    /// Space-separated class attribute.
    class_name: String,
    text:       String,
  },
}

/// A detached heading, e.g. one extracted from rendered Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaticHeading {
  pub id:       String,
  pub level:    u8,
  pub classes:  Vec<String>,
  #[serde(skip)]
  pub children: Vec<HeadingChild>,
}

impl StaticHeading {
  #[must_use]
  pub fn new(id: impl Into<String>, level: u8) -> Self {
    Self {
      id: id.into(),
      level,
      ..Self::default()
    }
  }

  #[must_use]
  pub fn with_text(mut self, text: impl Into<String>) -> Self {
    self.children.push(HeadingChild::Text(text.into()));
    self
  }

  #[must_use]
  pub fn with_element(
    mut self,
    class_name: impl Into<String>,
    text: impl Into<String>,
  ) -> Self {
    self.children.push(HeadingChild::Element {
      class_name: class_name.into(),
      text:       text.into(),
    });
    self
  }

  #[must_use]
  pub fn with_class(mut self, class: impl Into<String>) -> Self {
    self.classes.push(class.into());
    self
  }
}

impl HeadingNode for StaticHeading {
  fn has_class(&self, class: &str) -> bool {
    self.classes.iter().any(|c| c == class)
  }
}

impl HeadingElement for StaticHeading {
  fn id(&self) -> &str {
    &self.id
  }

  fn level(&self) -> u8 {
    self.level
  }

  fn child_nodes(&self) -> &[HeadingChild] {
    &self.children
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingDescriptor<E> {
  #[serde(skip)]
  pub element: E,
  pub title:   String,
  /// Fragment link, `#` followed by the heading id.
  pub link:    String,
  pub level:   u8,
}

/// A node of the outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem<E> {
  #[serde(skip)]
  pub element:  E,
  pub title:    String,
  pub link:     String,
  pub level:    u8,
  pub children: Vec<Self>,
}

/// A heading that made it into the outline, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader<E> {
  pub element: E,
  pub link:    String,
}

/// The outline tree together with the flat list of headings it contains.
///
/// Both halves are built in one pass and must be replaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline<E> {
  pub items:    Vec<MenuItem<E>>,
  pub resolved: Vec<ResolvedHeader<E>>,
}

impl<E> Default for Outline<E> {
  fn default() -> Self {
    Self {
      items:    Vec::new(),
      resolved: Vec::new(),
    }
  }
}

impl<E> Outline<E> {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

/// Inclusive heading level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineLevels {
  pub min: u8,
  pub max: u8,
}

impl Default for OutlineLevels {
  fn default() -> Self {
    Self { min: 2, max: 3 }
  }
}

impl OutlineLevels {
  /// Every level below the page title.
  #[must_use]
  pub const fn deep() -> Self {
    Self { min: 2, max: 6 }
  }

  #[must_use]
  pub const fn single(level: u8) -> Self {
    Self {
      min: level,
      max: level,
    }
  }

  #[must_use]
  pub const fn contains(self, level: u8) -> bool {
    self.min <= level && level <= self.max
  }
}

/// Whether and at which levels pages get an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineSetting {
  Disabled,
  Levels(OutlineLevels),
}

impl Default for OutlineSetting {
  fn default() -> Self {
    Self::Levels(OutlineLevels::default())
  }
}

impl From<&OutlineConfig> for OutlineSetting {
  fn from(config: &OutlineConfig) -> Self {
    if config.enabled {
      Self::Levels(OutlineLevels {
        min: config.min_level,
        max: config.max_level,
      })
    } else {
      Self::Disabled
    }
  }
}

/// Open ancestor while folding headings into a tree.
enum StackEntry {
  /// Index into the node arena.
  RealNode { level: u8, index: usize },
  /// Suppresses every deeper heading until closed.
  IgnoreMarker { level: u8 },
}

impl StackEntry {
  const fn level(&self) -> u8 {
    match *self {
      Self::RealNode { level, .. } | Self::IgnoreMarker { level } => level,
    }
  }
}

struct ArenaNode<E> {
  heading:  HeadingDescriptor<E>,
  children: Vec<usize>,
}

fn assemble<E: Clone>(arena: &[ArenaNode<E>], index: usize) -> MenuItem<E> {
  let node = &arena[index];
  MenuItem {
    element:  node.heading.element.clone(),
    title:    node.heading.title.clone(),
    link:     node.heading.link.clone(),
    level:    node.heading.level,
    children: node
      .children
      .iter()
      .map(|&child| assemble(arena, child))
      .collect(),
  }
}

/// Fold `headers` (document order) into an outline tree.
///
/// Headings outside `levels` are left out without affecting their
/// neighbours; a heading with `ignore_class`, or one whose nearest open
/// ancestor is ignored, opens an ignore scope at its level.
#[must_use]
pub fn build_outline<E>(
  headers: &[HeadingDescriptor<E>],
  levels: OutlineLevels,
  ignore_class: &str,
) -> Outline<E>
where
  E: HeadingNode + Clone,
{
  let mut arena: Vec<ArenaNode<E>> = Vec::new();
  let mut roots = Vec::new();
  let mut resolved = Vec::new();
  let mut stack: Vec<StackEntry> = Vec::new();

  for heading in headers {
    while stack.last().is_some_and(|top| top.level() >= heading.level) {
      stack.pop();
    }
    let parent = stack.last();

    if heading.element.has_class(ignore_class)
      || matches!(parent, Some(StackEntry::IgnoreMarker { .. }))
    {
      trace!("Ignoring heading {}", heading.link);
      stack.push(StackEntry::IgnoreMarker {
        level: heading.level,
      });
      continue;
    }

    if !levels.contains(heading.level) {
      continue;
    }

    let index = arena.len();
    match parent {
      Some(&StackEntry::RealNode { index: parent, .. }) => {
        arena[parent].children.push(index);
      },
      _ => roots.push(index),
    }
    arena.push(ArenaNode {
      heading:  heading.clone(),
      children: Vec::new(),
    });
    resolved.push(ResolvedHeader {
      element: heading.element.clone(),
      link:    heading.link.clone(),
    });
    stack.push(StackEntry::RealNode {
      level: heading.level,
      index,
    });
  }

  debug!(
    "Built outline with {} roots from {} headings",
    roots.len(),
    headers.len()
  );

  Outline {
    items: roots.iter().map(|&root| assemble(&arena, root)).collect(),
    resolved,
  }
}

/// Build the outline for `setting`; a disabled outline is empty.
#[must_use]
pub fn resolve_headers<E>(
  headers: &[HeadingDescriptor<E>],
  setting: OutlineSetting,
  ignore_class: &str,
) -> Outline<E>
where
  E: HeadingNode + Clone,
{
  match setting {
    OutlineSetting::Disabled => Outline::default(),
    OutlineSetting::Levels(levels) => {
      build_outline(headers, levels, ignore_class)
    },
  }
}

/// Title text of a heading: its text children plus element children that
/// are not decorations such as badges, anchors or footnote markers.
#[must_use]
pub fn serialize_title(children: &[HeadingChild]) -> String {
  let mut title = String::new();
  for child in children {
    match child {
      HeadingChild::Text(text) => title.push_str(text),
      HeadingChild::Element { class_name, text } => {
        let decoration = DECORATION_RE
          .as_ref()
          .is_some_and(|re| re.is_match(class_name));
        if !decoration {
          title.push_str(text);
        }
      },
    }
  }
  title.trim().to_string()
}

/// Describe heading elements for [`build_outline`]. Headings without an id
/// or without any children are skipped.
#[must_use]
pub fn collect_headings<E>(elements: &[E]) -> Vec<HeadingDescriptor<E>>
where
  E: HeadingElement + Clone,
{
  elements
    .iter()
    .filter(|el| !el.id().is_empty() && !el.child_nodes().is_empty())
    .map(|el| {
      HeadingDescriptor {
        element: el.clone(),
        title:   serialize_title(el.child_nodes()),
        link:    format!("#{}", el.id()),
        level:   el.level(),
      }
    })
    .collect()
}

/// Title shown above the outline.
#[must_use]
pub fn resolve_outline_label(config: &OutlineConfig) -> &str {
  [config.label.as_deref(), config.title.as_deref()]
    .into_iter()
    .flatten()
    .find(|label| !label.is_empty())
    .unwrap_or(DEFAULT_OUTLINE_LABEL)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn headings(levels: &[(u8, &str)]) -> Vec<HeadingDescriptor<StaticHeading>> {
    let elements: Vec<StaticHeading> = levels
      .iter()
      .map(|&(level, id)| StaticHeading::new(id, level).with_text(id))
      .collect();
    collect_headings(&elements)
  }

  #[test]
  fn test_serialize_title_skips_decorations() {
    let children = vec![
      HeadingChild::Text("  Install ".to_string()),
      HeadingChild::Element {
        class_name: "VPBadge tip".to_string(),
        text:       "beta".to_string(),
      },
      HeadingChild::Element {
        class_name: "highlight".to_string(),
        text:       "now".to_string(),
      },
      HeadingChild::Element {
        class_name: "header-anchor".to_string(),
        text:       "#".to_string(),
      },
    ];
    assert_eq!(serialize_title(&children), "Install now");
  }

  #[test]
  fn test_decoration_match_is_word_bounded() {
    let children = vec![
      HeadingChild::Text("A".to_string()),
      HeadingChild::Element {
        class_name: "my-VPBadges".to_string(),
        text:       "B".to_string(),
      },
    ];
    assert_eq!(serialize_title(&children), "AB");
  }

  #[test]
  fn test_collect_skips_headings_without_id_or_children() {
    let elements = vec![
      StaticHeading::new("", 2).with_text("No id"),
      StaticHeading::new("empty", 2),
      StaticHeading::new("kept", 3).with_text("Kept"),
    ];
    let descriptors = collect_headings(&elements);
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].link, "#kept");
    assert_eq!(descriptors[0].title, "Kept");
    assert_eq!(descriptors[0].level, 3);
  }

  #[test]
  fn test_outline_of_flat_levels() {
    let outline = build_outline(
      &headings(&[(2, "a"), (2, "b"), (2, "c")]),
      OutlineLevels::default(),
      "ignore-header",
    );
    let links: Vec<&str> = outline.items.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(links, vec!["#a", "#b", "#c"]);
    assert!(outline.items.iter().all(|i| i.children.is_empty()));
  }

  #[test]
  fn test_deeper_heading_without_open_parent_becomes_root() {
    let outline = build_outline(
      &headings(&[(1, "title"), (3, "deep"), (2, "sec")]),
      OutlineLevels::default(),
      "ignore-header",
    );
    let links: Vec<&str> = outline.items.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(links, vec!["#deep", "#sec"]);
  }

  #[test]
  fn test_disabled_outline_is_empty() {
    let outline = resolve_headers(
      &headings(&[(2, "a")]),
      OutlineSetting::Disabled,
      "ignore-header",
    );
    assert!(outline.is_empty());
    assert!(outline.resolved.is_empty());
  }

  #[test]
  fn test_setting_from_config() {
    let mut config = OutlineConfig::default();
    assert_eq!(
      OutlineSetting::from(&config),
      OutlineSetting::Levels(OutlineLevels { min: 2, max: 3 })
    );
    config.enabled = false;
    assert_eq!(OutlineSetting::from(&config), OutlineSetting::Disabled);
  }

  #[test]
  fn test_resolve_outline_label() {
    let mut config = OutlineConfig::default();
    assert_eq!(resolve_outline_label(&config), "Contents");
    config.title = Some("On this page".to_string());
    assert_eq!(resolve_outline_label(&config), "On this page");
    config.label = Some(String::new());
    assert_eq!(resolve_outline_label(&config), "On this page");
    config.label = Some("Sections".to_string());
    assert_eq!(resolve_outline_label(&config), "Sections");
  }

  #[test]
  fn test_levels() {
    assert!(OutlineLevels::deep().contains(6));
    assert!(!OutlineLevels::single(2).contains(3));
    assert!(OutlineLevels::default().contains(2));
  }
}
