use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A sidebar entry. Entries nest to any depth through `items`.
///
/// An entry with `items` is a group; without, a leaf link. `base` prefixes
/// the links of every descendant until a deeper `base` takes over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub link: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base: Option<String>,

  /// Unset means the group cannot be collapsed at all; `false` means
  /// collapsible but initially open.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub collapsed: Option<bool>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<Vec<Self>>,

  /// Label used for this page in previous/next footer links.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub doc_footer_text: Option<String>,
}

impl SidebarItem {
  /// A leaf entry linking to `link`.
  #[must_use]
  pub fn link(text: impl Into<String>, link: impl Into<String>) -> Self {
    Self {
      text: Some(text.into()),
      link: Some(link.into()),
      ..Self::default()
    }
  }

  /// A group entry holding `items`.
  #[must_use]
  pub fn group(text: impl Into<String>, items: Vec<Self>) -> Self {
    Self {
      text: Some(text.into()),
      items: Some(items),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn with_base(mut self, base: impl Into<String>) -> Self {
    self.base = Some(base.into());
    self
  }

  #[must_use]
  pub const fn with_collapsed(mut self, collapsed: bool) -> Self {
    self.collapsed = Some(collapsed);
    self
  }

  /// Whether the entry owns a list of children.
  #[must_use]
  pub const fn is_group(&self) -> bool {
    self.items.is_some()
  }

  /// Children of the entry, empty for leaves.
  #[must_use]
  pub fn children(&self) -> &[Self] {
    self.items.as_deref().unwrap_or_default()
  }
}

/// Items registered under one path prefix, optionally with a shared base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarSection {
  Items(Vec<SidebarItem>),
  Based {
    items: Vec<SidebarItem>,
    base:  String,
  },
}

impl SidebarSection {
  #[must_use]
  pub fn items(&self) -> &[SidebarItem] {
    match self {
      Self::Items(items) | Self::Based { items, .. } => items,
    }
  }

  #[must_use]
  pub fn base(&self) -> Option<&str> {
    match self {
      Self::Items(_) => None,
      Self::Based { base, .. } => Some(base),
    }
  }
}

/// Sidebar configuration: one list for every page, or lists keyed by path
/// prefix such as `/guide/`.
///
/// In a config file the flat form is an array and the keyed form a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sidebar {
  Flat(Vec<SidebarItem>),
  Multi(BTreeMap<String, SidebarSection>),
}

impl Default for Sidebar {
  fn default() -> Self {
    Self::Flat(Vec::new())
  }
}

impl Sidebar {
  #[must_use]
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Flat(items) => items.is_empty(),
      Self::Multi(sections) => sections.is_empty(),
    }
  }
}
