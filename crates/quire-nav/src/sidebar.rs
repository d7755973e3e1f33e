//! Sidebar resolution against the current route.
//!
//! A [`Sidebar`] is resolved for a path into the list of items that apply
//! to it, base paths are folded into links, and the result is grouped for
//! display. Active-link checks compare normalized paths, so `/guide/`,
//! `/guide/index.md` and `/guide/index.html` are the same page.
use std::{borrow::Cow, sync::LazyLock};

use log::{debug, trace};
use percent_encoding::percent_decode_str;
use quire_config::{Sidebar, SidebarItem, SidebarSection};
use regex::Regex;
use serde::Serialize;

static INDEX_OR_EXT_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(r"(?:(^|/)index)?\.(?:md|html)$")
    .map_err(|e| log::error!("Failed to compile INDEX_OR_EXT_RE regex: {e}"))
    .ok()
});

/// The page being viewed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
  /// Page path, e.g. `guide/intro.md` or `/guide/intro`.
  pub path: String,
  /// Location hash including the `#`, or empty.
  pub hash: String,
}

impl Route {
  #[must_use]
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      hash: String::new(),
    }
  }

  #[must_use]
  pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
    self.hash = hash.into();
    self
  }
}

/// Prefix `path` with `/` unless it already starts with one.
#[must_use]
pub fn ensure_starting_slash(path: &str) -> Cow<'_, str> {
  if path.starts_with('/') {
    Cow::Borrowed(path)
  } else {
    Cow::Owned(format!("/{path}"))
  }
}

/// Canonical form of a page path: percent-decoded, without query or
/// fragment, and without a trailing `index` page or `.md`/`.html` extension.
#[must_use]
pub fn normalize(path: &str) -> String {
  let decoded = percent_decode_str(path).decode_utf8_lossy();
  let end = decoded.find(['?', '#']).unwrap_or(decoded.len());
  let path = &decoded[..end];
  match INDEX_OR_EXT_RE.as_ref() {
    Some(re) => re.replace(path, "$1").into_owned(),
    None => path.to_string(),
  }
}

/// Whether `match_path` points at the page of `route`.
///
/// A match path with a fragment only matches when the route's hash is that
/// same fragment.
#[must_use]
pub fn is_active(route: &Route, match_path: Option<&str>) -> bool {
  let Some(match_path) = match_path else {
    return false;
  };

  let current = normalize(&ensure_starting_slash(&route.path));
  if normalize(match_path) != current {
    return false;
  }

  match match_path.find('#') {
    Some(pos) => route.hash == match_path[pos..],
    None => true,
  }
}

/// Whether `pattern` matches the normalized path of `route`.
#[must_use]
pub fn is_active_matching(route: &Route, pattern: &Regex) -> bool {
  pattern.is_match(&normalize(&ensure_starting_slash(&route.path)))
}

/// Prefix the links of `items` and their descendants with the nearest
/// `base`, starting from `parent_base`. Empty links stay empty.
#[must_use]
pub fn add_base(items: &[SidebarItem], parent_base: Option<&str>) -> Vec<SidebarItem> {
  items
    .iter()
    .map(|item| {
      let mut item = item.clone();
      let base = item
        .base
        .as_deref()
        .filter(|base| !base.is_empty())
        .or(parent_base)
        .filter(|base| !base.is_empty())
        .map(str::to_string);
      if let Some(base) = &base
        && let Some(link) = item.link.as_mut()
        && !link.is_empty()
      {
        link.insert_str(0, base);
      }
      if let Some(children) = item.items.take() {
        item.items = Some(add_base(&children, base.as_deref()));
      }
      item
    })
    .collect()
}

/// Resolve the sidebar items that apply to `path`.
///
/// A flat sidebar applies everywhere. For a keyed sidebar the key with the
/// most path segments that prefixes `path` wins, ties going to the key that
/// sorts first; no match resolves to no items.
#[must_use]
pub fn get_sidebar(sidebar: Option<&Sidebar>, path: &str) -> Vec<SidebarItem> {
  let sections = match sidebar {
    None => return Vec::new(),
    Some(Sidebar::Flat(items)) => return add_base(items, None),
    Some(Sidebar::Multi(sections)) => sections,
  };

  let path = ensure_starting_slash(path);

  // BTreeMap order is ascending and the sort is stable, so equally deep
  // keys keep that order.
  let mut keys: Vec<&String> = sections.keys().collect();
  keys.sort_by_key(|key| {
    std::cmp::Reverse(ensure_starting_slash(key).split('/').count())
  });

  let Some(key) = keys
    .into_iter()
    .find(|key| path.starts_with(ensure_starting_slash(key).as_ref()))
  else {
    debug!("No sidebar configured for '{path}'");
    return Vec::new();
  };
  debug!("Using sidebar '{key}' for '{path}'");

  match &sections[key] {
    SidebarSection::Items(items) => add_base(items, None),
    SidebarSection::Based { items, base } => add_base(items, Some(base)),
  }
}

/// Group top-level items for display.
///
/// Items with children are groups of their own. Runs of leaves between
/// them are collected into untitled groups in place.
#[must_use]
pub fn get_sidebar_groups(items: &[SidebarItem]) -> Vec<SidebarItem> {
  let mut groups: Vec<SidebarItem> = Vec::new();
  let mut open_leaves: Option<usize> = None;

  for item in items {
    if item.is_group() {
      groups.push(item.clone());
      open_leaves = None;
      continue;
    }

    let index = *open_leaves.get_or_insert_with(|| {
      groups.push(SidebarItem {
        items: Some(Vec::new()),
        ..SidebarItem::default()
      });
      groups.len() - 1
    });
    if let Some(leaves) = groups[index].items.as_mut() {
      leaves.push(item.clone());
    }
  }

  trace!("Grouped {} sidebar items into {}", items.len(), groups.len());
  groups
}

/// Whether `item` links to the route's page or has a descendant that does.
#[must_use]
pub fn item_has_active_link(route: &Route, item: &SidebarItem) -> bool {
  is_active(route, item.link.as_deref()) || has_active_link(route, item.children())
}

/// Whether any of `items` or their descendants links to the route's page.
#[must_use]
pub fn has_active_link(route: &Route, items: &[SidebarItem]) -> bool {
  items.iter().any(|item| item_has_active_link(route, item))
}

/// A linked sidebar page, as used by previous/next footer links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarLink {
  pub text:            String,
  pub link:            String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub doc_footer_text: Option<String>,
}

impl SidebarLink {
  /// Footer label: the dedicated footer text, falling back to the entry text.
  #[must_use]
  pub fn footer_text(&self) -> &str {
    self.doc_footer_text.as_deref().unwrap_or(&self.text)
  }
}

/// Every item with both text and a link, depth first.
#[must_use]
pub fn get_flat_links(items: &[SidebarItem]) -> Vec<SidebarLink> {
  fn collect(items: &[SidebarItem], links: &mut Vec<SidebarLink>) {
    for item in items {
      if let (Some(text), Some(link)) = (&item.text, &item.link)
        && !text.is_empty()
        && !link.is_empty()
      {
        links.push(SidebarLink {
          text:            text.clone(),
          link:            link.clone(),
          doc_footer_text: item.doc_footer_text.clone(),
        });
      }
      collect(item.children(), links);
    }
  }

  let mut links = Vec::new();
  collect(items, &mut links);
  links
}

/// Neighbours of the route's page in sidebar order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrevNext {
  pub prev: Option<SidebarLink>,
  pub next: Option<SidebarLink>,
}

/// Find the links before and after the route's page in `links`.
#[must_use]
pub fn find_prev_next(route: &Route, links: &[SidebarLink]) -> PrevNext {
  let Some(index) = links
    .iter()
    .position(|link| is_active(route, Some(&link.link)))
  else {
    return PrevNext::default();
  };
  PrevNext {
    prev: index.checked_sub(1).and_then(|i| links.get(i)).cloned(),
    next: links.get(index + 1).cloned(),
  }
}

/// Display state of one sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarItemState {
  pub collapsed:       bool,
  pub collapsible:     bool,
  pub is_link:         bool,
  pub is_active_link:  bool,
  pub has_active_link: bool,
  pub has_children:    bool,
}

impl SidebarItemState {
  /// Initial state: collapsed only if the entry asks for it, but never while
  /// it contains the active page.
  #[must_use]
  pub fn new(item: &SidebarItem, route: &Route) -> Self {
    let collapsible = item.collapsed.is_some();
    let mut state = Self {
      collapsed: collapsible && item.collapsed == Some(true),
      collapsible,
      is_link: item.link.as_deref().is_some_and(|link| !link.is_empty()),
      is_active_link: false,
      has_active_link: false,
      has_children: !item.children().is_empty(),
    };
    state.on_route_changed(item, route);
    state
  }

  /// Re-evaluate active state after navigation. An entry that now contains
  /// the active page is expanded; otherwise the collapsed state is kept.
  pub fn on_route_changed(&mut self, item: &SidebarItem, route: &Route) {
    self.is_active_link = is_active(route, item.link.as_deref());
    self.has_active_link =
      self.is_active_link || has_active_link(route, item.children());
    if self.has_active_link {
      self.collapsed = false;
    }
  }

  /// Flip the collapsed state of a collapsible entry.
  pub const fn toggle(&mut self) {
    if self.collapsible {
      self.collapsed = !self.collapsed;
    }
  }
}
