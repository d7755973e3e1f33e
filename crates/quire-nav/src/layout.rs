//! Per-page layout decisions driven by front matter.
use quire_config::{Aside, SidebarItem};
use serde::Deserialize;

use crate::sidebar::get_sidebar_groups;

const HOME_LAYOUT: &str = "home";

/// Layout-related front matter of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
  /// `false` hides the sidebar on this page.
  pub sidebar: Option<bool>,

  /// Overrides the site-wide aside setting.
  pub aside: Option<Aside>,

  /// Page layout name, e.g. `home` or `doc`.
  pub layout: Option<String>,
}

impl PageLayout {
  fn is_home(&self) -> bool {
    self.layout.as_deref() == Some(HOME_LAYOUT)
  }

  /// Whether the page shows a sidebar made of `resolved` items.
  #[must_use]
  pub fn has_sidebar(&self, resolved: &[SidebarItem]) -> bool {
    self.sidebar != Some(false) && !resolved.is_empty() && !self.is_home()
  }

  /// Whether the page shows the outline aside.
  #[must_use]
  pub fn has_aside(&self, site_aside: Aside) -> bool {
    if self.is_home() {
      return false;
    }
    self.aside.unwrap_or(site_aside).is_shown()
  }

  /// Whether the aside sits on the left.
  #[must_use]
  pub fn left_aside(&self, site_aside: Aside) -> bool {
    self.aside.unwrap_or(site_aside) == Aside::Left
  }

  /// Display groups for `resolved`, empty when the page has no sidebar.
  #[must_use]
  pub fn sidebar_groups(&self, resolved: &[SidebarItem]) -> Vec<SidebarItem> {
    if self.has_sidebar(resolved) {
      get_sidebar_groups(resolved)
    } else {
      Vec::new()
    }
  }
}
