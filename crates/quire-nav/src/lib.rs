//! # quire-nav - in-page and cross-page navigation
//!
//! Everything here is independent of a real browser. Headings, links and
//! the window are reached through small traits ([`outline::HeadingElement`],
//! [`tracker::Layout`], [`tracker::OutlinePanel`], [`panel::EventTarget`])
//! so hosts and tests can plug in their own.
//!
//! ```rust
//! use quire_nav::{
//!   outline::{OutlineLevels, StaticHeading, build_outline, collect_headings},
//!   sidebar::{Route, get_sidebar, has_active_link},
//! };
//! use quire_config::{Sidebar, SidebarItem};
//!
//! let elements = vec![
//!   StaticHeading::new("install", 2).with_text("Install"),
//!   StaticHeading::new("from-source", 3).with_text("From source"),
//! ];
//! let outline = build_outline(
//!   &collect_headings(&elements),
//!   OutlineLevels::default(),
//!   "ignore-header",
//! );
//! assert_eq!(outline.items[0].children[0].link, "#from-source");
//!
//! let sidebar = Sidebar::Flat(vec![SidebarItem::link("Install", "/install")]);
//! let items = get_sidebar(Some(&sidebar), "/install.md");
//! assert!(has_active_link(&Route::new("install.md"), &items));
//! ```

pub mod layout;
pub mod outline;
pub mod panel;
pub mod schedule;
pub mod sidebar;
pub mod tracker;

pub use crate::{
  layout::PageLayout,
  outline::{Outline, OutlineLevels, OutlineSetting, resolve_headers},
  schedule::ThrottleDebounce,
  sidebar::{Route, get_sidebar, get_sidebar_groups},
  tracker::{ActiveAnchor, TrackerConfig, compute_active_link},
};
