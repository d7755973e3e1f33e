#![allow(
  clippy::float_cmp,
  clippy::cast_precision_loss,
  reason = "Exact pixel values in tests"
)]

use std::{
  collections::HashMap,
  time::{Duration, Instant},
};

use quire_nav::{
  ActiveAnchor,
  TrackerConfig,
  outline::{OutlineLevels, StaticHeading, build_outline, collect_headings},
  panel::{EventKind, EventTarget, Handler},
  tracker::{Layout, LinkGeometry, MarkerStyle, OutlinePanel, ScrollMetrics},
};

/// Absolute tops keyed by heading id.
struct Page(HashMap<String, f64>);

impl Layout<StaticHeading> for Page {
  fn absolute_top(&self, element: &StaticHeading) -> Option<f64> {
    self.0.get(&element.id).copied()
  }
}

/// Outline panel with links at 20px intervals.
#[derive(Default)]
struct Panel {
  links:       Vec<String>,
  highlighted: Vec<usize>,
  marker:      Option<MarkerStyle>,
  panel_top:   Option<Option<f64>>,
}

impl OutlinePanel for Panel {
  type Link = usize;

  fn find_link(&self, href: &str) -> Option<usize> {
    self.links.iter().position(|link| link == href)
  }

  fn set_highlighted(&mut self, link: &usize, highlighted: bool) {
    self.highlighted.retain(|l| l != link);
    if highlighted {
      self.highlighted.push(*link);
    }
  }

  fn link_geometry(&self, link: &usize) -> LinkGeometry {
    LinkGeometry {
      top:    (*link as f64) * 20.0 + 8.0,
      height: 18.0,
    }
  }

  fn set_marker(&mut self, style: MarkerStyle) {
    self.marker = Some(style);
  }

  fn set_panel_top(&mut self, top: Option<f64>) {
    self.panel_top = Some(top);
  }
}

#[derive(Default)]
struct Window(Vec<(EventKind, Handler)>);

impl EventTarget for Window {
  fn add_listener(&mut self, event: EventKind, handler: Handler) {
    self.0.push((event, handler));
  }

  fn remove_listener(&mut self, event: EventKind, handler: Handler) {
    self.0.retain(|&entry| entry != (event, handler));
  }
}

struct Fixture {
  headings: Vec<StaticHeading>,
  page:     Page,
  panel:    Panel,
}

fn fixture() -> Fixture {
  let headings = vec![
    StaticHeading::new("intro", 2).with_text("Intro"),
    StaticHeading::new("usage", 2).with_text("Usage"),
    StaticHeading::new("api", 3).with_text("API"),
    StaticHeading::new("faq", 2).with_text("FAQ"),
  ];
  let page = Page(HashMap::from([
    ("intro".to_string(), 400.0),
    ("usage".to_string(), 1400.0),
    ("api".to_string(), 2000.0),
    ("faq".to_string(), 3600.0),
  ]));
  let panel = Panel {
    links: ["#intro", "#usage", "#api", "#faq", "#caf%C3%A9"]
      .into_iter()
      .map(str::to_string)
      .collect(),
    ..Panel::default()
  };
  Fixture {
    headings,
    page,
    panel,
  }
}

fn metrics(scroll_y: f64) -> ScrollMetrics {
  ScrollMetrics {
    scroll_y,
    viewport_height: 900.0,
    document_height: 4600.0,
    scroll_margin: 56.0,
  }
}

#[test]
fn test_scrolling_through_the_page() {
  let mut fx = fixture();
  let outline = build_outline(
    &collect_headings(&fx.headings),
    OutlineLevels::default(),
    "ignore-header",
  );
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());

  let expectations = [
    (0.0, None),
    (200.0, None),
    (400.0, Some("#intro")),
    (1500.0, Some("#usage")),
    (1940.0, Some("#api")),
    (2500.0, Some("#api")),
    (3700.0, Some("#faq")),
  ];
  for (scroll_y, expected) in expectations {
    let active = anchor.set_active_link(
      &outline.resolved,
      &fx.page,
      &metrics(scroll_y),
      &mut fx.panel,
    );
    assert_eq!(active.as_deref(), expected, "at scroll {scroll_y}");
  }
}

#[test]
fn test_bottom_of_page_activates_last_heading() {
  let mut fx = fixture();
  let outline = build_outline(
    &collect_headings(&fx.headings),
    OutlineLevels::default(),
    "ignore-header",
  );
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());

  // FAQ starts below the activation line but the page cannot scroll further.
  fx.page.0.insert("faq".to_string(), 4550.0);
  let active = anchor.set_active_link(
    &outline.resolved,
    &fx.page,
    &metrics(3700.0),
    &mut fx.panel,
  );
  assert_eq!(active.as_deref(), Some("#faq"));
  assert_eq!(fx.panel.highlighted, vec![3]);
}

#[test]
fn test_activation_moves_highlight_and_marker() {
  let mut fx = fixture();
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());

  anchor.activate_link(Some("#usage"), &mut fx.panel);
  assert_eq!(fx.panel.highlighted, vec![1]);
  assert_eq!(
    fx.panel.marker,
    Some(MarkerStyle {
      top:     28.0,
      height:  Some(18.0),
      opacity: 1.0,
    })
  );
  assert_eq!(anchor.active_href(), Some("#usage"));

  anchor.activate_link(Some("#faq"), &mut fx.panel);
  assert_eq!(fx.panel.highlighted, vec![3]);
}

#[test]
fn test_unknown_hash_hides_marker() {
  let mut fx = fixture();
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());

  anchor.activate_link(Some("#usage"), &mut fx.panel);
  anchor.activate_link(Some("#missing"), &mut fx.panel);
  assert!(fx.panel.highlighted.is_empty());
  assert_eq!(
    fx.panel.marker,
    Some(MarkerStyle {
      top:     33.0,
      height:  None,
      opacity: 0.0,
    })
  );
  assert_eq!(anchor.active_href(), None);

  anchor.activate_link(None, &mut fx.panel);
  assert!(fx.panel.highlighted.is_empty());
}

#[test]
fn test_route_hash_is_percent_decoded() {
  let mut fx = fixture();
  fx.panel.links[4] = "#café".to_string();
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());

  anchor.on_route_updated("#caf%C3%A9", &mut fx.panel);
  assert_eq!(fx.panel.highlighted, vec![4]);
  assert_eq!(anchor.active_href(), Some("#café"));

  anchor.on_route_updated("", &mut fx.panel);
  assert!(fx.panel.highlighted.is_empty());
}

#[test]
fn test_scroll_bursts_are_throttled() {
  let mut fx = fixture();
  let outline = build_outline(
    &collect_headings(&fx.headings),
    OutlineLevels::default(),
    "ignore-header",
  );
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());
  let mut window = Window::default();
  let mounted = anchor.mount(&mut window);
  assert_eq!(window.0.len(), 2);
  assert_eq!(anchor.active_href(), None);

  let start = Instant::now();
  let at = |ms: u64| start + Duration::from_millis(ms);

  assert!(anchor.on_scroll(
    at(0),
    &outline.resolved,
    &fx.page,
    &metrics(400.0),
    &mut fx.panel
  ));
  assert_eq!(anchor.active_href(), Some("#intro"));

  assert!(!anchor.on_scroll(
    at(30),
    &outline.resolved,
    &fx.page,
    &metrics(1500.0),
    &mut fx.panel
  ));
  assert_eq!(anchor.active_href(), Some("#intro"));
  assert_eq!(anchor.next_deadline(), Some(at(130)));

  assert!(!anchor.on_timer(
    at(100),
    &outline.resolved,
    &fx.page,
    &metrics(1500.0),
    &mut fx.panel
  ));
  assert!(anchor.on_timer(
    at(130),
    &outline.resolved,
    &fx.page,
    &metrics(1500.0),
    &mut fx.panel
  ));
  assert_eq!(anchor.active_href(), Some("#usage"));
  assert_eq!(anchor.next_deadline(), None);

  mounted.unmount(&mut window);
  assert!(window.0.is_empty());
}

#[test]
fn test_sticky_offset_follows_every_scroll() {
  let mut fx = fixture();
  let outline = build_outline(
    &collect_headings(&fx.headings),
    OutlineLevels::default(),
    "ignore-header",
  );
  let mut anchor = ActiveAnchor::new(TrackerConfig::default());
  let start = Instant::now();

  anchor.on_content_updated(Some(96.0), Some(120.0), 0.0, &mut fx.panel);
  assert_eq!(anchor.min_sticky(), 216.0);
  assert_eq!(fx.panel.panel_top, Some(Some(216.0)));

  anchor.on_scroll(
    start,
    &outline.resolved,
    &fx.page,
    &metrics(100.0),
    &mut fx.panel,
  );
  // Throttled for the active link, not for the sticky offset.
  anchor.on_scroll(
    start + Duration::from_millis(10),
    &outline.resolved,
    &fx.page,
    &metrics(300.0),
    &mut fx.panel,
  );
  assert_eq!(fx.panel.panel_top, Some(None));

  // Missing offsets keep the previous minimum.
  anchor.on_content_updated(None, Some(50.0), 16.0, &mut fx.panel);
  assert_eq!(anchor.min_sticky(), 216.0);
  assert_eq!(fx.panel.panel_top, Some(Some(200.0)));
}
