//! Active-heading tracking for the outline panel.
//!
//! [`compute_active_link`] is the pure decision: given where the resolved
//! headings sit and how far the page is scrolled, which outline link is
//! current. [`ActiveAnchor`] applies that decision to an [`OutlinePanel`],
//! keeps the panel's sticky offset and rate-limits scroll handling.
use std::{
  borrow::Cow,
  cmp::Ordering,
  time::{Duration, Instant},
};

use log::{debug, trace, warn};
use percent_encoding::percent_decode_str;
pub use quire_config::TrackerConfig;

use crate::{
  outline::ResolvedHeader,
  panel::{EventKind, EventTarget, Handler, Mounted},
  schedule::ThrottleDebounce,
};

/// Scroll state of the page, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
  pub scroll_y:        f64,
  pub viewport_height: f64,
  pub document_height: f64,
  /// Height of fixed content at the top of the viewport, e.g. a nav bar.
  pub scroll_margin:   f64,
}

impl ScrollMetrics {
  fn is_at_top(&self, config: &TrackerConfig) -> bool {
    self.scroll_y < config.top_threshold
  }

  fn is_at_bottom(&self, config: &TrackerConfig) -> bool {
    (self.scroll_y + self.viewport_height - self.document_height).abs()
      < config.bottom_threshold
  }
}

/// Page layout queries.
pub trait Layout<E> {
  /// Offset of `element` from the top of the document, or `None` when it is
  /// not laid out (detached, hidden or fixed).
  fn absolute_top(&self, element: &E) -> Option<f64>;
}

/// Position and size of a link inside the outline panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinkGeometry {
  pub top:    f64,
  pub height: f64,
}

/// Style of the marker that slides next to the active link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
  pub top:     f64,
  /// Left unchanged when `None`.
  pub height:  Option<f64>,
  pub opacity: f64,
}

/// The rendered outline panel.
pub trait OutlinePanel {
  type Link;

  /// Find the link whose `href` is exactly `href`.
  fn find_link(&self, href: &str) -> Option<Self::Link>;

  fn set_highlighted(&mut self, link: &Self::Link, highlighted: bool);

  fn link_geometry(&self, link: &Self::Link) -> LinkGeometry;

  fn set_marker(&mut self, style: MarkerStyle);

  /// Set the panel's top offset; `None` restores the stylesheet default.
  fn set_panel_top(&mut self, top: Option<f64>);
}

/// Decide which link is active.
///
/// No link is active when no heading is laid out or the page is scrolled to
/// the very top. At the very bottom the last heading wins regardless of
/// offsets. Otherwise the active link is the last heading, by position, that
/// starts above `scroll_y + scroll_margin + activation_slack`.
#[must_use]
pub fn compute_active_link<E, L>(
  resolved: &[ResolvedHeader<E>],
  layout: &L,
  metrics: &ScrollMetrics,
  config: &TrackerConfig,
) -> Option<String>
where
  L: Layout<E> + ?Sized,
{
  let mut headers: Vec<(&str, f64)> = resolved
    .iter()
    .filter_map(|header| {
      layout
        .absolute_top(&header.element)
        .filter(|top| !top.is_nan())
        .map(|top| (header.link.as_str(), top))
    })
    .collect();
  headers.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

  if headers.is_empty() || metrics.is_at_top(config) {
    return None;
  }

  if metrics.is_at_bottom(config) {
    return headers.last().map(|(link, _)| (*link).to_string());
  }

  let limit = metrics.scroll_y + metrics.scroll_margin + config.activation_slack;
  headers
    .iter()
    .take_while(|(_, top)| *top <= limit)
    .last()
    .map(|(link, _)| (*link).to_string())
}

/// Drives the active link and sticky offset of one outline panel.
#[derive(Debug)]
pub struct ActiveAnchor<L> {
  config:      TrackerConfig,
  prev_active: Option<L>,
  active_href: Option<String>,
  min_sticky:  f64,
  schedule:    ThrottleDebounce,
}

impl<L> ActiveAnchor<L> {
  #[must_use]
  pub fn new(config: TrackerConfig) -> Self {
    Self {
      config,
      prev_active: None,
      active_href: None,
      min_sticky: config.min_sticky,
      schedule: ThrottleDebounce::new(Duration::from_millis(
        config.throttle_ms,
      )),
    }
  }

  /// Href of the highlighted link, as passed to [`Self::activate_link`].
  #[must_use]
  pub fn active_href(&self) -> Option<&str> {
    self.active_href.as_deref()
  }

  #[must_use]
  pub const fn min_sticky(&self) -> f64 {
    self.min_sticky
  }

  /// When the trailing scroll evaluation is due.
  #[must_use]
  pub const fn next_deadline(&self) -> Option<Instant> {
    self.schedule.next_deadline()
  }

  /// Attach the scroll listeners and reset the schedule.
  ///
  /// Only listeners are attached. The caller runs [`Self::set_active_link`]
  /// once after the first layout; later runs happen inside
  /// [`Self::on_scroll`] and [`Self::on_timer`].
  pub fn mount(&mut self, target: &mut impl EventTarget) -> Mounted {
    self.schedule.reset();
    Mounted::attach(target, &[
      (EventKind::Scroll, Handler::ActiveLink),
      (EventKind::Scroll, Handler::Sticky),
    ])
  }

  /// Recompute the active link and apply it to `panel`.
  pub fn set_active_link<E, Ly, P>(
    &mut self,
    resolved: &[ResolvedHeader<E>],
    layout: &Ly,
    metrics: &ScrollMetrics,
    panel: &mut P,
  ) -> Option<String>
  where
    Ly: Layout<E> + ?Sized,
    P: OutlinePanel<Link = L>,
  {
    let active = compute_active_link(resolved, layout, metrics, &self.config);
    trace!("Scroll at {} activates {active:?}", metrics.scroll_y);
    self.activate_link(active.as_deref(), panel);
    active
  }

  /// Highlight the link for `hash` (percent-escapes allowed) and move the
  /// marker to it. An unknown hash clears the highlight.
  pub fn activate_link<P>(&mut self, hash: Option<&str>, panel: &mut P)
  where
    P: OutlinePanel<Link = L>,
  {
    if let Some(prev) = self.prev_active.take() {
      panel.set_highlighted(&prev, false);
    }

    let href = hash.map(|hash| percent_decode_str(hash).decode_utf8_lossy());
    self.prev_active = href.as_deref().and_then(|href| panel.find_link(href));

    if let Some(ref link) = self.prev_active {
      panel.set_highlighted(link, true);
      let geometry = panel.link_geometry(link);
      panel.set_marker(MarkerStyle {
        top:     geometry.top,
        height:  Some(geometry.height),
        opacity: 1.0,
      });
      self.active_href = href.map(Cow::into_owned);
    } else {
      if let Some(href) = href.as_deref()
        && !href.is_empty()
      {
        warn!("No outline link for '{href}', clearing active link");
      }
      panel.set_marker(MarkerStyle {
        top:     self.config.hidden_marker_top,
        height:  None,
        opacity: 0.0,
      });
      self.active_href = None;
    }
  }

  /// Panel top for `scroll_y`: follows the page until it has scrolled past
  /// the sticky minimum, `None` afterwards.
  #[must_use]
  pub fn sticky_top(&self, scroll_y: f64) -> Option<f64> {
    (scroll_y <= self.min_sticky).then(|| self.min_sticky - scroll_y)
  }

  pub fn apply_sticky<P: OutlinePanel>(&self, scroll_y: f64, panel: &mut P) {
    panel.set_panel_top(self.sticky_top(scroll_y));
  }

  /// Content changed: the sticky minimum becomes the content offset plus
  /// the title offset when both are known.
  pub fn on_content_updated<P: OutlinePanel>(
    &mut self,
    content_top: Option<f64>,
    title_top: Option<f64>,
    scroll_y: f64,
    panel: &mut P,
  ) {
    if let (Some(content), Some(title)) = (content_top, title_top) {
      self.min_sticky = content + title;
      debug!("Outline panel sticks below {}px", self.min_sticky);
    }
    self.apply_sticky(scroll_y, panel);
  }

  /// Navigated to a new route: highlight the link of the location hash.
  pub fn on_route_updated<P>(&mut self, hash: &str, panel: &mut P)
  where
    P: OutlinePanel<Link = L>,
  {
    self.activate_link((!hash.is_empty()).then_some(hash), panel);
  }

  /// Handle a scroll event at `now`. The sticky offset follows every event,
  /// the active link only leading runs. Returns whether the active link was
  /// re-evaluated.
  pub fn on_scroll<E, Ly, P>(
    &mut self,
    now: Instant,
    resolved: &[ResolvedHeader<E>],
    layout: &Ly,
    metrics: &ScrollMetrics,
    panel: &mut P,
  ) -> bool
  where
    Ly: Layout<E> + ?Sized,
    P: OutlinePanel<Link = L>,
  {
    self.apply_sticky(metrics.scroll_y, panel);
    let run = self.schedule.trigger(now);
    if run {
      self.set_active_link(resolved, layout, metrics, panel);
    }
    run
  }

  /// Run the trailing evaluation if it is due at `now`.
  pub fn on_timer<E, Ly, P>(
    &mut self,
    now: Instant,
    resolved: &[ResolvedHeader<E>],
    layout: &Ly,
    metrics: &ScrollMetrics,
    panel: &mut P,
  ) -> bool
  where
    Ly: Layout<E> + ?Sized,
    P: OutlinePanel<Link = L>,
  {
    let run = self.schedule.poll(now);
    if run {
      self.set_active_link(resolved, layout, metrics, panel);
    }
    run
  }
}
