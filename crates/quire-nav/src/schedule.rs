//! Rate limiting for bursty event streams.
//!
//! [`ThrottleDebounce`] answers "should the handler run now?" for a stream
//! of events such as scrolling. The first event of a burst runs at once,
//! later events within the throttle window are collapsed into one trailing
//! run `delay` after the most recent of them. The state machine owns no
//! timers: callers pass in the current instant and arm their own timer at
//! [`ThrottleDebounce::next_deadline`].
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDebounce {
  delay:    Duration,
  /// End of the current throttle window, opened by a leading run.
  window:   Option<Instant>,
  /// Pending trailing run.
  trailing: Option<Instant>,
}

impl ThrottleDebounce {
  #[must_use]
  pub const fn new(delay: Duration) -> Self {
    Self {
      delay,
      window: None,
      trailing: None,
    }
  }

  #[must_use]
  pub const fn delay(&self) -> Duration {
    self.delay
  }

  /// Record an event at `now`. Returns `true` when the handler should run
  /// immediately.
  ///
  /// Every event cancels a pending trailing run. Outside a throttle window
  /// the event runs at once and opens a new window; inside one it schedules
  /// a trailing run `delay` from now.
  pub fn trigger(&mut self, now: Instant) -> bool {
    self.trailing = None;

    if self.window.is_some_and(|end| now < end) {
      self.trailing = Some(now + self.delay);
      false
    } else {
      self.window = Some(now + self.delay);
      true
    }
  }

  /// Returns `true` once when a trailing run is due at `now`.
  pub fn poll(&mut self, now: Instant) -> bool {
    match self.trailing {
      Some(deadline) if deadline <= now => {
        self.trailing = None;
        true
      },
      _ => false,
    }
  }

  /// When the pending trailing run is due, if one is pending.
  #[must_use]
  pub const fn next_deadline(&self) -> Option<Instant> {
    self.trailing
  }

  /// Drop the pending run and the throttle window.
  pub const fn reset(&mut self) {
    self.window = None;
    self.trailing = None;
  }
}
