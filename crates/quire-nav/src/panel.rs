//! Listener lifecycle and the escape-to-close behaviour of slide-in panels.
use log::trace;

/// Window events the navigation components listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
  Scroll,
  KeyUp,
}

/// Handlers the navigation components register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
  /// Rate-limited active link evaluation.
  ActiveLink,
  /// Sticky offset of the outline panel.
  Sticky,
  /// Close an open panel on Escape.
  CloseOnEscape,
}

/// Something listeners can be attached to, usually the window.
pub trait EventTarget {
  fn add_listener(&mut self, event: EventKind, handler: Handler);

  fn remove_listener(&mut self, event: EventKind, handler: Handler);
}

/// Listeners attached by one mount; [`Mounted::unmount`] removes exactly
/// these and nothing else.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "listeners stay attached until unmounted"]
pub struct Mounted {
  listeners: Vec<(EventKind, Handler)>,
}

impl Mounted {
  pub fn attach(
    target: &mut impl EventTarget,
    listeners: &[(EventKind, Handler)],
  ) -> Self {
    for &(event, handler) in listeners {
      trace!("Attaching {handler:?} to {event:?}");
      target.add_listener(event, handler);
    }
    Self {
      listeners: listeners.to_vec(),
    }
  }

  #[must_use]
  pub fn listeners(&self) -> &[(EventKind, Handler)] {
    &self.listeners
  }

  pub fn unmount(self, target: &mut impl EventTarget) {
    for (event, handler) in self.listeners {
      trace!("Detaching {handler:?} from {event:?}");
      target.remove_listener(event, handler);
    }
  }
}

/// What a key press did to an [`EscapeToClose`] panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome<E> {
  Ignored,
  /// The panel closed; focus should return to `refocus`, if any.
  Closed { refocus: Option<E> },
}

/// Open/closed state of a slide-in panel such as the mobile sidebar.
///
/// The element focused when the panel opens is remembered so that closing
/// with Escape can return focus to it, even if focus moved in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeToClose<E> {
  open:    bool,
  trigger: Option<E>,
}

impl<E> Default for EscapeToClose<E> {
  fn default() -> Self {
    Self {
      open:    false,
      trigger: None,
    }
  }
}

impl<E> EscapeToClose<E> {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub const fn is_open(&self) -> bool {
    self.open
  }

  /// Open the panel; `focused` is the currently focused element.
  pub fn open(&mut self, focused: Option<E>) {
    if !self.open {
      self.open = true;
      self.trigger = focused;
    }
  }

  pub fn close(&mut self) {
    self.open = false;
    self.trigger = None;
  }

  pub fn toggle(&mut self, focused: Option<E>) {
    if self.open {
      self.close();
    } else {
      self.open(focused);
    }
  }

  #[allow(
    clippy::unused_self,
    reason = "Mounting belongs to the panel instance"
  )]
  pub fn mount(&self, target: &mut impl EventTarget) -> Mounted {
    Mounted::attach(target, &[(EventKind::KeyUp, Handler::CloseOnEscape)])
  }

  /// Handle a key-up event carrying `key` (a DOM key name).
  pub fn on_key_up(&mut self, key: &str) -> KeyOutcome<E> {
    if key != "Escape" || !self.open {
      return KeyOutcome::Ignored;
    }
    self.open = false;
    KeyOutcome::Closed {
      refocus: self.trigger.take(),
    }
  }
}
