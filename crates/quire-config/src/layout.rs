use std::fmt;

use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
  de::{self, Visitor},
};

/// Where the in-page outline aside is shown.
///
/// Written as `true`, `false`, `"left"` or `"right"` in config files and
/// front matter; `true` means the default right-hand position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aside {
  Hidden,
  #[default]
  Right,
  Left,
}

impl Aside {
  #[must_use]
  pub const fn is_shown(self) -> bool {
    !matches!(self, Self::Hidden)
  }
}

impl Serialize for Aside {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Hidden => serializer.serialize_bool(false),
      Self::Right => serializer.serialize_bool(true),
      Self::Left => serializer.serialize_str("left"),
    }
  }
}

impl<'de> Deserialize<'de> for Aside {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct AsideVisitor;

    impl Visitor<'_> for AsideVisitor {
      type Value = Aside;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean, \"left\" or \"right\"")
      }

      fn visit_bool<E>(self, value: bool) -> Result<Aside, E>
      where
        E: de::Error,
      {
        Ok(if value { Aside::Right } else { Aside::Hidden })
      }

      fn visit_str<E>(self, value: &str) -> Result<Aside, E>
      where
        E: de::Error,
      {
        match value {
          "left" => Ok(Aside::Left),
          "right" => Ok(Aside::Right),
          _ => Err(de::Error::unknown_variant(value, &["left", "right"])),
        }
      }
    }

    deserializer.deserialize_any(AsideVisitor)
  }
}

impl std::str::FromStr for Aside {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "true" | "yes" | "1" | "right" => Ok(Self::Right),
      "false" | "no" | "0" => Ok(Self::Hidden),
      "left" => Ok(Self::Left),
      _ => Err(format!("expected true/false, left or right, got '{s}'")),
    }
  }
}

/// Site-wide page layout defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
  /// Default aside placement; front matter may override it per page.
  pub aside: Aside,
}
