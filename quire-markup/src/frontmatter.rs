//! YAML front matter at the top of a document.
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{MarkupError, MarkupResult};

const DELIMITER: &str = "---";

/// Split a document into its front matter (without delimiters) and body.
///
/// The front matter must start on the first line with `---` and end with a
/// line that is exactly `---`. Without one, the whole input is the body.
#[must_use]
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
  let Some(rest) = source
    .strip_prefix(DELIMITER)
    .and_then(|rest| rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")))
  else {
    return (None, source);
  };

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if line.trim_end_matches(['\r', '\n']) == DELIMITER {
      let matter = &rest[..offset];
      let body = &rest[offset + line.len()..];
      return (Some(matter), body);
    }
    offset += line.len();
  }
  (None, source)
}

/// Front matter fields of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFrontMatter {
  #[serde(default)]
  pub title: String,

  /// Publication date as written, see [`parse_date`].
  #[serde(default)]
  pub date: Option<String>,

  #[serde(default)]
  pub draft: bool,
}

impl PostFrontMatter {
  /// Parse the front matter of `source`; missing front matter yields the
  /// default (untitled, undated, not a draft).
  ///
  /// # Errors
  ///
  /// Returns an error if the front matter is not valid YAML for this shape.
  pub fn from_source(source: &str) -> MarkupResult<Self> {
    match split_front_matter(source) {
      (Some(matter), _) if !matter.trim().is_empty() => {
        Ok(serde_yaml::from_str(matter)?)
      },
      _ => Ok(Self::default()),
    }
  }

  /// The publication date, if any.
  ///
  /// # Errors
  ///
  /// Returns an error if a date is present but cannot be parsed.
  pub fn parsed_date(&self) -> MarkupResult<Option<Date>> {
    self.date.as_deref().map(parse_date).transpose()
  }

  /// The publication instant, if any.
  ///
  /// # Errors
  ///
  /// Returns an error if a date is present but cannot be parsed.
  pub fn parsed_timestamp(&self) -> MarkupResult<Option<Timestamp>> {
    self.date.as_deref().map(parse_timestamp).transpose()
  }
}

/// Parse an RFC 3339 timestamp, or `YYYY-MM-DD` as midnight UTC.
///
/// The timestamp form is tried first: the civil date parser would accept a
/// full timestamp and drop its time and offset.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidDate`] if neither form parses.
pub fn parse_timestamp(raw: &str) -> MarkupResult<Timestamp> {
  let raw = raw.trim();
  if let Ok(ts) = raw.parse::<Timestamp>() {
    return Ok(ts);
  }
  raw
    .parse::<Date>()
    .and_then(|date| date.to_zoned(TimeZone::UTC))
    .map(|zoned| zoned.timestamp())
    .map_err(|_| MarkupError::InvalidDate(raw.to_string()))
}

/// Calendar date of [`parse_timestamp`], taken in UTC.
///
/// # Errors
///
/// Returns [`MarkupError::InvalidDate`] if `raw` does not parse.
pub fn parse_date(raw: &str) -> MarkupResult<Date> {
  parse_timestamp(raw).map(|ts| ts.to_zoned(TimeZone::UTC).date())
}

const MONTHS: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

/// English ordinal for a day of month: `1st`, `2nd`, `11th`, `23rd`.
#[must_use]
pub fn ordinal(n: i8) -> String {
  if (10..=19).contains(&n) {
    return format!("{n}th");
  }
  match n % 10 {
    1 => format!("{n}st"),
    2 => format!("{n}nd"),
    3 => format!("{n}rd"),
    _ => format!("{n}th"),
  }
}

/// Long form of a date, e.g. `March 3rd 2024`.
#[must_use]
pub fn format_date(date: Date) -> String {
  let month = usize::try_from(date.month() - 1)
    .ok()
    .and_then(|idx| MONTHS.get(idx))
    .copied()
    .unwrap_or_default();
  format!("{month} {} {}", ordinal(date.day()), date.year())
}
