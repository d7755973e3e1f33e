//! Post index: published posts with their dates and reading times.
use std::cmp::Reverse;

use color_eyre::eyre::{Context, Result};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use log::{debug, info};
use quire_markup::{
  MarkdownProcessor,
  PostFrontMatter,
  format_date,
  reading_minutes,
};
use serde::{Serialize, Serializer};

/// Landing page of the posts directory, never a post itself.
const INDEX_FILE: &str = "index.md";

/// Scratch post that only exists outside production builds.
const SCRATCH_FILE: &str = "test.md";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
  #[default]
  Development,
  Production,
}

/// A published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  /// File name without the `.md` extension.
  pub path:            String,
  pub title:           String,
  #[serde(serialize_with = "serialize_date")]
  pub date:            Option<Date>,
  /// Instant the index is ordered by.
  #[serde(skip)]
  pub published:       Option<Timestamp>,
  pub word_count:      usize,
  pub reading_minutes: u64,
}

impl Post {
  /// Date as shown to readers, e.g. "March 3rd 2024".
  #[must_use]
  pub fn display_date(&self) -> Option<String> {
    self.date.map(format_date)
  }
}

#[allow(clippy::ref_option, reason = "Signature required by serde")]
fn serialize_date<S: Serializer>(
  date: &Option<Date>,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  match date {
    Some(date) => serializer.collect_str(date),
    None => serializer.serialize_none(),
  }
}

/// Whether `file_name` names a post for `mode`.
#[must_use]
pub fn is_post_file(file_name: &str, mode: BuildMode) -> bool {
  file_name.ends_with(".md")
    && file_name != INDEX_FILE
    && (mode != BuildMode::Production || file_name != SCRATCH_FILE)
}

/// Published posts, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostIndex {
  posts: Vec<Post>,
}

impl PostIndex {
  /// Build the index from `(file name, contents)` pairs.
  ///
  /// Files that are not posts for `mode` are skipped, drafts are dropped.
  /// Posts sort by publication instant, newest first; undated posts go last and ties keep
  /// their input order.
  ///
  /// # Errors
  ///
  /// Returns an error if a post has invalid front matter, an unparseable
  /// date, or content the word counter rejects.
  pub fn from_sources<I, N, C>(
    sources: I,
    mode: BuildMode,
    processor: &MarkdownProcessor,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = (N, C)>,
    N: AsRef<str>,
    C: AsRef<str>,
  {
    let mut posts = Vec::new();

    for (file_name, contents) in sources {
      let file_name = file_name.as_ref();
      if !is_post_file(file_name, mode) {
        debug!("Skipping {file_name}: not a post");
        continue;
      }

      let contents = contents.as_ref();
      let front_matter = PostFrontMatter::from_source(contents)
        .wrap_err_with(|| format!("Invalid front matter in {file_name}"))?;
      if front_matter.draft {
        debug!("Skipping draft {file_name}");
        continue;
      }

      let published = front_matter
        .parsed_timestamp()
        .wrap_err_with(|| format!("Invalid date in {file_name}"))?;
      let word_count = processor
        .count_words(contents)
        .wrap_err_with(|| format!("Failed to count words in {file_name}"))?;

      posts.push(Post {
        path: file_name
          .strip_suffix(".md")
          .unwrap_or(file_name)
          .to_string(),
        title: front_matter.title,
        date: published.map(|ts| ts.to_zoned(TimeZone::UTC).date()),
        published,
        word_count,
        reading_minutes: reading_minutes(
          word_count,
          processor.options().words_per_minute,
        ),
      });
    }

    // `None` sorts below every instant, so it ends up last.
    posts.sort_by_key(|post| Reverse(post.published));
    info!("Indexed {} posts", posts.len());
    Ok(Self { posts })
  }

  #[must_use]
  pub fn posts(&self) -> &[Post] {
    &self.posts
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.posts.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.posts.is_empty()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use quire_markup::MarkdownOptions;

  use super::*;

  fn post(title: &str, date: &str, body: &str) -> String {
    format!("---\ntitle: {title}\ndate: {date}\n---\n\n{body}\n")
  }

  #[test]
  fn test_is_post_file() {
    assert!(is_post_file("hello.md", BuildMode::Development));
    assert!(!is_post_file("index.md", BuildMode::Development));
    assert!(!is_post_file("notes.txt", BuildMode::Development));
    assert!(is_post_file("test.md", BuildMode::Development));
    assert!(!is_post_file("test.md", BuildMode::Production));
  }

  #[test]
  fn test_undated_posts_sort_last() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let index = PostIndex::from_sources(
      [
        ("undated.md", "---\ntitle: Undated\n---\nText".to_string()),
        ("old.md", post("Old", "2023-01-05", "Text")),
        ("new.md", post("New", "2024-03-03", "Text")),
      ],
      BuildMode::Development,
      &processor,
    )
    .unwrap();
    let paths: Vec<&str> =
      index.posts().iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["new", "old", "undated"]);
    assert_eq!(
      index.posts()[0].display_date().as_deref(),
      Some("March 3rd 2024")
    );
  }

  #[test]
  fn test_same_day_posts_sort_by_time() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let index = PostIndex::from_sources(
      [
        ("day.md", post("Day", "2024-01-01", "Text")),
        ("morning.md", post("Morning", "2024-01-01T09:30:00Z", "Text")),
        ("late.md", post("Late", "2023-12-31T23:30:00-02:00", "Text")),
      ],
      BuildMode::Development,
      &processor,
    )
    .unwrap();
    let paths: Vec<&str> =
      index.posts().iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["morning", "late", "day"]);
    assert!(
      index
        .posts()
        .iter()
        .all(|p| p.date == Some(jiff::civil::date(2024, 1, 1)))
    );
  }
}
