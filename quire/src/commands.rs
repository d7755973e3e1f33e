//! Subcommand implementations. Each returns the text to print.
use std::{fmt::Write, fs, path::Path};

use color_eyre::eyre::{Context, Result, eyre};
use quire_config::{Config, SidebarItem};
use quire_nav::{
  outline::{MenuItem, StaticHeading, resolve_outline_label},
  sidebar::{
    PrevNext,
    Route,
    SidebarItemState,
    find_prev_next,
    get_flat_links,
    get_sidebar,
    get_sidebar_groups,
  },
};
use serde::Serialize;

use crate::{
  page::{Page, document_outline, markdown_processor},
  posts::{BuildMode, PostIndex},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileStats {
  file:            String,
  word_count:      usize,
  reading_minutes: u64,
}

/// Word counts and reading times of `files`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or counted.
pub fn stats(config: &Config, files: &[impl AsRef<Path>], json: bool) -> Result<String> {
  let processor = markdown_processor(config)?;
  let mut stats = Vec::with_capacity(files.len());

  for file in files {
    let file = file.as_ref();
    let page = Page::read(file)?;
    let word_count = processor
      .count_words(&page.source)
      .wrap_err_with(|| format!("Failed to count words in {}", file.display()))?;
    stats.push(FileStats {
      file: file.display().to_string(),
      word_count,
      reading_minutes: quire_markup::reading_minutes(
        word_count,
        config.reading.words_per_minute,
      ),
    });
  }

  if json {
    return Ok(serde_json::to_string_pretty(&stats)?);
  }

  let mut out = String::new();
  for entry in &stats {
    writeln!(
      out,
      "{}: {} words, {} min read",
      entry.file, entry.word_count, entry.reading_minutes
    )?;
  }
  Ok(out)
}

/// HTML of `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or rendered.
pub fn render(config: &Config, file: &Path) -> Result<String> {
  let processor = markdown_processor(config)?;
  let document = Page::read(file)?
    .render(&processor)
    .wrap_err_with(|| format!("Failed to render {}", file.display()))?;
  Ok(document.html)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutlineView<'a> {
  label:      &'a str,
  shown:      bool,
  left_aside: bool,
  items:      &'a [MenuItem<StaticHeading>],
}

fn write_menu(
  out: &mut String,
  items: &[MenuItem<StaticHeading>],
  depth: usize,
) -> std::fmt::Result {
  for item in items {
    writeln!(out, "{:indent$}- {} {}", "", item.title, item.link, indent = depth * 2)?;
    write_menu(out, &item.children, depth + 1)?;
  }
  Ok(())
}

/// Outline of `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or rendered.
pub fn outline(config: &Config, file: &Path, json: bool) -> Result<String> {
  let processor = markdown_processor(config)?;
  let page = Page::read(file)?;
  let document = page
    .render(&processor)
    .wrap_err_with(|| format!("Failed to render {}", file.display()))?;
  let outline = document_outline(&document, config);

  let view = OutlineView {
    label:      resolve_outline_label(&config.outline),
    shown:      page.layout.has_aside(config.layout.aside) && !outline.is_empty(),
    left_aside: page.layout.left_aside(config.layout.aside),
    items:      &outline.items,
  };

  if json {
    return Ok(serde_json::to_string_pretty(&view)?);
  }

  let mut out = String::new();
  writeln!(out, "{}", view.label)?;
  if !view.shown {
    writeln!(out, "(hidden on this page)")?;
  }
  write_menu(&mut out, view.items, 0)?;
  Ok(out)
}

/// A sidebar entry with its display state.
#[derive(Debug, Serialize)]
struct SidebarNode<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  text:  Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  link:  Option<&'a str>,
  #[serde(flatten)]
  state: SidebarItemState,
  items: Vec<Self>,
}

impl<'a> SidebarNode<'a> {
  fn new(item: &'a SidebarItem, route: &Route) -> Self {
    Self {
      text:  item.text.as_deref(),
      link:  item.link.as_deref(),
      state: SidebarItemState::new(item, route),
      items: item
        .children()
        .iter()
        .map(|child| Self::new(child, route))
        .collect(),
    }
  }

  fn write(&self, out: &mut String, depth: usize) -> std::fmt::Result {
    let marker = match (self.state.collapsible, self.state.collapsed) {
      (true, true) => "[+] ",
      (true, false) => "[-] ",
      (false, _) => "",
    };
    let active = if self.state.is_active_link { " *" } else { "" };

    // Untitled groups only collect leaves, so they get no line of their own.
    let child_depth = match self.text.or(self.link) {
      Some(label) => {
        writeln!(out, "{:indent$}{marker}{label}{active}", "", indent = depth * 2)?;
        depth + 1
      },
      None => depth,
    };

    if !self.state.collapsed {
      for child in &self.items {
        child.write(out, child_depth)?;
      }
    }
    Ok(())
  }
}

#[derive(Debug, Serialize)]
struct SidebarView<'a> {
  groups: Vec<SidebarNode<'a>>,
  #[serde(flatten)]
  around: PrevNext,
}

/// Sidebar of the page at `path`.
///
/// # Errors
///
/// Returns an error if the JSON output cannot be produced.
pub fn sidebar(config: &Config, path: &str, hash: &str, json: bool) -> Result<String> {
  let route = Route::new(path).with_hash(hash);
  let items = get_sidebar(config.sidebar.as_ref(), &route.path);
  let groups = get_sidebar_groups(&items);

  let view = SidebarView {
    groups: groups
      .iter()
      .map(|group| SidebarNode::new(group, &route))
      .collect(),
    around: find_prev_next(&route, &get_flat_links(&items)),
  };

  if json {
    return Ok(serde_json::to_string_pretty(&view)?);
  }

  let mut out = String::new();
  if view.groups.is_empty() {
    writeln!(out, "No sidebar for {path}")?;
    return Ok(out);
  }
  for group in &view.groups {
    group.write(&mut out, 0)?;
  }
  if let Some(prev) = &view.around.prev {
    writeln!(out, "Previous: {} ({})", prev.footer_text(), prev.link)?;
  }
  if let Some(next) = &view.around.next {
    writeln!(out, "Next: {} ({})", next.footer_text(), next.link)?;
  }
  Ok(out)
}

/// Post index built from `files`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or a post is malformed.
pub fn posts(
  config: &Config,
  files: &[impl AsRef<Path>],
  mode: BuildMode,
  json: bool,
) -> Result<String> {
  let processor = markdown_processor(config)?;
  let mut sources = Vec::with_capacity(files.len());
  for file in files {
    let file = file.as_ref();
    let name = file
      .file_name()
      .and_then(|name| name.to_str())
      .ok_or_else(|| eyre!("Not a file name: {}", file.display()))?;
    let contents = fs::read_to_string(file)
      .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    sources.push((name.to_string(), contents));
  }

  let index = PostIndex::from_sources(sources, mode, &processor)?;

  if json {
    return Ok(serde_json::to_string_pretty(&index)?);
  }

  let mut out = String::new();
  for post in index.posts() {
    writeln!(
      out,
      "{:<16} {} ({}, {} min read)",
      post.display_date().unwrap_or_default(),
      post.title,
      post.path,
      post.reading_minutes
    )?;
  }
  Ok(out)
}
