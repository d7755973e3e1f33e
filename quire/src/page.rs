//! Glue between rendered Markdown and the navigation structures.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use quire_config::Config;
use quire_markup::{
  Heading,
  MarkdownOptions,
  MarkdownProcessor,
  NobrPlugin,
  RenderedDocument,
  split_front_matter,
};
use quire_nav::{
  OutlineSetting,
  PageLayout,
  outline::{Outline, StaticHeading, collect_headings, resolve_headers},
};

/// Build a processor honouring the `markup` and `reading` sections.
///
/// # Errors
///
/// Returns an error if a custom nobr pattern does not compile.
pub fn markdown_processor(config: &Config) -> Result<MarkdownProcessor> {
  let custom_nobr = config
    .markup
    .nobr
    .then_some(config.markup.nobr_pattern.as_deref())
    .flatten();

  let mut processor = MarkdownProcessor::new(MarkdownOptions {
    gfm:              config.markup.gfm,
    nobr:             config.markup.nobr && custom_nobr.is_none(),
    mermaid:          config.markup.mermaid,
    words_per_minute: config.reading.words_per_minute,
  });

  if let Some(pattern) = custom_nobr {
    let plugin = NobrPlugin::with_pattern(pattern)
      .wrap_err_with(|| format!("Invalid nobr pattern: {pattern}"))?;
    processor.use_plugin(&plugin);
  }
  Ok(processor)
}

/// A Markdown source file with its front matter split off.
#[derive(Debug, Clone)]
pub struct Page {
  pub layout: PageLayout,
  pub source: String,
}

impl Page {
  /// Read `path` and parse its layout front matter.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or its front matter is not
  /// valid YAML.
  pub fn read(path: &Path) -> Result<Self> {
    let source = fs::read_to_string(path)
      .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    Self::parse(source)
      .wrap_err_with(|| format!("Invalid front matter in {}", path.display()))
  }

  /// Parse the layout front matter of `source`.
  ///
  /// # Errors
  ///
  /// Returns an error if the front matter is not valid YAML.
  pub fn parse(source: String) -> Result<Self> {
    let layout = match split_front_matter(&source) {
      (Some(matter), _) if !matter.trim().is_empty() => {
        serde_yaml::from_str(matter)?
      },
      _ => PageLayout::default(),
    };
    Ok(Self { layout, source })
  }

  /// Render the page.
  ///
  /// # Errors
  ///
  /// Returns an error if word counting fails.
  pub fn render(&self, processor: &MarkdownProcessor) -> Result<RenderedDocument> {
    Ok(processor.render(&self.source)?)
  }
}

/// Headings of a rendered document as navigation nodes.
#[must_use]
pub fn static_headings(headings: &[Heading]) -> Vec<StaticHeading> {
  headings
    .iter()
    .map(|heading| {
      heading.classes.iter().fold(
        StaticHeading::new(&heading.id, heading.level).with_text(&heading.title),
        |node, class| node.with_class(class),
      )
    })
    .collect()
}

/// Outline of a rendered document under `config`.
#[must_use]
pub fn document_outline(
  document: &RenderedDocument,
  config: &Config,
) -> Outline<StaticHeading> {
  let elements = static_headings(&document.headings);
  resolve_headers(
    &collect_headings(&elements),
    OutlineSetting::from(&config.outline),
    &config.outline.ignore_class,
  )
}
