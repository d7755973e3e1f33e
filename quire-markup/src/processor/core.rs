//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor`: the
//! tokenization pipeline, the rule registries and rendering.
use std::{collections::HashMap, sync::Arc};

use comrak::{Arena, options::Options, parse_document};
use log::{debug, trace};

use super::{
  lower::lower_document,
  render::default_rule,
  types::{
    MarkdownOptions,
    MarkdownProcessor,
    MarkupPlugin,
    RenderRule,
    TokenTransformer,
  },
};
use crate::{
  error::MarkupResult,
  headings::{apply_heading_attributes, assign_heading_ids, extract_headings},
  mermaid::MermaidPlugin,
  nobr::NobrPlugin,
  types::{RenderedDocument, Token, TokenKind},
  words::{count_words, reading_minutes},
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let nobr = options.nobr;
    let mermaid = options.mermaid;
    let mut processor = Self {
      options,
      core_rules: Vec::new(),
      render_rules: HashMap::new(),
    };
    if nobr && let Some(plugin) = NobrPlugin::new() {
      processor.use_plugin(&plugin);
    }
    if mermaid {
      processor.use_plugin(&MermaidPlugin);
    }
    processor
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Install a plugin.
  pub fn use_plugin(&mut self, plugin: &impl MarkupPlugin) -> &mut Self {
    plugin.install(self);
    self
  }

  /// Register a token rewriting pass. Passes run after tokenization, in
  /// registration order; a pass registered under an existing name replaces it.
  pub fn add_core_rule(
    &mut self,
    name: impl Into<String>,
    rule: impl TokenTransformer + 'static,
  ) {
    let name = name.into();
    let rule: Arc<dyn TokenTransformer> = Arc::new(rule);
    if let Some(slot) = self.core_rules.iter_mut().find(|(n, _)| *n == name) {
      slot.1 = rule;
    } else {
      self.core_rules.push((name, rule));
    }
  }

  /// Override rendering of a token type, e.g. `nobr` or `paragraph_open`.
  pub fn set_render_rule(&mut self, type_name: impl Into<String>, rule: RenderRule) {
    self.render_rules.insert(type_name.into(), rule);
  }

  /// Names of the registered core rules, in execution order.
  #[must_use]
  pub fn core_rule_names(&self) -> Vec<&str> {
    self.core_rules.iter().map(|(name, _)| name.as_str()).collect()
  }

  /// Tokenize `markdown` and run all core rules over the result.
  ///
  /// This is the entry point for metadata such as word counts; it does not
  /// render anything.
  #[must_use]
  pub fn parse(&self, markdown: &str) -> Vec<Token> {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let mut tokens = lower_document(root);
    apply_heading_attributes(&mut tokens);
    assign_heading_ids(&mut tokens);
    trace!("Tokenized document into {} block tokens", tokens.len());

    for (name, rule) in &self.core_rules {
      trace!("Running core rule '{name}'");
      rule.transform(&mut tokens);
    }
    tokens
  }

  /// Count the words of `markdown` without rendering it.
  ///
  /// # Errors
  ///
  /// Returns an error if the token tree is inconsistent or contains a token
  /// type the counter has no rule for.
  pub fn count_words(&self, markdown: &str) -> MarkupResult<usize> {
    count_words(&self.parse(markdown))
  }

  /// Render a token stream to HTML.
  #[must_use]
  pub fn render_tokens(&self, tokens: &[Token]) -> String {
    let mut html = String::new();
    for idx in 0..tokens.len() {
      html.push_str(&self.render_token(tokens, idx));
    }
    html
  }

  fn render_token(&self, tokens: &[Token], idx: usize) -> String {
    let token = &tokens[idx];
    if let Some(rule) = self.render_rules.get(token.kind.name().as_ref()) {
      return rule(tokens, idx);
    }
    match token.kind {
      TokenKind::Inline => {
        token
          .children
          .as_deref()
          .map(|children| self.render_tokens(children))
          .unwrap_or_default()
      },
      _ => default_rule(tokens, idx),
    }
  }

  /// Render Markdown to HTML, extracting headings, title and word count.
  ///
  /// # Errors
  ///
  /// Fails when word counting fails; such documents have a defect that
  /// should stop generation rather than publish a wrong estimate.
  pub fn render(&self, markdown: &str) -> MarkupResult<RenderedDocument> {
    let tokens = self.parse(markdown);
    let word_count = count_words(&tokens)?;
    let (headings, title) = extract_headings(&tokens);
    let html = self.render_tokens(&tokens);
    debug!(
      "Rendered document: {} headings, {word_count} words",
      headings.len()
    );

    Ok(RenderedDocument {
      html,
      headings,
      title,
      word_count,
      reading_minutes: reading_minutes(word_count, self.options.words_per_minute),
    })
  }

  /// Build comrak options from `MarkdownOptions` and feature flags.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.superscript = true;
      options.extension.autolink = true;
    }
    options.extension.math_dollars = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options.render.r#unsafe = true;
    options
  }
}
