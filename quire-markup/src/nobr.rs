//! Keeps abbreviations such as `C++` from being broken across lines.
//!
//! The core rule runs after tokenization and splits every `text` token inside
//! an `inline` container into plain `text` spans and `nobr` spans. The render
//! rule wraps `nobr` content in `<nobr>` at output time.
use std::sync::{Arc, LazyLock};

use html_escape::encode_text;
use regex::Regex;

use crate::{
  error::MarkupResult,
  processor::{MarkdownProcessor, MarkupPlugin},
  types::{Token, TokenKind},
};

/// Characters that glue onto a match on either side.
const WORD_CHARS: &str = r"[\p{Alphabetic}\p{Number}\p{Connector_Punctuation}\p{Join_Control}]*";

/// Default pattern: `c++` with any adjoining word characters, case
/// insensitive.
#[must_use]
pub fn cpp_pattern() -> String {
  format!(r"(?i){WORD_CHARS}c\+\+{WORD_CHARS}")
}

static CPP_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(&cpp_pattern())
    .map_err(|e| log::error!("Failed to compile CPP_RE regex: {e}"))
    .ok()
});

/// Split `text` into alternating `text` and `nobr` tokens.
///
/// Concatenating the contents of the result yields `text` again. Adjacent
/// matches produce no empty `text` token between them.
#[must_use]
pub fn split_text(text: &str, pattern: &Regex) -> Vec<Token> {
  let mut nodes = Vec::new();
  let mut last_pos = 0;

  for found in pattern.find_iter(text) {
    if found.start() > last_pos {
      nodes.push(Token::text(&text[last_pos..found.start()]));
    }
    nodes.push(Token::new(TokenKind::Nobr, found.as_str()));
    last_pos = found.end();
  }

  if last_pos < text.len() {
    nodes.push(Token::text(&text[last_pos..]));
  }

  nodes
}

/// Apply [`split_text`] to every `text` child of every `inline` token.
///
/// Children are visited from the end so that splicing replacements in never
/// shifts a child that has not been visited yet.
pub fn split_inline_tokens(tokens: &mut [Token], pattern: &Regex) {
  for block in tokens.iter_mut() {
    if block.kind != TokenKind::Inline {
      continue;
    }
    let Some(children) = block.children.as_mut() else {
      continue;
    };
    for idx in (0..children.len()).rev() {
      let child = &children[idx];
      if child.kind == TokenKind::Text && pattern.is_match(&child.content) {
        let replacement = split_text(&child.content, pattern);
        children.splice(idx..=idx, replacement);
      }
    }
  }
}

/// Plugin installing the nobr core rule and render rule.
#[derive(Debug, Clone)]
pub struct NobrPlugin {
  pattern: Regex,
}

impl NobrPlugin {
  /// Plugin matching the default `c++` pattern.
  ///
  /// Returns `None` only if the built-in pattern failed to compile, which is
  /// logged when it happens.
  #[must_use]
  pub fn new() -> Option<Self> {
    CPP_RE.clone().map(|pattern| Self { pattern })
  }

  /// Plugin matching a custom pattern. Prefix with `(?i)` for case
  /// insensitivity.
  ///
  /// # Errors
  ///
  /// Returns an error if the pattern does not compile.
  pub fn with_pattern(pattern: &str) -> MarkupResult<Self> {
    Ok(Self {
      pattern: Regex::new(pattern)?,
    })
  }

  #[must_use]
  pub const fn pattern(&self) -> &Regex {
    &self.pattern
  }
}

impl MarkupPlugin for NobrPlugin {
  fn install(&self, processor: &mut MarkdownProcessor) {
    processor.set_render_rule(
      "nobr",
      Arc::new(|tokens: &[Token], idx: usize| {
        format!("<nobr>{}</nobr>", encode_text(&tokens[idx].content))
      }),
    );
    let pattern = self.pattern.clone();
    processor.add_core_rule("nobr", move |tokens: &mut Vec<Token>| {
      split_inline_tokens(tokens, &pattern);
    });
  }
}
