//! Type definitions for the Markdown processor.
//!
//! Contains the core types used by the processor:
//! - Configuration options (`MarkdownOptions`)
//! - The main processor struct (`MarkdownProcessor`)
//! - The two extension seams: token-tree rewriting rules
//!   ([`TokenTransformer`]) and per-type render overrides ([`RenderRule`])
//!
//! # Examples
//!
//! ```
//! use quire_markup::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   gfm: true,
//!   nobr: true,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use crate::types::Token;

/// Default reading speed used for reading-time estimates.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Install the nobr plugin, which keeps abbreviations such as `C++` on one
  /// line.
  pub nobr: bool,

  /// Install the mermaid plugin, which renders ```` ```mermaid ```` fences as
  /// `<pre class="mermaid">`.
  pub mermaid: bool,

  /// Reading speed used for `reading_minutes`.
  pub words_per_minute: u32,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:              cfg!(feature = "gfm"),
      nobr:             true,
      mermaid:          true,
      words_per_minute: DEFAULT_WORDS_PER_MINUTE,
    }
  }
}

/// A pass that rewrites the token stream after tokenization.
pub trait TokenTransformer: Send + Sync {
  fn transform(&self, tokens: &mut Vec<Token>);
}

impl<F> TokenTransformer for F
where
  F: Fn(&mut Vec<Token>) + Send + Sync,
{
  fn transform(&self, tokens: &mut Vec<Token>) {
    self(tokens);
  }
}

/// Renders `tokens[idx]` to HTML.
pub type RenderRule = Arc<dyn Fn(&[Token], usize) -> String + Send + Sync>;

/// Something that extends a processor with rules.
pub trait MarkupPlugin {
  fn install(&self, processor: &mut MarkdownProcessor);
}

/// Main Markdown processor.
///
/// Cheap to clone; rules are shared behind `Arc`.
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:      MarkdownOptions,
  pub(crate) core_rules:   Vec<(String, Arc<dyn TokenTransformer>)>,
  pub(crate) render_rules: HashMap<String, RenderRule>,
}

impl fmt::Debug for MarkdownProcessor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut render_rules: Vec<&str> =
      self.render_rules.keys().map(String::as_str).collect();
    render_rules.sort_unstable();
    f.debug_struct("MarkdownProcessor")
      .field("options", &self.options)
      .field(
        "core_rules",
        &self
          .core_rules
          .iter()
          .map(|(name, _)| name.as_str())
          .collect::<Vec<_>>(),
      )
      .field("render_rules", &render_rules)
      .finish()
  }
}
