//! # quire-markup - token-level Markdown processing
//!
//! Parses Markdown into a flat stream of block tokens whose `inline`
//! containers hold the inline tokens of a block. Core rules rewrite that
//! stream after tokenization, render rules turn it into HTML and the word
//! counter walks it to estimate reading time.
//!
//! ## Quick Start
//!
//! ```rust
//! use quire_markup::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let doc = processor
//!   .render("# On C++\n\nWhy c++ still matters.")
//!   .expect("document should render");
//!
//! assert_eq!(doc.title.as_deref(), Some("On C++"));
//! assert!(doc.html.contains("<nobr>c++</nobr>"));
//! assert_eq!(doc.word_count, 6);
//! ```
//!
//! ## Custom rules
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use quire_markup::{MarkdownOptions, MarkdownProcessor, Token};
//!
//! let mut processor = MarkdownProcessor::new(MarkdownOptions::default());
//! processor.set_render_rule(
//!   "nobr",
//!   Arc::new(|tokens: &[Token], idx: usize| {
//!     format!("<span class=\"nowrap\">{}</span>", tokens[idx].content)
//!   }),
//! );
//! ```

mod error;
pub mod frontmatter;
pub mod headings;
pub mod mermaid;
pub mod nobr;
pub mod processor;
mod types;
pub mod utils;
pub mod words;

pub use crate::{
  error::{MarkupError, MarkupResult},
  frontmatter::{
    PostFrontMatter,
    format_date,
    parse_date,
    parse_timestamp,
    split_front_matter,
  },
  mermaid::MermaidPlugin,
  nobr::NobrPlugin,
  processor::{
    DEFAULT_WORDS_PER_MINUTE,
    MarkdownOptions,
    MarkdownProcessor,
    MarkupPlugin,
    RenderRule,
    TokenTransformer,
  },
  types::{Container, Heading, RenderedDocument, Token, TokenKind, plain_text},
  words::{count_words, reading_minutes},
};
