//! Markdown processing: tokenization, rule registries and rendering.
//!
//! - [`core`]: processor implementation and the parse/render pipeline
//! - `lower`: comrak AST to token stream
//! - `render`: built-in render rules
//! - [`types`]: options, the processor struct and extension traits
pub mod core;
mod lower;
pub(crate) mod render;
pub mod types;

pub use types::{
  DEFAULT_WORDS_PER_MINUTE,
  MarkdownOptions,
  MarkdownProcessor,
  MarkupPlugin,
  RenderRule,
  TokenTransformer,
};
