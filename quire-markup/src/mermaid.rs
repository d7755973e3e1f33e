//! Renders ```` ```mermaid ```` fences as diagram sources for mermaid.js.
//!
//! Other fences keep the built-in rendering.
use std::sync::Arc;

use html_escape::encode_text;

use crate::{
  processor::{MarkdownProcessor, MarkupPlugin, render::default_rule},
  types::Token,
};

/// Fence info string that marks a diagram.
pub const MERMAID_INFO: &str = "mermaid";

/// Render the fence at `idx`, as `<pre class="mermaid">` when its info string
/// is exactly `mermaid`.
#[must_use]
pub fn render_fence(tokens: &[Token], idx: usize) -> String {
  let token = &tokens[idx];
  if token.info == MERMAID_INFO {
    format!("<pre class=\"mermaid\">{}</pre>", encode_text(&token.content))
  } else {
    default_rule(tokens, idx)
  }
}

/// Plugin installing the mermaid `fence` render rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidPlugin;

impl MarkupPlugin for MermaidPlugin {
  fn install(&self, processor: &mut MarkdownProcessor) {
    processor.set_render_rule("fence", Arc::new(render_fence));
  }
}
