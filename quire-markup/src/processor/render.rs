//! Default HTML rendering for every token type.
//!
//! These are the fallbacks used when no render rule is registered for a
//! token's type name.
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::types::{Container, Token, TokenKind, plain_text};

fn render_attrs(token: &Token) -> String {
  let mut out = String::new();
  for (name, value) in &token.attrs {
    let _ = write!(out, " {name}=\"{}\"", encode_double_quoted_attribute(value));
  }
  out
}

fn render_open(tokens: &[Token], idx: usize, container: Container) -> String {
  let token = &tokens[idx];
  if token.hidden {
    return String::new();
  }
  let mut out = format!("<{}{}>", container.tag(), render_attrs(token));
  let next_is_inline = tokens
    .get(idx + 1)
    .is_some_and(|next| next.kind == TokenKind::Inline || next.hidden);
  if container.is_block() && !next_is_inline {
    out.push('\n');
  }
  out
}

fn render_close(token: &Token, container: Container) -> String {
  if token.hidden {
    return String::new();
  }
  if container.is_block() {
    format!("</{}>\n", container.tag())
  } else {
    format!("</{}>", container.tag())
  }
}

fn render_fence(token: &Token) -> String {
  let code = encode_text(&token.content);
  match token.info.split_whitespace().next() {
    Some(lang) => {
      format!(
        "<pre><code class=\"language-{}\">{code}</code></pre>\n",
        encode_double_quoted_attribute(lang)
      )
    },
    None => format!("<pre><code>{code}</code></pre>\n"),
  }
}

fn render_image(token: &Token) -> String {
  let alt = token
    .children
    .as_deref()
    .map_or_else(|| token.content.clone(), plain_text);
  format!(
    "<img alt=\"{}\"{} />",
    encode_double_quoted_attribute(&alt),
    render_attrs(token)
  )
}

fn render_footnote_ref(token: &Token) -> String {
  let label = encode_double_quoted_attribute(token.attr("label").unwrap_or(""));
  format!(
    "<sup class=\"footnote-ref\"><a href=\"#fn-{label}\" \
     id=\"fnref-{label}\">{label}</a></sup>"
  )
}

/// Render a single token with the built-in rules.
///
/// `inline` tokens are not handled here: their children are rendered through
/// the processor so that registered rules apply to them as well.
pub(crate) fn default_rule(tokens: &[Token], idx: usize) -> String {
  let token = &tokens[idx];
  match &token.kind {
    TokenKind::Open(container) => render_open(tokens, idx, *container),
    TokenKind::Close(container) => render_close(token, *container),
    TokenKind::Text | TokenKind::Nobr | TokenKind::Other(_) => {
      encode_text(&token.content).into_owned()
    },
    TokenKind::Softbreak => String::from("\n"),
    TokenKind::Hardbreak => String::from("<br />\n"),
    TokenKind::Hr => String::from("<hr />\n"),
    TokenKind::Fence => render_fence(token),
    TokenKind::CodeBlock => {
      format!("<pre><code>{}</code></pre>\n", encode_text(&token.content))
    },
    TokenKind::CodeInline => {
      format!("<code>{}</code>", encode_text(&token.content))
    },
    TokenKind::HtmlBlock | TokenKind::HtmlInline | TokenKind::Emoji => {
      token.content.clone()
    },
    TokenKind::MathInline => {
      format!(
        "<span class=\"math math-inline\">{}</span>",
        encode_text(&token.content)
      )
    },
    TokenKind::MathBlock => {
      format!(
        "<div class=\"math math-display\">{}</div>\n",
        encode_text(&token.content)
      )
    },
    TokenKind::Image => render_image(token),
    TokenKind::FootnoteRef => render_footnote_ref(token),
    TokenKind::Inline => plain_text(token.children.as_deref().unwrap_or(&[])),
  }
}
