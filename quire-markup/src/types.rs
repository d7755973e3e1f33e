//! Types for quire-markup public API and internal use.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Paired structures that open and close around other tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
  Paragraph,
  Heading(u8),
  BulletList,
  OrderedList,
  ListItem,
  Blockquote,
  Table,
  TableRow,
  TableHeader,
  TableCell,
  Link,
  Emphasis,
  Strong,
  Strikethrough,
  Superscript,
  Subscript,
  Footnote,
}

impl Container {
  /// Name used in the token vocabulary (without the `_open`/`_close` suffix).
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Paragraph => "paragraph",
      Self::Heading(_) => "heading",
      Self::BulletList => "bullet_list",
      Self::OrderedList => "ordered_list",
      Self::ListItem => "list_item",
      Self::Blockquote => "blockquote",
      Self::Table => "table",
      Self::TableRow => "tr",
      Self::TableHeader => "th",
      Self::TableCell => "td",
      Self::Link => "link",
      Self::Emphasis => "em",
      Self::Strong => "strong",
      Self::Strikethrough => "s",
      Self::Superscript => "sup",
      Self::Subscript => "sub",
      Self::Footnote => "footnote",
    }
  }

  /// HTML element the container renders to.
  #[must_use]
  pub const fn tag(self) -> &'static str {
    match self {
      Self::Paragraph => "p",
      Self::Heading(1) => "h1",
      Self::Heading(2) => "h2",
      Self::Heading(3) => "h3",
      Self::Heading(4) => "h4",
      Self::Heading(5) => "h5",
      Self::Heading(_) => "h6",
      Self::BulletList => "ul",
      Self::OrderedList => "ol",
      Self::ListItem => "li",
      Self::Blockquote => "blockquote",
      Self::Table => "table",
      Self::TableRow => "tr",
      Self::TableHeader => "th",
      Self::TableCell => "td",
      Self::Link => "a",
      Self::Emphasis => "em",
      Self::Strong => "strong",
      Self::Strikethrough => "s",
      Self::Superscript => "sup",
      Self::Subscript => "sub",
      Self::Footnote => "li",
    }
  }

  /// Whether the container lives at block level (rendered with line breaks).
  #[must_use]
  pub const fn is_block(self) -> bool {
    !matches!(
      self,
      Self::Link
        | Self::Emphasis
        | Self::Strong
        | Self::Strikethrough
        | Self::Superscript
        | Self::Subscript
    )
  }
}

/// Token type tag.
///
/// Structural tokens come in `Open`/`Close` pairs; every other variant is a
/// leaf, except [`TokenKind::Inline`] which always carries children.
/// [`TokenKind::Other`] holds types produced by third-party rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
  Open(Container),
  Close(Container),
  Inline,
  Text,
  Nobr,
  Softbreak,
  Hardbreak,
  Hr,
  Fence,
  CodeBlock,
  CodeInline,
  HtmlBlock,
  HtmlInline,
  MathInline,
  MathBlock,
  Emoji,
  Image,
  FootnoteRef,
  Other(String),
}

impl TokenKind {
  /// The type name as used by render rules, e.g. `paragraph_open` or `nobr`.
  #[must_use]
  pub fn name(&self) -> Cow<'_, str> {
    match self {
      Self::Open(c) => Cow::Owned(format!("{}_open", c.name())),
      Self::Close(c) => Cow::Owned(format!("{}_close", c.name())),
      Self::Inline => Cow::Borrowed("inline"),
      Self::Text => Cow::Borrowed("text"),
      Self::Nobr => Cow::Borrowed("nobr"),
      Self::Softbreak => Cow::Borrowed("softbreak"),
      Self::Hardbreak => Cow::Borrowed("hardbreak"),
      Self::Hr => Cow::Borrowed("hr"),
      Self::Fence => Cow::Borrowed("fence"),
      Self::CodeBlock => Cow::Borrowed("code_block"),
      Self::CodeInline => Cow::Borrowed("code_inline"),
      Self::HtmlBlock => Cow::Borrowed("html_block"),
      Self::HtmlInline => Cow::Borrowed("html_inline"),
      Self::MathInline => Cow::Borrowed("math_inline"),
      Self::MathBlock => Cow::Borrowed("math_block"),
      Self::Emoji => Cow::Borrowed("emoji"),
      Self::Image => Cow::Borrowed("image"),
      Self::FootnoteRef => Cow::Borrowed("footnote_ref"),
      Self::Other(name) => Cow::Borrowed(name.as_str()),
    }
  }
}

/// A node of the token tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
  pub kind:     TokenKind,
  /// Text payload. Empty for structural tokens.
  pub content:  String,
  /// Present only for container-like leaves (`inline`, `image`).
  pub children: Option<Vec<Self>>,
  /// HTML attributes, in insertion order.
  pub attrs:    Vec<(String, String)>,
  /// Fence info string.
  pub info:     String,
  /// Rendered without its tag (tight list paragraphs).
  pub hidden:   bool,
}

impl Token {
  #[must_use]
  pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
    Self {
      kind,
      content: content.into(),
      children: None,
      attrs: Vec::new(),
      info: String::new(),
      hidden: false,
    }
  }

  #[must_use]
  pub fn text(content: impl Into<String>) -> Self {
    Self::new(TokenKind::Text, content)
  }

  #[must_use]
  pub fn open(container: Container) -> Self {
    Self::new(TokenKind::Open(container), "")
  }

  #[must_use]
  pub fn close(container: Container) -> Self {
    Self::new(TokenKind::Close(container), "")
  }

  /// An `inline` container over `children`; its content is their plain text.
  #[must_use]
  pub fn inline(children: Vec<Self>) -> Self {
    let content = plain_text(&children);
    Self {
      children: Some(children),
      ..Self::new(TokenKind::Inline, content)
    }
  }

  #[must_use]
  pub fn with_attr(
    mut self,
    name: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.attrs.push((name.into(), value.into()));
    self
  }

  /// Look up an attribute value.
  #[must_use]
  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }
}

/// Concatenate the text-bearing content of an inline token stream.
#[must_use]
pub fn plain_text(tokens: &[Token]) -> String {
  let mut out = String::new();
  for token in tokens {
    match token.kind {
      TokenKind::Text | TokenKind::Nobr | TokenKind::CodeInline => {
        out.push_str(&token.content);
      },
      TokenKind::Softbreak | TokenKind::Hardbreak => out.push(' '),
      TokenKind::Image | TokenKind::Inline => {
        if let Some(children) = &token.children {
          out.push_str(&plain_text(children));
        }
      },
      _ => {},
    }
  }
  out
}

/// A heading found in a token stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading level (1-6).
  pub level:   u8,
  /// Heading text with any attribute block removed.
  pub title:   String,
  /// Explicit or generated anchor ID.
  pub id:      String,
  /// Classes from the attribute block, e.g. `ignore-header`.
  pub classes: Vec<String>,
}

/// Result of rendering a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderedDocument {
  /// Rendered HTML output.
  pub html: String,

  /// Headings in document order.
  pub headings: Vec<Heading>,

  /// Title of the document, if found (first level-1 heading).
  pub title: Option<String>,

  /// Estimated number of words.
  pub word_count: usize,

  /// Estimated reading time in whole minutes.
  pub reading_minutes: u64,
}
