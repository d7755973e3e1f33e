//! Lowering of the comrak AST into a flat token stream.
//!
//! Block structure becomes `*_open`/`*_close` pairs. The text of a paragraph,
//! heading or table cell becomes a single `inline` token whose children are a
//! flat inline stream (emphasis and links are again open/close pairs).
use comrak::nodes::{AstNode, ListType, NodeValue};
use log::trace;

use crate::types::{Container, Token, TokenKind, plain_text};

/// Lower every block under the document root.
pub(crate) fn lower_document<'a>(root: &'a AstNode<'a>) -> Vec<Token> {
  let mut tokens = Vec::new();
  for child in root.children() {
    lower_block(child, false, &mut tokens);
  }
  tokens
}

fn lower_children<'a>(node: &'a AstNode<'a>, tight: bool, out: &mut Vec<Token>) {
  for child in node.children() {
    lower_block(child, tight, out);
  }
}

fn wrap_blocks<'a>(
  node: &'a AstNode<'a>,
  open: Token,
  container: Container,
  tight: bool,
  out: &mut Vec<Token>,
) {
  out.push(open);
  lower_children(node, tight, out);
  out.push(Token::close(container));
}

fn wrap_inline<'a>(
  node: &'a AstNode<'a>,
  container: Container,
  hidden: bool,
  out: &mut Vec<Token>,
) {
  let mut open = Token::open(container);
  let mut close = Token::close(container);
  open.hidden = hidden;
  close.hidden = hidden;
  out.push(open);
  out.push(Token::inline(lower_inlines(node)));
  out.push(close);
}

fn lower_block<'a>(node: &'a AstNode<'a>, tight: bool, out: &mut Vec<Token>) {
  let value = node.data.borrow().value.clone();
  match value {
    NodeValue::FrontMatter(_) => {},
    NodeValue::Paragraph => wrap_inline(node, Container::Paragraph, tight, out),
    NodeValue::Heading(heading) => {
      wrap_inline(node, Container::Heading(heading.level), false, out);
    },
    NodeValue::BlockQuote => {
      wrap_blocks(
        node,
        Token::open(Container::Blockquote),
        Container::Blockquote,
        false,
        out,
      );
    },
    NodeValue::List(list) => {
      let (container, open) = match list.list_type {
        ListType::Bullet => {
          (Container::BulletList, Token::open(Container::BulletList))
        },
        ListType::Ordered => {
          let open = Token::open(Container::OrderedList);
          let open = if list.start == 1 {
            open
          } else {
            open.with_attr("start", list.start.to_string())
          };
          (Container::OrderedList, open)
        },
      };
      wrap_blocks(node, open, container, list.tight, out);
    },
    NodeValue::Item(_) | NodeValue::TaskItem(..) => {
      wrap_blocks(
        node,
        Token::open(Container::ListItem),
        Container::ListItem,
        tight,
        out,
      );
    },
    NodeValue::CodeBlock(block) => {
      let kind = if block.fenced {
        TokenKind::Fence
      } else {
        TokenKind::CodeBlock
      };
      let mut token = Token::new(kind, block.literal.clone());
      token.info = block.info.trim().to_string();
      out.push(token);
    },
    NodeValue::HtmlBlock(block) => {
      out.push(Token::new(TokenKind::HtmlBlock, block.literal.clone()));
    },
    NodeValue::ThematicBreak => out.push(Token::new(TokenKind::Hr, "")),
    NodeValue::Table(_) => {
      wrap_blocks(
        node,
        Token::open(Container::Table),
        Container::Table,
        false,
        out,
      );
    },
    NodeValue::TableRow(header) => {
      let cell = if header {
        Container::TableHeader
      } else {
        Container::TableCell
      };
      out.push(Token::open(Container::TableRow));
      for child in node.children() {
        wrap_inline(child, cell, false, out);
      }
      out.push(Token::close(Container::TableRow));
    },
    NodeValue::FootnoteDefinition(definition) => {
      let open = Token::open(Container::Footnote)
        .with_attr("id", format!("fn-{}", definition.name));
      wrap_blocks(node, open, Container::Footnote, false, out);
    },
    other => {
      trace!("Descending into unmapped block node: {other:?}");
      lower_children(node, tight, out);
    },
  }
}

/// Lower the inline children of `node` into a flat stream.
pub(crate) fn lower_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Token> {
  let mut out = Vec::new();
  for child in node.children() {
    lower_inline(child, &mut out);
  }
  out
}

fn push_text(out: &mut Vec<Token>, text: &str) {
  if let Some(last) = out.last_mut()
    && last.kind == TokenKind::Text
  {
    last.content.push_str(text);
    return;
  }
  out.push(Token::text(text));
}

fn wrap_span<'a>(
  node: &'a AstNode<'a>,
  open: Token,
  container: Container,
  out: &mut Vec<Token>,
) {
  out.push(open);
  for child in node.children() {
    lower_inline(child, out);
  }
  out.push(Token::close(container));
}

fn lower_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<Token>) {
  let value = node.data.borrow().value.clone();
  match value {
    NodeValue::Text(text) => push_text(out, &text),
    NodeValue::SoftBreak => out.push(Token::new(TokenKind::Softbreak, "")),
    NodeValue::LineBreak => out.push(Token::new(TokenKind::Hardbreak, "")),
    NodeValue::Code(code) => {
      out.push(Token::new(TokenKind::CodeInline, code.literal.clone()));
    },
    NodeValue::HtmlInline(html) => {
      out.push(Token::new(TokenKind::HtmlInline, html.clone()));
    },
    NodeValue::Math(math) => {
      let kind = if math.display_math {
        TokenKind::MathBlock
      } else {
        TokenKind::MathInline
      };
      out.push(Token::new(kind, math.literal.clone()));
    },
    NodeValue::Emph => {
      wrap_span(node, Token::open(Container::Emphasis), Container::Emphasis, out);
    },
    NodeValue::Strong => {
      wrap_span(node, Token::open(Container::Strong), Container::Strong, out);
    },
    NodeValue::Strikethrough => {
      wrap_span(
        node,
        Token::open(Container::Strikethrough),
        Container::Strikethrough,
        out,
      );
    },
    NodeValue::Superscript => {
      wrap_span(
        node,
        Token::open(Container::Superscript),
        Container::Superscript,
        out,
      );
    },
    NodeValue::Link(link) => {
      let mut open =
        Token::open(Container::Link).with_attr("href", link.url.clone());
      if !link.title.is_empty() {
        open = open.with_attr("title", link.title.clone());
      }
      wrap_span(node, open, Container::Link, out);
    },
    NodeValue::Image(link) => {
      let alt = lower_inlines(node);
      let mut token = Token::new(TokenKind::Image, plain_text(&alt))
        .with_attr("src", link.url.clone());
      if !link.title.is_empty() {
        token = token.with_attr("title", link.title.clone());
      }
      token.children = Some(alt);
      out.push(token);
    },
    NodeValue::FootnoteReference(reference) => {
      out.push(
        Token::new(TokenKind::FootnoteRef, "")
          .with_attr("label", reference.name.clone()),
      );
    },
    other => {
      trace!("Descending into unmapped inline node: {other:?}");
      for child in node.children() {
        lower_inline(child, out);
      }
    },
  }
}
