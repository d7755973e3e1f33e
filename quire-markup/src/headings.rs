//! Heading attribute blocks, anchor ids and heading extraction.
//!
//! A heading may end with an attribute block such as
//! `## Setup {#setup .ignore-header}`. The block is stripped from the heading
//! text and its id, classes and `key=value` pairs land on the heading token.
use std::{collections::HashMap, sync::LazyLock};

use log::debug;
use regex::Regex;

use crate::{
  types::{Container, Heading, Token, TokenKind, plain_text},
  utils,
};

static ATTR_BLOCK_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(r"\s*\{([^{}]*)\}\s*$")
    .map_err(|e| log::error!("Failed to compile ATTR_BLOCK_RE regex: {e}"))
    .ok()
});

/// Attributes parsed from a `{...}` block.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HeadingAttributes {
  pub id:      Option<String>,
  pub classes: Vec<String>,
  pub other:   Vec<(String, String)>,
}

/// Parse the inside of an attribute block.
///
/// Returns `None` unless every part is an `#id`, a `.class` or a
/// `key=value` pair, so that ordinary braces in heading text survive.
#[must_use]
pub fn parse_attributes(inner: &str) -> Option<HeadingAttributes> {
  let mut attrs = HeadingAttributes::default();
  let mut seen = false;
  for part in inner.split_whitespace() {
    seen = true;
    if let Some(id) = part.strip_prefix('#') {
      if id.is_empty() {
        return None;
      }
      attrs.id = Some(id.to_string());
    } else if let Some(class) = part.strip_prefix('.') {
      if class.is_empty() {
        return None;
      }
      attrs.classes.push(class.to_string());
    } else if let Some((key, value)) = part.split_once('=') {
      if key.is_empty() {
        return None;
      }
      attrs
        .other
        .push((key.to_string(), value.trim_matches('"').to_string()));
    } else {
      return None;
    }
  }
  seen.then_some(attrs)
}

/// Strip a trailing attribute block from the last text child of `inline`.
fn take_attribute_block(inline: &mut Token) -> Option<HeadingAttributes> {
  let re = ATTR_BLOCK_RE.as_ref()?;
  let children = inline.children.as_mut()?;
  let last = children.last_mut()?;
  if last.kind != TokenKind::Text {
    return None;
  }
  let caps = re.captures(&last.content)?;
  let attrs = parse_attributes(caps.get(1)?.as_str())?;
  let start = caps.get(0)?.start();
  last.content.truncate(start);
  if last.content.is_empty() {
    children.pop();
  }
  inline.content = plain_text(children);
  Some(attrs)
}

fn is_heading_open(token: &Token) -> bool {
  matches!(token.kind, TokenKind::Open(Container::Heading(_)))
}

/// Move trailing attribute blocks onto their heading tokens.
pub fn apply_heading_attributes(tokens: &mut [Token]) {
  for idx in 0..tokens.len().saturating_sub(1) {
    if !is_heading_open(&tokens[idx]) || tokens[idx + 1].kind != TokenKind::Inline
    {
      continue;
    }
    let Some(attrs) = take_attribute_block(&mut tokens[idx + 1]) else {
      continue;
    };
    let heading = &mut tokens[idx];
    if let Some(id) = attrs.id {
      heading.attrs.push(("id".to_string(), id));
    }
    if !attrs.classes.is_empty() {
      heading.attrs.push(("class".to_string(), attrs.classes.join(" ")));
    }
    heading.attrs.extend(attrs.other);
  }
}

/// Give every heading an `id`, slugifying its text when none was set.
///
/// Repeated slugs get `-1`, `-2`, ... suffixes in document order.
pub fn assign_heading_ids(tokens: &mut [Token]) {
  let mut used: HashMap<String, usize> = HashMap::new();
  for idx in 0..tokens.len() {
    if !is_heading_open(&tokens[idx]) {
      continue;
    }
    if let Some(id) = tokens[idx].attr("id") {
      used.entry(id.to_string()).or_insert(0);
      continue;
    }
    let text = tokens
      .get(idx + 1)
      .filter(|next| next.kind == TokenKind::Inline)
      .map(|next| plain_text(next.children.as_deref().unwrap_or(&[])))
      .unwrap_or_default();
    let base = utils::slugify(&text);
    let id = match used.get_mut(&base) {
      Some(count) => {
        *count += 1;
        format!("{base}-{count}")
      },
      None => base.clone(),
    };
    used.entry(base).or_insert(0);
    used.entry(id.clone()).or_insert(0);
    debug!("Assigned heading id '{id}'");
    tokens[idx].attrs.insert(0, ("id".to_string(), id));
  }
}

/// Extract headings in document order, plus the first level-1 heading as
/// the document title.
#[must_use]
pub fn extract_headings(tokens: &[Token]) -> (Vec<Heading>, Option<String>) {
  let mut headings = Vec::new();
  let mut title = None;

  for (idx, token) in tokens.iter().enumerate() {
    let TokenKind::Open(Container::Heading(level)) = token.kind else {
      continue;
    };
    let text = tokens
      .get(idx + 1)
      .filter(|next| next.kind == TokenKind::Inline)
      .map(|next| plain_text(next.children.as_deref().unwrap_or(&[])))
      .unwrap_or_default();
    let text = text.trim().to_string();
    if level == 1 && title.is_none() {
      title = Some(text.clone());
    }
    headings.push(Heading {
      level,
      id: token.attr("id").unwrap_or_default().to_string(),
      classes: token
        .attr("class")
        .map(|classes| classes.split_whitespace().map(String::from).collect())
        .unwrap_or_default(),
      title: text,
    });
  }

  (headings, title)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn heading(level: u8, text: &str) -> [Token; 3] {
    [
      Token::open(Container::Heading(level)),
      Token::inline(vec![Token::text(text)]),
      Token::close(Container::Heading(level)),
    ]
  }

  #[test]
  fn test_parse_attributes() {
    let attrs = parse_attributes("#setup .ignore-header data-x=1")
      .expect("attributes should parse");
    assert_eq!(attrs.id.as_deref(), Some("setup"));
    assert_eq!(attrs.classes, vec!["ignore-header"]);
    assert_eq!(attrs.other, vec![("data-x".to_string(), "1".to_string())]);
  }

  #[test]
  fn test_parse_attributes_rejects_plain_braces() {
    assert!(parse_attributes("x").is_none());
    assert!(parse_attributes("").is_none());
    assert!(parse_attributes("# .").is_none());
  }

  #[test]
  fn test_attribute_block_moves_to_heading() {
    let mut tokens = heading(2, "Setup {#install .ignore-header}").to_vec();
    apply_heading_attributes(&mut tokens);
    assert_eq!(tokens[0].attr("id"), Some("install"));
    assert_eq!(tokens[0].attr("class"), Some("ignore-header"));
    assert_eq!(tokens[1].content, "Setup");
  }

  #[test]
  fn test_plain_braces_are_kept() {
    let mut tokens = heading(2, "Sets {a, b}").to_vec();
    apply_heading_attributes(&mut tokens);
    assert!(tokens[0].attrs.is_empty());
    assert_eq!(tokens[1].content, "Sets {a, b}");
  }

  #[test]
  fn test_duplicate_slugs_get_suffixes() {
    let mut tokens: Vec<Token> = [heading(2, "FAQ"), heading(2, "FAQ"), heading(3, "FAQ")]
      .into_iter()
      .flatten()
      .collect();
    assign_heading_ids(&mut tokens);
    let (headings, title) = extract_headings(&tokens);
    assert!(title.is_none());
    let ids: Vec<&str> = headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["faq", "faq-1", "faq-2"]);
  }

  #[test]
  fn test_title_is_first_h1() {
    let mut tokens: Vec<Token> =
      [heading(1, "Post"), heading(2, "Intro"), heading(1, "Other")]
        .into_iter()
        .flatten()
        .collect();
    assign_heading_ids(&mut tokens);
    let (headings, title) = extract_headings(&tokens);
    assert_eq!(title.as_deref(), Some("Post"));
    assert_eq!(headings.len(), 3);
    assert_eq!(headings[1].level, 2);
  }
}
