//! Word counting over token trees and reading-time estimates.
use crate::{
  error::{MarkupError, MarkupResult},
  processor::DEFAULT_WORDS_PER_MINUTE,
  types::{Token, TokenKind},
};

/// Token types whose content is never counted.
const fn is_opaque(kind: &TokenKind) -> bool {
  matches!(
    kind,
    TokenKind::Fence
      | TokenKind::CodeBlock
      | TokenKind::CodeInline
      | TokenKind::HtmlBlock
      | TokenKind::HtmlInline
      | TokenKind::MathInline
      | TokenKind::MathBlock
      | TokenKind::Emoji
      | TokenKind::Image
  )
}

/// Count the words of a token tree.
///
/// `text` and `nobr` contribute their whitespace-separated segments, opaque
/// types (code, HTML, math, emoji, images) contribute nothing and `inline`
/// containers are descended into. Empty tokens of any other type are
/// structural and skipped.
///
/// # Errors
///
/// Returns [`MarkupError::MissingChildren`] for an `inline` token without
/// children, [`MarkupError::UnexpectedChildren`] for a text leaf that has
/// some, and [`MarkupError::UnrecognizedToken`] for a token of any other
/// type that carries content. Unknown types fail loudly so that they get a
/// rule instead of being silently under-counted.
pub fn count_words(tokens: &[Token]) -> MarkupResult<usize> {
  let mut count = 0;
  for token in tokens {
    match &token.kind {
      TokenKind::Text | TokenKind::Nobr => {
        if token.children.as_ref().is_some_and(|c| !c.is_empty()) {
          return Err(MarkupError::UnexpectedChildren {
            kind: token.kind.name().into_owned(),
          });
        }
        count += token.content.split_whitespace().count();
      },
      kind if is_opaque(kind) => {},
      TokenKind::Inline => {
        let children =
          token
            .children
            .as_deref()
            .ok_or_else(|| MarkupError::MissingChildren {
              kind: token.kind.name().into_owned(),
            })?;
        count += count_words(children)?;
      },
      _ if token.content.is_empty() => {},
      kind => {
        return Err(MarkupError::UnrecognizedToken {
          kind:    kind.name().into_owned(),
          content: token.content.clone(),
        });
      },
    }
  }
  Ok(count)
}

/// Whole minutes needed to read `words` at `words_per_minute`, rounded up.
///
/// A speed of zero falls back to the default of 200 words per minute.
#[must_use]
pub fn reading_minutes(words: usize, words_per_minute: u32) -> u64 {
  let wpm = if words_per_minute == 0 {
    DEFAULT_WORDS_PER_MINUTE
  } else {
    words_per_minute
  };
  (words as u64).div_ceil(u64::from(wpm))
}
