//! Error types for token-tree processing.

/// Result type for markup operations.
pub type MarkupResult<T> = Result<T, MarkupError>;

/// Errors raised while analysing a token tree or its metadata.
///
/// Both token errors are authoring or parser defects: they should stop
/// generation of the affected document rather than degrade its output.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
  #[error("Token of type '{kind}' has no children but requires them")]
  MissingChildren { kind: String },

  #[error("Token of type '{kind}' has children but must be a leaf")]
  UnexpectedChildren { kind: String },

  #[error("Unrecognized token type '{kind}' with content {content:?}")]
  UnrecognizedToken { kind: String, content: String },

  #[error("Invalid front matter: {0}")]
  FrontMatter(#[from] serde_yaml::Error),

  #[error("Invalid date '{0}' in front matter")]
  InvalidDate(String),

  #[error("Regex compilation failed: {0}")]
  Regex(#[from] regex::Error),
}

impl MarkupError {
  /// Whether this is a structural-consistency error (children present or
  /// absent where the token type implies otherwise).
  #[must_use]
  pub const fn is_structural(&self) -> bool {
    matches!(
      self,
      Self::MissingChildren { .. } | Self::UnexpectedChildren { .. }
    )
  }
}
