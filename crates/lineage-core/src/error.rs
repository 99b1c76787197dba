//! Error types for `lineage-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Client-side required-field check failed; no request may be issued.
  #[error("please fill out all required fields: {}", .0.join(", "))]
  MissingRequired(Vec<&'static str>),

  #[error("unknown relationship kind: {0:?}")]
  UnknownRelationshipKind(String),

  #[error("malformed drag payload: {0:?}")]
  MalformedDragPayload(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
