//! Typed errors for registry loading, extraction and parsing.

use thiserror::Error;

/// Errors raised while building a [`VocabularyRegistry`](crate::registry::VocabularyRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source parsed as JSON but does not follow the registry schema.
    #[error("malformed registry source: {reason}")]
    Malformed { reason: String },
}

/// Errors that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// An `itemid` could not be turned into an absolute URI.
    #[error("relative itemid {itemid:?} could not be resolved: {reason}")]
    RelativeItemId { itemid: String, reason: String },

    /// An `itemtype` token is not an absolute URI.
    #[error("encountered relative itemtype: {itemtype:?}")]
    RelativeItemType { itemtype: String },

    /// The statement sink failed to accept output.
    #[error("statement sink error: {0}")]
    Sink(#[from] std::io::Error),
}

/// Errors from the parser entry point.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid base URI {base:?}: {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
