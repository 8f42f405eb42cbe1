//! Error types for pattern construction, field extraction, and registration.

use thiserror::Error;

use crate::fields::Path;
use crate::pattern::{PartialUrl, SinglePartialUrl};

/// Errors raised while extracting addressing fields from a request or URL.
///
/// Implementors of [`crate::FieldSource`] return these; the engine propagates
/// them unchanged to the caller of a match or lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The host is not a valid IP address or hostname.
    #[error("invalid host address: {0:?}")]
    InvalidHost(String),

    /// The path is empty or not absolute.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// No port was given and the scheme has no known default.
    #[error("no port and no default port for scheme {scheme:?}")]
    MissingPort {
        /// Scheme the default port was looked up for.
        scheme: String,
    },

    /// The underlying source could not produce the field.
    #[error("field unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by pattern construction, URL completion, and the registry.
#[derive(Debug, Error)]
pub enum Error {
    /// A non-root context path ended in a separator.
    #[error("non-root context path may not end in '/': {0}")]
    ContextPathTrailingSeparator(Path),

    /// A prefix did not end in a separator.
    #[error("prefix does not end in '/': {0}")]
    PrefixMissingSeparator(Path),

    /// Expanding a multi pattern would produce too many combinations.
    #[error("too many combinations: {0}")]
    TooManyCombinations(u64),

    /// A combination was already registered at the exact same five field keys.
    #[error("partial URL already in index: partial = {partial}, combination = {single}, existing = {existing}")]
    AlreadyRegistered {
        /// The pattern being registered.
        partial: Box<PartialUrl>,
        /// The expanded combination that collided.
        single: Box<SinglePartialUrl>,
        /// The pattern already holding that slot.
        existing: Box<PartialUrl>,
    },

    /// A field was unspecified and no field source was provided to fill it.
    #[error("field {0:?} unspecified and no field source provided")]
    MissingField(&'static str),

    /// The completed URL did not parse.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A field source failed to produce a field.
    #[error(transparent)]
    Field(#[from] FieldError),
}
