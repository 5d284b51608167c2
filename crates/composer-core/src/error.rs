//! Error types.
//!
//! Every error is local and recoverable: a command that fails leaves the document and the
//! selection exactly as they were.

use thiserror::Error;

use crate::encoding::Encoding;

/// An offset or range given in UTF-16 code units could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OffsetError {
    #[error("offset {offset} is out of bounds (length {len})")]
    /// The offset lies past the end of the flattened text.
    OutOfBounds {
        /// Offending offset (UTF-16 code units).
        offset: usize,
        /// Length of the flattened text (UTF-16 code units).
        len: usize,
    },

    #[error("invalid range {start}..{end}")]
    /// `start` is greater than `end`.
    InvalidRange {
        /// Range start (UTF-16 code units).
        start: usize,
        /// Range end (UTF-16 code units).
        end: usize,
    },

    #[error("offset {offset} splits a surrogate pair")]
    /// The offset points between the two halves of a surrogate pair.
    NotCharBoundary {
        /// Offending offset (UTF-16 code units).
        offset: usize,
    },
}

/// A structural mutation or an HTML import would leave the document tree malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("malformed range {start}..{end} (length {len})")]
    /// The range is reversed, out of bounds, or not aligned to characters.
    MalformedRange {
        /// Range start (UTF-16 code units).
        start: usize,
        /// Range end (UTF-16 code units).
        end: usize,
        /// Length of the flattened text (UTF-16 code units).
        len: usize,
    },

    #[error("container <{tag}> is never closed")]
    /// An opening tag has no matching closing tag.
    UnbalancedContainer {
        /// Tag name.
        tag: String,
    },

    #[error("unexpected closing tag </{tag}>")]
    /// A closing tag does not match the innermost open container.
    UnexpectedClosingTag {
        /// Tag name.
        tag: String,
    },

    #[error("unsupported tag <{tag}>")]
    /// The tag has no counterpart in the document model.
    UnsupportedTag {
        /// Tag name.
        tag: String,
    },

    #[error("link target must not be empty")]
    /// A link container was requested with an empty `href`.
    EmptyLink,
}

/// Rendered HTML cannot be represented in the requested character encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Unable to encode string with: {encoding}")]
    /// At least one character has no representation in `encoding`.
    Unencodable {
        /// The requested encoding.
        encoding: Encoding,
    },
}

/// Error returned by [`ComposerModel::execute`](crate::ComposerModel::execute).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposerError {
    #[error(transparent)]
    /// Offset validation failed.
    Offset(#[from] OffsetError),

    #[error(transparent)]
    /// The document model rejected the mutation.
    Model(#[from] ModelError),
}
