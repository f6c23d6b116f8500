//! Central error types for ReefTag.
//!
//! Most failure modes of the player are recovered locally (a click in a
//! letterbox bar is simply ignored), so only the operations that decline
//! work return these errors. All errors implement `Serialize` so they can be
//! handed to the JavaScript host as plain strings.

use serde::Serialize;
use thiserror::Error;

/// Main error type for ReefTag operations.
#[derive(Error, Debug)]
pub enum ReefTagError {
    /// Video metadata not loaded yet, or the container has no size.
    #[error("Geometry unavailable: {reason}")]
    GeometryUnavailable { reason: String },

    /// The media element has not decoded a frame that can be captured.
    #[error("Frame capture unavailable: {reason}")]
    FrameCaptureUnavailable { reason: String },

    /// The external suggestion service failed.
    #[error("Suggestion service failed: {0}")]
    SuggestionFailed(String),

    /// A draft operation was requested while no draft is open.
    #[error("No tag draft is active")]
    NoActiveDraft,

    /// Tag text was empty after trimming.
    #[error("Tag text must not be empty")]
    EmptyTagText,

    /// A tag belonging to another video was handed to this player.
    #[error("Tag belongs to video {actual}, player is showing {expected}")]
    TagVideoMismatch { expected: String, actual: String },

    /// Tag not present in the session.
    #[error("Tag not found with ID {id}")]
    TagNotFound { id: String },

    /// Tag was already submitted for review and can no longer be changed.
    #[error("Tag {id} has been submitted and is locked")]
    TagLocked { id: String },

    /// Image encoding failed.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Tag store rejected an operation.
    #[error("Tag store error: {0}")]
    StoreError(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ReefTagError {
    pub fn geometry_unavailable(reason: impl Into<String>) -> Self {
        Self::GeometryUnavailable {
            reason: reason.into(),
        }
    }

    pub fn capture_unavailable(reason: impl Into<String>) -> Self {
        Self::FrameCaptureUnavailable {
            reason: reason.into(),
        }
    }
}

/// Serialize as the error message so the host can show it directly.
impl Serialize for ReefTagError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<image::ImageError> for ReefTagError {
    fn from(err: image::ImageError) -> Self {
        ReefTagError::EncodingError(err.to_string())
    }
}

impl From<String> for ReefTagError {
    fn from(msg: String) -> Self {
        ReefTagError::Other(msg)
    }
}

impl From<&str> for ReefTagError {
    fn from(msg: &str) -> Self {
        ReefTagError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, ReefTagResult};
///
/// fn parse(json: &str) -> ReefTagResult<Config> {
///     serde_json::from_str(json).context("failed to parse player config")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to ReefTagError::Other.
    fn context(self, msg: &str) -> ReefTagResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> ReefTagResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> ReefTagResult<T> {
        self.map_err(|e| ReefTagError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ReefTagResult<T> {
        self.map_err(|e| ReefTagError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to ReefTagError::Other with the given message.
    fn context(self, msg: &str) -> ReefTagResult<T>;

    /// Convert None to ReefTagError::Other with a lazily evaluated message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> ReefTagResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> ReefTagResult<T> {
        self.ok_or_else(|| ReefTagError::Other(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ReefTagResult<T> {
        self.ok_or_else(|| ReefTagError::Other(f()))
    }
}

/// Type alias for Results using ReefTagError.
pub type ReefTagResult<T> = Result<T, ReefTagError>;
