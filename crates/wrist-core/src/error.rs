//! Error taxonomy for the UI core.
//!
//! Most misconfiguration is corrected on the spot (values are clamped,
//! bounds swapped) and an event nobody claims is reported as
//! [`EventResult::Unprocessed`], which is a normal outcome rather than an
//! error. [`UiError`] covers what is left: stale handles and operations the
//! current state cannot honour.

use thiserror_no_std::Error;

/// Errors returned by fallible UI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UiError {
    /// The controller has no current tile yet
    #[error("UI not initialized: no current tile selected")]
    NotInitialized,

    /// A configuration value could not be used even after clamping
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Operation not valid for this widget kind, image format or mode
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Tile handle does not belong to this controller
    #[error("Unknown tile handle: {0}")]
    UnknownTile(usize),

    /// Widget handle does not belong to this controller
    #[error("Unknown widget handle: {0}")]
    UnknownWidget(usize),
}

/// Result type for UI operations
pub type UiResult<T> = Result<T, UiError>;

/// Outcome of delivering an event to a widget or tile handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// A handler consumed the event
    Processed,
    /// Nobody claimed the event; the caller may try the next candidate
    Unprocessed,
}

impl EventResult {
    pub fn is_processed(self) -> bool {
        matches!(self, EventResult::Processed)
    }

    pub fn from_bool(processed: bool) -> Self {
        if processed {
            EventResult::Processed
        } else {
            EventResult::Unprocessed
        }
    }
}
