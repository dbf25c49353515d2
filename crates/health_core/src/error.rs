//! Dashboard error types
//!
//! Loading failures are fatal to rendering; missing targets only skip the
//! step they belong to.

use std::fmt;

use thiserror::Error;

use crate::dataset::Resource;
use crate::view::{ChartSlot, Target};

/// Why a single dataset resource could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// The transport answered with a non-success status
    Status(u16),
    /// The request never produced a response
    Transport(String),
    /// The body is not valid JSON for the expected document
    Malformed(String),
    /// The body parsed but violates a dataset invariant
    Shape(String),
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status {status}"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Malformed(message) => write!(f, "malformed JSON: {message}"),
            Self::Shape(message) => write!(f, "unexpected shape: {message}"),
        }
    }
}

/// Errors raised while loading datasets or constructing views
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// A dataset could not be fetched, parsed or validated
    #[error("Data unavailable: {} ({failure})", resource.path())]
    DataUnavailable {
        resource: Resource,
        failure: LoadFailure,
    },

    /// The page has no container for this render step
    #[error("Missing render target: {0}")]
    MissingTarget(Target),

    /// A chart was drawn into a canvas that still holds a live chart
    #[error("Chart canvas already in use: {0}")]
    CanvasInUse(ChartSlot),
}

impl DashboardError {
    pub const fn data_unavailable(resource: Resource, failure: LoadFailure) -> Self {
        Self::DataUnavailable { resource, failure }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
