//! Error types for board and engine operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::engine::ItemId;

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Result type for native engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the board wrapper itself.
///
/// Engine failures pass through untouched in [`BoardError::Engine`].
#[derive(Debug, Error)]
pub enum BoardError {
    /// No module on the board carries the requested reference.
    #[error("No module with reference: {reference}")]
    NotFound {
        /// Reference that was looked up.
        reference: String,
    },

    /// The engine placed an item of a different kind than was submitted.
    #[error("Engine returned an unexpected item kind for {id}")]
    UnexpectedItem {
        /// Identifier of the placed item.
        id: ItemId,
    },

    /// Error reported by the native engine.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl BoardError {
    /// Creates a not-found error.
    pub fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            reference: reference.into(),
        }
    }

    /// Returns true if this is a lookup miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that can occur inside the native engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to open or read a board file.
    #[error("Failed to read board file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write a board file.
    #[error("Failed to write board file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Board file contents could not be parsed.
    #[error("Failed to parse board file: {path}")]
    Parse {
        /// Path to the file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Board could not be serialised.
    #[error("Failed to serialise board")]
    Serialize {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Unsupported snapshot version.
    #[error("Unsupported board file version: {version}")]
    UnsupportedVersion {
        /// Version number found in the file.
        version: u32,
    },

    /// A module with the same reference is already on the board.
    #[error("Duplicate module reference: {reference}")]
    DuplicateReference {
        /// The clashing reference.
        reference: String,
    },

    /// An item with the same identifier is already on the board.
    #[error("Duplicate item id: {id}")]
    DuplicateItem {
        /// The clashing identifier.
        id: ItemId,
    },

    /// Layer name is not known to the engine.
    #[error("Unknown layer: {name}")]
    UnknownLayer {
        /// Layer name as given.
        name: String,
    },

    /// Item geometry was rejected.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of what's wrong.
        message: String,
    },

    /// Save was requested on a board that has no file name.
    #[error("Board has no file name")]
    NoFileName,

    /// No board is open in the editor session.
    #[error("No board is open in the editor session")]
    NoActiveSession,
}

impl EngineError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a duplicate reference error.
    pub fn duplicate_reference(reference: impl Into<String>) -> Self {
        Self::DuplicateReference {
            reference: reference.into(),
        }
    }

    /// Creates an unknown layer error.
    pub fn unknown_layer(name: impl Into<String>) -> Self {
        Self::UnknownLayer { name: name.into() }
    }

    /// Creates an invalid geometry error.
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}
