//! Error types for the paste pipeline.
//!
//! Each stage of a paste keeps its own failure variant so callers can tell a
//! missing file apart from a decoder rejection or an engine fault. Module
//! errors ([`FormatError`], [`EngineError`]) are wrapped, never flattened,
//! so the original cause stays reachable through `source()`.

use std::path::PathBuf;

use crate::engine::EngineError;
use crate::format::FormatError;

/// Result alias used throughout the crate.
pub type SchematicResult<T> = Result<T, SchematicError>;

#[derive(Debug, thiserror::Error)]
pub enum SchematicError {
    /// No file with the requested name under the schematics directory.
    #[error("schematic file not found: {name}")]
    NotFound { name: String },

    /// File exists but no registered format recognized it.
    #[error("unknown schematic format: {name}")]
    UnknownFormat { name: String },

    /// A format matched the file but failed to decode it.
    #[error("failed to decode schematic {name}")]
    Decode {
        name: String,
        #[source]
        source: FormatError,
    },

    /// The engine rejected or aborted the placement step.
    #[error("paste operation failed")]
    Placement {
        #[source]
        source: EngineError,
    },

    /// The engine failed while reversing a tracked edit. The handle has
    /// already been released by the time this is reported.
    #[error("undo operation failed")]
    Reversal {
        #[source]
        source: EngineError,
    },

    #[error("io error for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An async operation's completion channel was torn down before the
    /// operation ran, usually because the scheduler shut down.
    #[error("channel closed: {name}")]
    ChannelClosed { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchematicError::NotFound {
            name: "castle.schem".to_string(),
        };
        assert_eq!(err.to_string(), "schematic file not found: castle.schem");
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error;

        let err = SchematicError::Placement {
            source: EngineError::Placement("world unloaded".to_string()),
        };
        let source = err.source().expect("placement error carries a source");
        assert_eq!(source.to_string(), "placement failed: world unloaded");
    }
}
