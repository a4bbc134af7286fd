//! Clipboard format detection and decoding.
//!
//! The crate ships no concrete schematic decoder; hosts register the formats
//! they support and the registry resolves a file to a decoder by extension
//! first, then by probing leading bytes. Detection is automatic per file,
//! never configured per call.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use crate::constants::detection::PROBE_BYTES;
use crate::world::Clipboard;

pub type FormatResult<T> = Result<T, FormatError>;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed schematic data: {0}")]
    Malformed(String),

    #[error("unexpected end of data")]
    UnexpectedEof,
}

/// One recognized schematic encoding.
pub trait ClipboardFormat: Send + Sync {
    /// Short identifier, e.g. "sponge".
    fn name(&self) -> &str;

    /// File extensions (without the dot) claimed by this format.
    fn extensions(&self) -> &[&str];

    /// Content probe over the leading bytes of a file.
    fn matches(&self, header: &[u8]) -> bool;

    /// Decode a full clipboard from the stream.
    fn read(&self, reader: &mut dyn Read) -> FormatResult<Clipboard>;
}

/// Ordered collection of registered formats.
///
/// Registration order is the tie-breaker when several formats claim the same
/// extension or probe.
pub struct FormatRegistry {
    formats: Vec<Arc<dyn ClipboardFormat>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    pub fn register(&mut self, format: Arc<dyn ClipboardFormat>) {
        log::debug!("[FormatRegistry] registered format '{}'", format.name());
        self.formats.push(format);
    }

    pub fn formats(&self) -> &[Arc<dyn ClipboardFormat>] {
        &self.formats
    }

    /// Resolve a decoder for the file at `path`.
    ///
    /// Returns `Ok(None)` when no registered format claims the file, which
    /// callers surface as an unknown-format condition rather than an error
    /// here.
    pub fn find_by_file(&self, path: &Path) -> FormatResult<Option<Arc<dyn ClipboardFormat>>> {
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            for format in &self.formats {
                if format
                    .extensions()
                    .iter()
                    .any(|claimed| claimed.eq_ignore_ascii_case(extension))
                {
                    return Ok(Some(Arc::clone(format)));
                }
            }
        }

        let mut header = Vec::with_capacity(PROBE_BYTES);
        File::open(path)?
            .take(PROBE_BYTES as u64)
            .read_to_end(&mut header)?;

        for format in &self.formats {
            if format.matches(&header) {
                return Ok(Some(Arc::clone(format)));
            }
        }

        Ok(None)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
