//! External world mutation interface.
//!
//! The engine applies a decoded clipboard to live world state and yields an
//! opaque reversible handle. Implementations wrap whatever block mutation
//! backend the host runs; the session manager never inspects handles, it
//! only stores them and hands them back for reversal.

use std::any::Any;
use std::fmt;

use crate::world::{Clipboard, PastePos};

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("placement failed: {0}")]
    Placement(String),

    #[error("reversal failed: {0}")]
    Reversal(String),

    #[error("world not available: {0}")]
    WorldUnavailable(String),

    #[error("handle not recognized by this engine: {0}")]
    BadHandle(String),
}

/// Placement policy flags.
#[derive(Clone, Copy, Debug)]
pub struct PasteOptions {
    /// Skip air cells so existing terrain underneath is preserved.
    pub ignore_air: bool,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self { ignore_air: true }
    }
}

/// Opaque token for one completed, reversible world mutation.
///
/// A handle is owned exclusively by the session manager from the moment it
/// is produced until undo or shutdown. Dropping a handle without reverting
/// makes the mutation permanent.
pub trait EditHandle: Send + fmt::Debug {
    /// Downcast support for the engine that produced the handle.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// Block mutation backend.
///
/// Both methods mutate live world state and must be called from the
/// simulation thread.
pub trait WorldEngine: Send + Sync {
    /// Apply `clipboard` at `target`, returning a handle that can reverse
    /// the mutation.
    fn apply(
        &self,
        clipboard: &Clipboard,
        target: &PastePos,
        options: &PasteOptions,
    ) -> EngineResult<Box<dyn EditHandle>>;

    /// Reverse a previously applied mutation.
    ///
    /// Consumes the handle whether or not reversal succeeds, so engine-side
    /// state is released unconditionally.
    fn revert(&self, handle: Box<dyn EditHandle>) -> EngineResult<()>;
}
