//! Schematic paste sessions for live voxel worlds.
//!
//! This crate coordinates the three-step workflow of pasting a pre-built
//! structure file into a running game world: resolve a named schematic under
//! a fixed directory, decode it into an in-memory [`Clipboard`] off the
//! latency-sensitive simulation thread, then apply it through a
//! [`WorldEngine`] on the simulation thread and keep the resulting
//! [`EditHandle`] so the paste can be reversed later.
//!
//! File decoding and block mutation are pluggable: hosts register the
//! [`ClipboardFormat`]s they support and supply the engine that touches live
//! world state. The crate's own core is the hand-off between a background
//! worker pool and the single simulation thread, plus the per-coordinate
//! session table with its "last paste wins" replacement policy.

pub mod constants;
pub mod engine;
pub mod error;
pub mod format;
pub mod scheduler;
pub mod session;
pub mod world;

pub use engine::{EditHandle, EngineError, PasteOptions, WorldEngine};
pub use error::{SchematicError, SchematicResult};
pub use format::{ClipboardFormat, FormatError, FormatRegistry};
pub use scheduler::{Scheduler, Task, ThreadScheduler, ThreadSchedulerConfig};
pub use session::{Completion, ErrorHook, PasteManager, PasteManagerConfig, PasteStats};
pub use world::{BlockId, Clipboard, PastePos, WorldId};
