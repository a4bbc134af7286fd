//! Core world data types.
//!
//! Value types shared between format decoders, the mutation engine, and the
//! session manager. Nothing here touches live world state.

mod block;
mod clipboard;
mod position;

pub use block::BlockId;
pub use clipboard::Clipboard;
pub use position::{PastePos, WorldId};
