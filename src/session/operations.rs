//! Paste and undo steps shared by the sync and async APIs.
//!
//! Kept as free functions over the manager's shared state so the worker-pool
//! phase and the simulation-thread continuations run exactly the same code.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use parking_lot::Mutex;

use crate::engine::{EditHandle, PasteOptions, WorldEngine};
use crate::error::{SchematicError, SchematicResult};
use crate::format::{FormatError, FormatRegistry};
use crate::world::{Clipboard, PastePos};

/// Mapping from paste target to the last reversible edit there.
///
/// At most one live handle per coordinate; only simulation-side code inserts
/// or removes entries.
pub(crate) type SessionTable = Mutex<HashMap<PastePos, Box<dyn EditHandle>>>;

/// Resolve `name` under the schematics directory and decode it.
///
/// This is the worker-pool phase of an async paste: pure file I/O and
/// parsing, no world or session-table access.
pub(crate) fn load_clipboard(
    dir: &Path,
    formats: &FormatRegistry,
    name: &str,
) -> SchematicResult<Clipboard> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(SchematicError::NotFound {
            name: name.to_string(),
        });
    }

    let format = formats
        .find_by_file(&path)
        .map_err(|source| match source {
            FormatError::Io(source) => SchematicError::Io {
                path: path.clone(),
                source,
            },
            other => SchematicError::Decode {
                name: name.to_string(),
                source: other,
            },
        })?
        .ok_or_else(|| SchematicError::UnknownFormat {
            name: name.to_string(),
        })?;

    let mut file = File::open(&path).map_err(|source| SchematicError::Io {
        path: path.clone(),
        source,
    })?;

    log::debug!(
        "[PasteManager] decoding '{}' with format '{}'",
        name,
        format.name()
    );
    format
        .read(&mut file)
        .map_err(|source| SchematicError::Decode {
            name: name.to_string(),
            source,
        })
}

/// Apply a decoded clipboard and record the resulting handle.
///
/// A prior handle for the same target is replaced without being reverted;
/// that earlier mutation becomes permanent. On failure nothing is stored.
pub(crate) fn place_clipboard(
    sessions: &SessionTable,
    engine: &dyn WorldEngine,
    clipboard: &Clipboard,
    target: &PastePos,
    options: &PasteOptions,
) -> SchematicResult<()> {
    let handle = engine
        .apply(clipboard, target, options)
        .map_err(|source| SchematicError::Placement { source })?;

    if let Some(previous) = sessions.lock().insert(target.clone(), handle) {
        log::debug!(
            "[PasteManager] replacing live edit at {}, earlier paste is now permanent: {:?}",
            target,
            previous
        );
    }
    Ok(())
}

/// Remove and reverse the tracked edit at `pos`.
///
/// Returns `Ok(false)` when nothing was tracked there. The handle is
/// consumed by the engine whether or not reversal succeeds, so a failed
/// reversal cannot be retried.
pub(crate) fn remove_and_revert(
    sessions: &SessionTable,
    engine: &dyn WorldEngine,
    pos: &PastePos,
) -> SchematicResult<bool> {
    let handle = sessions.lock().remove(pos);
    match handle {
        Some(handle) => {
            engine
                .revert(handle)
                .map_err(|source| SchematicError::Reversal { source })?;
            Ok(true)
        }
        None => Ok(false),
    }
}
