//! Paste session manager.
//!
//! Coordinates the paste workflow end to end: resolve a schematic file,
//! decode it off the simulation thread, apply it on the simulation thread,
//! and track the resulting edit handle so the paste can be reversed later.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::constants::session::SCHEMATICS_DIR;
use crate::engine::{PasteOptions, WorldEngine};
use crate::error::{SchematicError, SchematicResult};
use crate::format::FormatRegistry;
use crate::scheduler::Scheduler;
use crate::world::PastePos;

use super::completion::{channel, Completion, ErrorHook};
use super::operations::{load_clipboard, place_clipboard, remove_and_revert, SessionTable};

/// Configuration for [`PasteManager`].
#[derive(Clone, Debug)]
pub struct PasteManagerConfig {
    /// Directory holding schematic files, created on first use.
    pub schematics_dir: PathBuf,
    /// Placement policy applied to every paste.
    pub options: PasteOptions,
}

impl Default for PasteManagerConfig {
    fn default() -> Self {
        Self {
            schematics_dir: PathBuf::from(SCHEMATICS_DIR),
            options: PasteOptions::default(),
        }
    }
}

/// Counters for paste and undo activity.
#[derive(Clone, Copy, Debug, Default)]
pub struct PasteStats {
    pub pastes_completed: u64,
    pub pastes_failed: u64,
    pub undos_completed: u64,
    /// Undo calls that found nothing tracked at the coordinate.
    pub undo_noops: u64,
    pub reversal_failures: u64,
    /// Scheduled removals that actually reverted an edit.
    pub auto_removals: u64,
}

/// Tracks at most one reversible edit per world coordinate.
///
/// State machine per coordinate: `Empty -> Pasted (handle held) -> Empty`.
/// A failed paste leaves the coordinate `Empty`; a new paste over a tracked
/// coordinate replaces the handle without reverting it. Session state lives
/// in memory only and is lost on restart.
pub struct PasteManager {
    schematics_dir: PathBuf,
    options: PasteOptions,
    formats: Arc<FormatRegistry>,
    engine: Arc<dyn WorldEngine>,
    scheduler: Arc<dyn Scheduler>,
    sessions: Arc<SessionTable>,
    stats: Arc<Mutex<PasteStats>>,
}

impl PasteManager {
    /// Create a manager. The schematics directory is created if absent.
    pub fn new(
        config: PasteManagerConfig,
        formats: Arc<FormatRegistry>,
        engine: Arc<dyn WorldEngine>,
        scheduler: Arc<dyn Scheduler>,
    ) -> SchematicResult<Self> {
        if !config.schematics_dir.exists() {
            fs::create_dir_all(&config.schematics_dir).map_err(|source| SchematicError::Io {
                path: config.schematics_dir.clone(),
                source,
            })?;
            log::info!(
                "[PasteManager] created schematics directory {}",
                config.schematics_dir.display()
            );
        }

        Ok(Self {
            schematics_dir: config.schematics_dir,
            options: config.options,
            formats,
            engine,
            scheduler,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            stats: Arc::new(Mutex::new(PasteStats::default())),
        })
    }

    /// Synchronous paste.
    ///
    /// Decodes on the calling thread and mutates the world through the
    /// engine; the caller is responsible for being on the simulation thread.
    pub fn paste(&self, name: &str, pos: &PastePos) -> SchematicResult<()> {
        let result = load_clipboard(&self.schematics_dir, &self.formats, name).and_then(
            |clipboard| {
                place_clipboard(
                    &self.sessions,
                    self.engine.as_ref(),
                    &clipboard,
                    pos,
                    &self.options,
                )
            },
        );
        record_paste(&self.stats, &result);
        if let Err(err) = &result {
            log::warn!("[PasteManager] paste of '{}' at {} failed: {}", name, pos, err);
        }
        result
    }

    /// Asynchronous paste: decode on the worker pool, mutate on the
    /// simulation thread.
    ///
    /// The returned future completes after the mutation step, never after
    /// decode alone. Failures, including decode-phase failures, are
    /// delivered to `on_error` (when supplied) and then to the future, both
    /// on the simulation thread, so observers never race with in-progress
    /// world mutation.
    pub fn paste_async(
        &self,
        name: &str,
        pos: &PastePos,
        on_error: Option<ErrorHook>,
    ) -> Completion {
        self.spawn_paste(name, pos, on_error, None)
    }

    /// Paste, then undo automatically after `delay`.
    ///
    /// The future resolves when the paste completes, strictly before the
    /// scheduled removal fires. A reversal failure during the deferred
    /// removal is logged and delivered to `on_error`; the future is already
    /// resolved at that point and is unaffected.
    pub fn paste_and_auto_remove(
        &self,
        name: &str,
        pos: &PastePos,
        delay: Duration,
        on_error: Option<ErrorHook>,
    ) -> Completion {
        self.spawn_paste(name, pos, on_error, Some(delay))
    }

    /// Synchronous undo.
    ///
    /// A coordinate with nothing tracked is a silent no-op. The handle is
    /// released even when reversal fails, so a failed reversal cannot be
    /// retried. Must run on the simulation thread.
    pub fn undo(&self, pos: &PastePos) -> SchematicResult<()> {
        let result = undo_tracked(&self.sessions, self.engine.as_ref(), &self.stats, pos);
        if let Err(err) = &result {
            log::warn!("[PasteManager] undo at {} failed: {}", pos, err);
        }
        result
    }

    /// Asynchronous undo, scheduled onto the simulation thread.
    pub fn undo_async(&self, pos: &PastePos, on_error: Option<ErrorHook>) -> Completion {
        let (sender, completion) = channel();
        let pos = pos.clone();
        let engine = Arc::clone(&self.engine);
        let sessions = Arc::clone(&self.sessions);
        let stats = Arc::clone(&self.stats);

        self.scheduler.run_simulation(Box::new(move || {
            match undo_tracked(&sessions, engine.as_ref(), &stats, &pos) {
                Ok(()) => sender.complete(Ok(())),
                Err(err) => {
                    log::warn!("[PasteManager] async undo at {} failed: {}", pos, err);
                    if let Some(hook) = &on_error {
                        hook(&err);
                    }
                    sender.complete(Err(err));
                }
            }
        }));

        completion
    }

    /// Whether a reversible edit is currently tracked at `pos`.
    pub fn is_tracked(&self, pos: &PastePos) -> bool {
        self.sessions.lock().contains_key(pos)
    }

    /// Number of live reversible edits.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Snapshot of activity counters.
    pub fn stats(&self) -> PasteStats {
        *self.stats.lock()
    }

    /// Directory schematic names are resolved against.
    pub fn schematics_dir(&self) -> &Path {
        &self.schematics_dir
    }

    fn spawn_paste(
        &self,
        name: &str,
        pos: &PastePos,
        on_error: Option<ErrorHook>,
        auto_remove: Option<Duration>,
    ) -> Completion {
        let (sender, completion) = channel();
        let name = name.to_string();
        let pos = pos.clone();
        let dir = self.schematics_dir.clone();
        let options = self.options;
        let formats = Arc::clone(&self.formats);
        let engine = Arc::clone(&self.engine);
        let sessions = Arc::clone(&self.sessions);
        let stats = Arc::clone(&self.stats);
        let scheduler = Arc::clone(&self.scheduler);

        self.scheduler.run_background(Box::new(move || {
            // Worker-pool phase: file I/O and decode only. The session table
            // is touched exclusively by the simulation-thread continuation.
            let decoded = load_clipboard(&dir, &formats, &name);

            let sim_scheduler = Arc::clone(&scheduler);
            scheduler.run_simulation(Box::new(move || {
                let result = decoded.and_then(|clipboard| {
                    place_clipboard(&sessions, engine.as_ref(), &clipboard, &pos, &options)
                });
                record_paste(&stats, &result);

                match result {
                    Ok(()) => {
                        log::debug!("[PasteManager] pasted '{}' at {}", name, pos);
                        if let Some(delay) = auto_remove {
                            schedule_auto_remove(
                                sim_scheduler,
                                sessions,
                                engine,
                                stats,
                                pos,
                                delay,
                                on_error.clone(),
                            );
                        }
                        sender.complete(Ok(()));
                    }
                    Err(err) => {
                        log::warn!(
                            "[PasteManager] async paste of '{}' at {} failed: {}",
                            name,
                            pos,
                            err
                        );
                        if let Some(hook) = &on_error {
                            hook(&err);
                        }
                        sender.complete(Err(err));
                    }
                }
            }));
        }));

        completion
    }
}

fn record_paste(stats: &Mutex<PasteStats>, result: &SchematicResult<()>) {
    let mut stats = stats.lock();
    match result {
        Ok(()) => stats.pastes_completed += 1,
        Err(_) => stats.pastes_failed += 1,
    }
}

fn undo_tracked(
    sessions: &SessionTable,
    engine: &dyn WorldEngine,
    stats: &Mutex<PasteStats>,
    pos: &PastePos,
) -> SchematicResult<()> {
    match remove_and_revert(sessions, engine, pos) {
        Ok(true) => {
            stats.lock().undos_completed += 1;
            Ok(())
        }
        Ok(false) => {
            stats.lock().undo_noops += 1;
            Ok(())
        }
        Err(err) => {
            stats.lock().reversal_failures += 1;
            Err(err)
        }
    }
}

fn schedule_auto_remove(
    scheduler: Arc<dyn Scheduler>,
    sessions: Arc<SessionTable>,
    engine: Arc<dyn WorldEngine>,
    stats: Arc<Mutex<PasteStats>>,
    pos: PastePos,
    delay: Duration,
    on_error: Option<ErrorHook>,
) {
    scheduler.run_simulation_later(
        delay,
        Box::new(move || match remove_and_revert(&sessions, engine.as_ref(), &pos) {
            Ok(true) => {
                let mut stats = stats.lock();
                stats.undos_completed += 1;
                stats.auto_removals += 1;
                log::debug!("[PasteManager] auto-removal reverted edit at {}", pos);
            }
            Ok(false) => {
                // Undone manually before the timer fired; tolerated.
                stats.lock().undo_noops += 1;
                log::debug!("[PasteManager] auto-removal at {} had nothing to undo", pos);
            }
            Err(err) => {
                stats.lock().reversal_failures += 1;
                // The paste future has already resolved; the log and the
                // hook are the only failure channels for deferred removal.
                log::error!("[PasteManager] auto-removal at {} failed: {}", pos, err);
                if let Some(hook) = &on_error {
                    hook(&err);
                }
            }
        }),
    );
}
