//! Shared doubles for the integration suite: a recording in-memory engine
//! and a trivial whitespace-text clipboard format.

use std::any::Any;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use schematic_paste::{
    BlockId, Clipboard, ClipboardFormat, EditHandle, EngineError, FormatError, FormatRegistry,
    PasteManager, PasteManagerConfig, PasteOptions, PastePos, ThreadScheduler,
    ThreadSchedulerConfig, WorldEngine,
};

/// Edit handle produced by [`RecordingEngine`].
#[derive(Debug)]
pub struct RecordedEdit {
    pub id: u64,
    pub target: PastePos,
    pub placed_cells: usize,
}

impl EditHandle for RecordedEdit {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Engine double that records applies and reverts and can inject failures.
#[derive(Default)]
pub struct RecordingEngine {
    next_id: AtomicU64,
    pub applies: AtomicUsize,
    pub reverts: AtomicUsize,
    pub last_placed_cells: AtomicUsize,
    pub reverted_ids: Mutex<Vec<u64>>,
    pub fail_next_apply: AtomicBool,
    pub fail_next_revert: AtomicBool,
}

impl WorldEngine for RecordingEngine {
    fn apply(
        &self,
        clipboard: &Clipboard,
        target: &PastePos,
        options: &PasteOptions,
    ) -> Result<Box<dyn EditHandle>, EngineError> {
        if self.fail_next_apply.swap(false, Ordering::SeqCst) {
            return Err(EngineError::Placement("injected apply failure".to_string()));
        }

        let placed_cells = clipboard
            .cells()
            .filter(|&(_, _, _, block)| !(options.ignore_air && block.is_air()))
            .count();
        self.applies.fetch_add(1, Ordering::SeqCst);
        self.last_placed_cells.store(placed_cells, Ordering::SeqCst);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordedEdit {
            id,
            target: target.clone(),
            placed_cells,
        }))
    }

    fn revert(&self, handle: Box<dyn EditHandle>) -> Result<(), EngineError> {
        let edit = handle
            .into_any()
            .downcast::<RecordedEdit>()
            .map_err(|_| EngineError::BadHandle("not a RecordedEdit".to_string()))?;

        if self.fail_next_revert.swap(false, Ordering::SeqCst) {
            return Err(EngineError::Reversal("injected revert failure".to_string()));
        }

        self.reverts.fetch_add(1, Ordering::SeqCst);
        self.reverted_ids.lock().push(edit.id);
        Ok(())
    }
}

/// Whitespace text format: `grid <w> <h> <l>` followed by `w*h*l` block ids.
pub struct GridFormat;

impl ClipboardFormat for GridFormat {
    fn name(&self) -> &str {
        "grid"
    }

    fn extensions(&self) -> &[&str] {
        &["grid"]
    }

    fn matches(&self, header: &[u8]) -> bool {
        header.starts_with(b"grid ")
    }

    fn read(&self, reader: &mut dyn Read) -> Result<Clipboard, FormatError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mut tokens = text.split_whitespace();

        if tokens.next() != Some("grid") {
            return Err(FormatError::Malformed("missing grid header".to_string()));
        }
        let width = next_u32(&mut tokens)?;
        let height = next_u32(&mut tokens)?;
        let length = next_u32(&mut tokens)?;

        let volume = (width * height * length) as usize;
        let mut blocks = Vec::with_capacity(volume);
        for _ in 0..volume {
            let token = tokens.next().ok_or(FormatError::UnexpectedEof)?;
            let id: u16 = token
                .parse()
                .map_err(|_| FormatError::Malformed(format!("bad block id: {}", token)))?;
            blocks.push(BlockId::new(id));
        }

        Ok(Clipboard::from_blocks(width, height, length, blocks))
    }
}

fn next_u32<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<u32, FormatError> {
    let token = tokens.next().ok_or(FormatError::UnexpectedEof)?;
    token
        .parse()
        .map_err(|_| FormatError::Malformed(format!("bad dimension: {}", token)))
}

/// Write a grid-format schematic fixture under `dir`.
pub fn write_grid_schematic(dir: &Path, name: &str, width: u32, height: u32, length: u32, blocks: &[u16]) {
    assert_eq!(blocks.len(), (width * height * length) as usize);
    let mut text = format!("grid {} {} {}", width, height, length);
    for id in blocks {
        text.push(' ');
        text.push_str(&id.to_string());
    }
    std::fs::write(dir.join(name), text).expect("write schematic fixture");
}

/// A manager wired to a recording engine, a grid-format registry, and a
/// two-worker thread scheduler, rooted in a fresh temp directory.
pub struct TestHarness {
    pub manager: PasteManager,
    pub engine: Arc<RecordingEngine>,
    _dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let schematics_dir = dir.path().join("schematics");

        let engine = Arc::new(RecordingEngine::default());
        let engine_dyn: Arc<dyn WorldEngine> = Arc::clone(&engine) as Arc<dyn WorldEngine>;

        let scheduler = ThreadScheduler::new(ThreadSchedulerConfig {
            worker_threads: 2,
            thread_name: "harness".to_string(),
        })
        .expect("spawn scheduler");

        let mut formats = FormatRegistry::new();
        formats.register(Arc::new(GridFormat));

        let manager = PasteManager::new(
            PasteManagerConfig {
                schematics_dir,
                options: PasteOptions::default(),
            },
            Arc::new(formats),
            engine_dyn,
            Arc::new(scheduler),
        )
        .expect("construct manager");

        Self {
            manager,
            engine,
            _dir: dir,
        }
    }

    pub fn write_schematic(&self, name: &str, width: u32, height: u32, length: u32, blocks: &[u16]) {
        write_grid_schematic(self.manager.schematics_dir(), name, width, height, length, blocks);
    }
}
