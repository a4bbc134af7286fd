//! Paste a generated schematic through a logging engine, then watch the
//! scheduled auto-removal reverse it.
//!
//! Run with `RUST_LOG=debug cargo run --example paste_demo`.

use std::any::Any;
use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use schematic_paste::{
    BlockId, Clipboard, ClipboardFormat, EditHandle, EngineError, FormatError, FormatRegistry,
    PasteManager, PasteManagerConfig, PasteOptions, PastePos, ThreadScheduler,
    ThreadSchedulerConfig, WorldEngine,
};

/// Engine that logs mutations instead of touching a real world.
struct LoggingEngine;

#[derive(Debug)]
struct LoggedEdit {
    target: PastePos,
    cells: usize,
}

impl EditHandle for LoggedEdit {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

impl WorldEngine for LoggingEngine {
    fn apply(
        &self,
        clipboard: &Clipboard,
        target: &PastePos,
        options: &PasteOptions,
    ) -> Result<Box<dyn EditHandle>, EngineError> {
        let mut cells = 0;
        for (dx, dy, dz, block) in clipboard.cells() {
            if options.ignore_air && block.is_air() {
                continue;
            }
            log::debug!(
                "[LoggingEngine] set {} at ({}, {}, {})",
                block,
                target.x() + dx,
                target.y() + dy,
                target.z() + dz
            );
            cells += 1;
        }
        log::info!("[LoggingEngine] placed {} block(s) at {}", cells, target);
        Ok(Box::new(LoggedEdit {
            target: target.clone(),
            cells,
        }))
    }

    fn revert(&self, handle: Box<dyn EditHandle>) -> Result<(), EngineError> {
        let edit = handle
            .into_any()
            .downcast::<LoggedEdit>()
            .map_err(|_| EngineError::BadHandle("not a LoggedEdit".to_string()))?;
        log::info!(
            "[LoggingEngine] restoring {} block(s) at {}",
            edit.cells,
            edit.target
        );
        Ok(())
    }
}

/// Whitespace text format: `grid <w> <h> <l>` followed by `w*h*l` block ids.
struct GridFormat;

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
        let mut dims = [0u32; 3];
        for dim in &mut dims {
            *dim = tokens
                .next()
                .ok_or(FormatError::UnexpectedEof)?
                .parse()
                .map_err(|_| FormatError::Malformed("bad dimension".to_string()))?;
        }
        let [width, height, length] = dims;

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

fn main() -> Result<()> {
    env_logger::init();

    let dir = tempfile::tempdir()?;
    let schematics_dir = dir.path().join("schematics");

    let scheduler = Arc::new(ThreadScheduler::new(ThreadSchedulerConfig::default())?);
    let mut formats = FormatRegistry::new();
    formats.register(Arc::new(GridFormat));

    let manager = PasteManager::new(
        PasteManagerConfig {
            schematics_dir: schematics_dir.clone(),
            options: PasteOptions::default(),
        },
        Arc::new(formats),
        Arc::new(LoggingEngine),
        scheduler,
    )?;

    // A 3x2x3 hut shell with an air core.
    let blocks: Vec<u16> = (0..18)
        .map(|i| if i == 4 || i == 13 { 0 } else { 1 })
        .collect();
    let text = {
        let mut text = String::from("grid 3 2 3");
        for id in &blocks {
            text.push(' ');
            text.push_str(&id.to_string());
        }
        text
    };
    std::fs::create_dir_all(&schematics_dir)?;
    std::fs::write(schematics_dir.join("hut.grid"), text)?;

    let target = PastePos::new("overworld", 100, 64, -40);
    manager
        .paste_and_auto_remove("hut.grid", &target, Duration::from_millis(500), None)
        .wait()?;

    println!("pasted, tracked = {}", manager.is_tracked(&target));

    thread::sleep(Duration::from_millis(700));
    println!("after auto-removal, tracked = {}", manager.is_tracked(&target));
    println!("stats: {:?}", manager.stats());

    Ok(())
}
