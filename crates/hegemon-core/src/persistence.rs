//! Persistence hooks. The engine hands the full world state to a
//! [`Persistence`] implementation on the autosave cadence and on demand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use hegemon_protocol::wire::{self, WireError};

use crate::state::WorldState;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] WireError),
    #[error("corrupt save {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

pub trait Persistence {
    fn save(&mut self, state: &WorldState) -> Result<(), PersistenceError>;

    /// Most recent saved state, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<WorldState>, PersistenceError>;
}

/// Reject states whose board references do not line up.
fn validate_loaded(state: WorldState, origin: &str) -> Result<WorldState, PersistenceError> {
    let expected = state.map.width() as usize * state.map.height() as usize;
    if state.map.len() != expected {
        return Err(PersistenceError::Corrupt {
            path: origin.to_string(),
            reason: format!("{} tiles for a {expected}-tile map", state.map.len()),
        });
    }
    if let Some(first) = state.invariant_violations().into_iter().next() {
        return Err(PersistenceError::Corrupt {
            path: origin.to_string(),
            reason: first,
        });
    }
    Ok(state)
}

/// Keeps the latest save as MessagePack bytes.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    latest: Option<Vec<u8>>,
    saves: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryPersistence {
    fn save(&mut self, state: &WorldState) -> Result<(), PersistenceError> {
        self.latest = Some(wire::to_msgpack(state)?);
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<WorldState>, PersistenceError> {
        match &self.latest {
            Some(bytes) => {
                let state: WorldState = wire::from_msgpack(bytes)?;
                validate_loaded(state, "<memory>").map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Writes one JSON document per save into a directory. Files are named by
/// turn, so a later save of the same turn replaces the earlier one.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    dir: PathBuf,
}

fn save_filename(turn: u32) -> String {
    format!("hegemon-turn{turn:05}.json")
}

fn parse_save_filename(name: &str) -> Option<u32> {
    name.strip_prefix("hegemon-turn")?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

impl JsonFilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saved files, oldest turn first.
    pub fn list(&self) -> Result<Vec<(u32, PathBuf)>, PersistenceError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut saves = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Skip temp files
            if name.starts_with('.') {
                continue;
            }
            if let Some(turn) = parse_save_filename(name) {
                saves.push((turn, path));
            }
        }
        saves.sort();
        Ok(saves)
    }

    pub fn load_file(path: &Path) -> Result<WorldState, PersistenceError> {
        let text = fs::read_to_string(path)?;
        let state: WorldState = wire::from_json(&text)?;
        validate_loaded(state, &path.display().to_string())
    }
}

impl Persistence for JsonFilePersistence {
    /// Write to a temp file first, then rename over the final path.
    fn save(&mut self, state: &WorldState) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let filename = save_filename(state.turn);
        let target = self.dir.join(&filename);
        let tmp = self.dir.join(format!(".{filename}.tmp"));

        let encoded = wire::to_json(state)?;
        if let Err(e) = fs::write(&tmp, encoded.as_bytes()) {
            let _ = fs::remove_file(&tmp);
            return Err(PersistenceError::Io(e));
        }
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(PersistenceError::Io(e));
        }
        debug!(path = %target.display(), "saved game");
        Ok(())
    }

    fn load(&self) -> Result<Option<WorldState>, PersistenceError> {
        match self.list()?.pop() {
            Some((_, path)) => Self::load_file(&path).map(Some),
            None => Ok(None),
        }
    }
}
