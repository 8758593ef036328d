//! High score persistence
//!
//! The engine only ever stores one number. Backends:
//! - `MemoryStore`: in-process, shared between clones (tests, headless runs)
//! - `JsonFileStore`: JSON file on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)

use std::cell::Cell;
use std::rc::Rc;

use crate::error::EngineError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Get/set storage for the persisted high score
pub trait HighScoreStore {
    /// Previously stored high score, 0 if nothing was stored yet
    fn load(&mut self) -> Result<u64, EngineError>;
    fn save(&mut self, score: u64) -> Result<(), EngineError>;
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<u64>>,
}

impl MemoryStore {
    pub fn with_value(score: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(score)),
        }
    }

    pub fn get(&self) -> u64 {
        self.value.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64, EngineError> {
        Ok(self.value.get())
    }

    fn save(&mut self, score: u64) -> Result<(), EngineError> {
        self.value.set(score);
        Ok(())
    }
}
