//! Browser LocalStorage high score store (wasm)

use super::HighScoreStore;
use crate::error::EngineError;

/// Stores the high score as a decimal string under a LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "brickfall_high_score";

    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, EngineError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| EngineError::Storage("LocalStorage unavailable".to_string()))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<u64, EngineError> {
        let value = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| EngineError::Storage(format!("{:?}", e)))?;
        match value {
            Some(text) => text
                .trim()
                .parse()
                .map_err(|e| EngineError::Storage(format!("bad high score '{}': {}", text, e))),
            None => Ok(0),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), EngineError> {
        Self::storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|e| EngineError::Storage(format!("{:?}", e)))
    }
}
