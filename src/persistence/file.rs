//! JSON file high score store (native)

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::HighScoreStore;
use crate::error::EngineError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// Stores `{"high_score": N}` at a path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u64, EngineError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let file: HighScoreFile = serde_json::from_str(&json)?;
                Ok(file.high_score)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), EngineError> {
        let json = serde_json::to_string(&HighScoreFile { high_score: score })?;
        // Write to a temp file first so a crash never leaves a torn file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("brickfall-test-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let mut store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        store.save(4200).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 4200);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(EngineError::Settings(_))));
        let _ = fs::remove_file(path);
    }
}
