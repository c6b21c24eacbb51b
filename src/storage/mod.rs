//! Persistent key-value storage for the best score
//!
//! The engine only needs string get/set under a single key, so the store is
//! abstracted behind [`KeyValueStore`]. Reads and writes are best effort: a
//! broken store must never end a session.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use thiserror::Error;

/// Key under which the best score is kept
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store {path:?} does not hold a JSON object of strings")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String store, in the manner of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read the best score, treating anything unusable as no prior score
pub fn load_high_score<S: KeyValueStore + ?Sized>(store: &S) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => match raw.trim().parse::<u32>() {
            Ok(score) => score,
            Err(_) => {
                log::warn!("ignoring unparseable high score {:?}", raw);
                0
            }
        },
        Ok(None) => 0,
        Err(err) => {
            log::warn!("could not read high score, starting from 0: {}", err);
            0
        }
    }
}

/// Persist the best score; failures are logged and otherwise ignored
pub fn save_high_score<S: KeyValueStore + ?Sized>(store: &mut S, score: u32) -> bool {
    match store.set(HIGH_SCORE_KEY, &score.to_string()) {
        Ok(()) => true,
        Err(err) => {
            log::error!("could not persist high score {}: {}", score, err);
            false
        }
    }
}
