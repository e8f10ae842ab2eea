//! Best score persistence
//!
//! The simulation only reads the best score at startup and writes it once per
//! finished run; everything else goes through [`ScoreStore`].

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "unicorn_fly_highscore";

/// Persistence collaborator for the best score
pub trait ScoreStore {
    fn best_score(&self) -> u32;
    fn set_best_score(&mut self, score: u32);
}

/// Best score kept under [`BEST_SCORE_KEY`] in a key-value store
#[derive(Debug, Clone)]
pub struct StoredBestScore<K: KeyValueStore> {
    store: K,
    cached: u32,
}

impl<K: KeyValueStore> StoredBestScore<K> {
    /// Load the best score; anything unparsable counts as 0
    pub fn load(store: K) -> Self {
        let cached = match store.get(BEST_SCORE_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt best score {:?}", raw);
                0
            }),
            None => 0,
        };
        log::info!("Loaded best score {}", cached);
        Self { store, cached }
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

impl<K: KeyValueStore> ScoreStore for StoredBestScore<K> {
    fn best_score(&self) -> u32 {
        self.cached
    }

    fn set_best_score(&mut self, score: u32) {
        self.cached = score;
        if let Err(e) = self.store.set(BEST_SCORE_KEY, &score.to_string()) {
            log::warn!("Failed to save best score: {}", e);
        }
    }
}
