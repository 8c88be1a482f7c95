//! Best-score persistence
//!
//! The session only talks to [`BestScoreStore`], so it can run against real
//! LocalStorage in the browser and an in-memory value everywhere else.
//! Writes are best effort: a failure is logged and play continues.

/// Durable storage for the single best score
pub trait BestScoreStore {
    /// Stored best score, 0 when nothing (valid) is stored
    fn read_best_score(&self) -> u64;
    fn write_best_score(&mut self, score: u64);
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u64,
    writes: u32,
}

impl MemoryStore {
    pub fn with_best(best: u64) -> Self {
        Self { best, writes: 0 }
    }

    /// Number of writes received
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl BestScoreStore for MemoryStore {
    fn read_best_score(&self) -> u64 {
        self.best
    }

    fn write_best_score(&mut self, score: u64) {
        self.best = score;
        self.writes += 1;
    }
}

/// Parse a stored best score; anything unreadable counts as no score
pub fn parse_best_score(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "tani_rush_highscore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn read_best_score(&self) -> u64 {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score starts at 0");
            return 0;
        };
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => {
                let best = parse_best_score(&raw);
                log::info!("Loaded best score {best}");
                best
            }
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Failed to read best score: {e:?}");
                0
            }
        }
    }

    fn write_best_score(&mut self, score: u64) {
        match Self::storage() {
            Some(storage) => {
                if let Err(e) = storage.set_item(Self::STORAGE_KEY, &score.to_string()) {
                    log::warn!("Failed to save best score: {e:?}");
                }
            }
            None => log::warn!("LocalStorage unavailable, best score not saved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.read_best_score(), 0);
        store.write_best_score(25);
        assert_eq!(store.read_best_score(), 25);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_parse_best_score() {
        assert_eq!(parse_best_score("42"), 42);
        assert_eq!(parse_best_score(" 7\n"), 7);
        assert_eq!(parse_best_score(""), 0);
        assert_eq!(parse_best_score("-3"), 0);
        assert_eq!(parse_best_score("NaN"), 0);
    }
}
