use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};

/// Persistence for the ranked score list.
pub trait LeaderboardStore {
    fn load(&self) -> Result<Vec<i32>>;
    fn save(&self, scores: &[i32]) -> Result<()>;
}

/// Fixed-width binary file: `capacity` little-endian 4-byte integers.
pub struct FileStore {
    path: PathBuf,
    capacity: usize,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for FileStore {
    fn load(&self) -> Result<Vec<i32>> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read leaderboard file: {:?}", self.path))?;

        let mut scores: Vec<i32> = bytes
            .chunks_exact(4)
            .take(self.capacity)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        scores.resize(self.capacity, 0);

        Ok(scores)
    }

    fn save(&self, scores: &[i32]) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create leaderboard directory: {:?}", dir))?;
        }

        let bytes: Vec<u8> = scores
            .iter()
            .copied()
            .chain(std::iter::repeat(0))
            .take(self.capacity)
            .flat_map(i32::to_le_bytes)
            .collect();

        fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write leaderboard file: {:?}", self.path))?;

        Ok(())
    }
}

/// Top scores in descending order, fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    scores: Vec<i32>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            scores: vec![0; capacity],
        }
    }

    pub fn from_scores(mut scores: Vec<i32>, capacity: usize) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.resize(capacity, 0);
        Self { scores }
    }

    /// Load through `store`, falling back to an all-zero board.
    pub fn load_from(store: &dyn LeaderboardStore, capacity: usize) -> Self {
        match store.load() {
            Ok(scores) => {
                info!("Loaded leaderboard {:?}", scores);
                Self::from_scores(scores, capacity)
            }
            Err(err) => {
                warn!("Starting with an empty leaderboard: {:#}", err);
                Self::new(capacity)
            }
        }
    }

    /// Save through `store`. A failure only loses this update.
    pub fn save_to(&self, store: &dyn LeaderboardStore) -> bool {
        match store.save(&self.scores) {
            Ok(()) => true,
            Err(err) => {
                error!("Leaderboard not saved: {:#}", err);
                false
            }
        }
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn capacity(&self) -> usize {
        self.scores.len()
    }

    /// Cascade `score` into the ranks: it takes the first slot holding a
    /// lower score and the displaced scores shift down, dropping the last.
    /// Returns whether anything changed.
    pub fn insert(&mut self, score: i32) -> bool {
        let mut carried = score;
        let mut updated = false;

        for slot in self.scores.iter_mut() {
            if *slot >= carried {
                continue;
            }
            std::mem::swap(slot, &mut carried);
            updated = true;
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cascading_insert() {
        let mut board = Leaderboard::from_scores(vec![50, 30, 10], 3);

        assert!(board.insert(40));
        assert_eq!(board.scores(), &[50, 40, 30]);

        assert!(!board.insert(30));
        assert_eq!(board.scores(), &[50, 40, 30]);

        assert!(board.insert(99));
        assert_eq!(board.scores(), &[99, 50, 40]);
    }

    #[test]
    fn test_zero_score_leaves_empty_board() {
        let mut board = Leaderboard::new(3);
        assert!(!board.insert(0));
        assert!(board.insert(7));
        assert_eq!(board.scores(), &[7, 0, 0]);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("record.dat"), 3);

        let mut board = Leaderboard::new(3);
        board.insert(12);
        board.insert(5);
        assert!(board.save_to(&store));

        let bytes = fs::read(store.path()).unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[0..4], &12i32.to_le_bytes());

        let loaded = Leaderboard::load_from(&store, 3);
        assert_eq!(loaded.scores(), &[12, 5, 0]);
    }

    #[test]
    fn test_short_file_is_padded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("record.dat");
        fs::write(&path, 42i32.to_le_bytes()).unwrap();

        let store = FileStore::new(&path, 3);
        assert_eq!(store.load().unwrap(), vec![42, 0, 0]);
    }

    #[test]
    fn test_missing_file_gives_zero_board() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.dat"), 3);

        assert!(store.load().is_err());
        assert_eq!(Leaderboard::load_from(&store, 3).scores(), &[0, 0, 0]);
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let dir = tempdir().unwrap();
        // The target is a directory, so writing the file fails
        let store = FileStore::new(dir.path(), 3);

        let board = Leaderboard::from_scores(vec![3, 2, 1], 3);
        assert!(!board.save_to(&store));
    }
}
