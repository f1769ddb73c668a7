//! High score persistence
//!
//! A single integer in a small text file. A missing or unreadable file is
//! simply a zero high score; saving is best-effort and never interrupts
//! the game.

use std::path::{Path, PathBuf};

/// Default location, next to the binary's working directory
pub const HIGH_SCORE_FILE: &str = "assets/highscore.txt";

#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u32,
}

impl HighScore {
    /// Load the stored high score, treating any failure as zero
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match std::fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u32>() {
                Ok(score) => score,
                Err(e) => {
                    log::warn!("Unparseable high score in {}: {e}", path.display());
                    0
                }
            },
            Err(_) => {
                log::info!("No high score file at {}, starting at 0", path.display());
                0
            }
        };
        Self { path, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record a finished run. Persists and returns true on a new record.
    pub fn observe(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            log::error!("Failed to create {}: {e}", parent.display());
            return;
        }
        match std::fs::write(&self.path, self.best.to_string()) {
            Ok(()) => log::info!("High score {} saved", self.best),
            Err(e) => log::error!("Failed to save high score to {}: {e}", self.path.display()),
        }
    }
}

/// True when the file exists but cannot hold a valid score; startup uses
/// this only for logging, never as a fatal condition.
pub fn file_is_corrupt(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(text) => text.trim().parse::<u32>().is_err(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("cat-dash-highscore-test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let path = temp_path("never-written.txt");
        let _ = std::fs::remove_file(&path);
        assert_eq!(HighScore::load(&path).best(), 0);
    }

    #[test]
    fn test_garbage_file_reads_zero() {
        let path = temp_path("garbage.txt");
        std::fs::write(&path, "not a number").unwrap();
        assert_eq!(HighScore::load(&path).best(), 0);
        assert!(file_is_corrupt(&path));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_round_trip_keeps_maximum() {
        let path = temp_path("roundtrip.txt");
        let _ = std::fs::remove_file(&path);

        let mut hs = HighScore::load(&path);
        assert!(hs.observe(42));
        assert!(!hs.observe(17), "lower score must not become the record");
        assert!(hs.observe(99));

        // Relaunch: the maximum ever achieved comes back
        let reloaded = HighScore::load(&path);
        assert_eq!(reloaded.best(), 99);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_whitespace_tolerated() {
        let path = temp_path("spacey.txt");
        std::fs::write(&path, "  123\n").unwrap();
        assert_eq!(HighScore::load(&path).best(), 123);
        std::fs::remove_file(&path).unwrap();
    }
}
