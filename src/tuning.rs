//! Data-driven game balance
//!
//! Every design parameter of the run (physics constants, difficulty curve,
//! shot threshold) lives here so the feel of the game can be adjusted
//! without touching simulation code. An optional `tuning.json` next to the
//! binary overrides the defaults; the file carries a format version and a
//! mismatch is fatal at launch, before any game state exists.

use std::path::Path;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Bump when the meaning of a field changes incompatibly
pub const TUNING_FORMAT_VERSION: u32 = 1;

/// Default location of the override file
pub const TUNING_FILE: &str = "tuning.json";

/// Runtime-configurable balance constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub format_version: u32,

    // === Physics ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Initial jump velocity (px/s, negative = upward)
    pub jump_velocity: f32,

    // === Difficulty ===
    /// Scroll speed at score 0 (px/s)
    pub base_scroll_speed: f32,
    /// Scroll speed never exceeds this (px/s)
    pub max_scroll_speed: f32,
    /// Speed gained per 10 points (px/s)
    pub speed_increase_per_10: f32,
    /// Per-obstacle speed jitter, ± this value (px/s)
    pub speed_jitter: f32,

    // === Spawner ===
    /// Upper bound of the spawn interval at score 0 (ms)
    pub spawn_interval_base_ms: u32,
    /// Upper bound shrinks by this much per 5 points (ms)
    pub spawn_interval_step_ms: u32,
    /// Minimum safe interval; spawns never come faster than this (ms)
    pub spawn_interval_min_ms: u32,

    // === Scoring ===
    /// A shot is awarded every time the score crosses a multiple of this
    pub shot_threshold: u32,
    /// Obstacle size jitter range (multiplier)
    pub scale_jitter_min: f32,
    pub scale_jitter_max: f32,
    /// Balloons float this far above the ground line (px)
    pub balloon_altitude_min: f32,
    pub balloon_altitude_max: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            format_version: TUNING_FORMAT_VERSION,
            gravity: 3600.0,
            jump_velocity: -1200.0,
            base_scroll_speed: 420.0,
            max_scroll_speed: 900.0,
            speed_increase_per_10: 12.0,
            speed_jitter: 30.0,
            spawn_interval_base_ms: 1500,
            spawn_interval_step_ms: 50,
            spawn_interval_min_ms: 800,
            shot_threshold: 20,
            scale_jitter_min: 0.9,
            scale_jitter_max: 1.3,
            balloon_altitude_min: 80.0,
            balloon_altitude_max: 140.0,
        }
    }
}

impl Tuning {
    /// Global scroll speed for the given score
    pub fn scroll_speed_for(&self, score: u32) -> f32 {
        (self.base_scroll_speed + (score / 10) as f32 * self.speed_increase_per_10)
            .min(self.max_scroll_speed)
    }

    /// Draw the countdown (in ticks) until the next obstacle
    ///
    /// The upper bound of the range narrows as the score rises; the floor
    /// keeps the game winnable no matter how high the score gets.
    pub fn spawn_interval_ticks(&self, score: u32, rng: &mut Pcg32) -> u32 {
        let shrink = self.spawn_interval_step_ms * (score / 5);
        let hi_ms = self
            .spawn_interval_base_ms
            .saturating_sub(shrink)
            .max(self.spawn_interval_min_ms);
        let lo_ms = (hi_ms * 2 / 3).max(self.spawn_interval_min_ms);
        let ticks = |ms: u32| ms * 60 / 1000;
        if lo_ms >= hi_ms {
            ticks(hi_ms)
        } else {
            rng.random_range(ticks(lo_ms)..=ticks(hi_ms))
        }
    }

    /// Load tuning overrides if the file exists
    ///
    /// Missing file: defaults. Malformed file: logged, defaults. A present,
    /// well-formed file with the wrong format version is the one fatal case.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
        };

        match serde_json::from_str::<Tuning>(&text) {
            Ok(tuning) => {
                if tuning.format_version != TUNING_FORMAT_VERSION {
                    return Err(format!(
                        "tuning file {} has format version {} but this build expects {}",
                        path.display(),
                        tuning.format_version,
                        TUNING_FORMAT_VERSION
                    ));
                }
                log::info!("Loaded tuning overrides from {}", path.display());
                Ok(tuning)
            }
            Err(e) => {
                log::warn!(
                    "Ignoring malformed tuning file {}: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_scroll_speed_rises_and_caps() {
        let t = Tuning::default();
        assert_eq!(t.scroll_speed_for(0), 420.0);
        assert_eq!(t.scroll_speed_for(9), 420.0);
        assert_eq!(t.scroll_speed_for(10), 432.0);
        assert_eq!(t.scroll_speed_for(100_000), 900.0);
    }

    #[test]
    fn test_spawn_interval_narrows_with_floor() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);

        // Score 0: interval within [1000ms, 1500ms] in ticks
        for _ in 0..100 {
            let ticks = t.spawn_interval_ticks(0, &mut rng);
            assert!((60..=90).contains(&ticks), "got {ticks}");
        }

        // Very high score: pinned to the 800ms floor
        for _ in 0..100 {
            let ticks = t.spawn_interval_ticks(10_000, &mut rng);
            assert_eq!(ticks, 48);
        }
    }

    #[test]
    fn test_version_mismatch_is_fatal() {
        let dir = std::env::temp_dir().join("cat-dash-tuning-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tuning.json");
        std::fs::write(&path, r#"{"format_version": 99}"#).unwrap();
        assert!(Tuning::load(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_and_malformed_fall_back() {
        let missing = Path::new("/nonexistent/cat-dash/tuning.json");
        assert!(Tuning::load(missing).is_ok());

        let dir = std::env::temp_dir().join("cat-dash-tuning-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, "not json at all").unwrap();
        let tuning = Tuning::load(&path).unwrap();
        assert_eq!(tuning.shot_threshold, 20);
        std::fs::remove_file(&path).unwrap();
    }
}
