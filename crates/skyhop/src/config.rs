//! Game tuning values

use serde::{Deserialize, Serialize};

/// Tuning for one round of skyhop
///
/// Every field participates in the deterministic state: two runs only
/// replay identically when they share a config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Downward acceleration in units per second squared
    pub gravity: f32,

    /// Upward velocity applied by a hop
    pub hop_impulse: f32,

    /// Leftward pillar speed in units per second
    pub scroll_speed: f32,

    /// Seconds between pillar pair spawns
    pub spawn_interval: f32,

    /// Vertical opening between a pillar pair
    pub gap_height: f32,

    /// Pillar width
    pub pillar_width: f32,

    /// Pillar height
    pub pillar_height: f32,

    /// Maximum gap-center offset from the world midline
    pub gap_center_range: f32,

    /// Half the playable vertical extent; leaving it is fatal
    pub world_half_height: f32,

    /// X coordinate where pillars spawn
    pub spawn_x: f32,

    /// X coordinate the hopper flies at
    pub hopper_x: f32,

    /// Seed for the scene's random source
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: -1500.0,
            hop_impulse: 500.0,
            scroll_speed: 180.0,
            spawn_interval: 1.8,
            gap_height: 250.0,
            pillar_width: 80.0,
            pillar_height: 1000.0,
            gap_center_range: 200.0,
            world_half_height: 650.0,
            spawn_x: 600.0,
            hopper_x: -150.0,
            seed: 1337,
        }
    }
}

impl GameConfig {
    /// Load a config from a RON file, falling back to defaults when the
    /// file is missing or malformed
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match ron::from_str(&text) {
                Ok(config) => {
                    log::info!("loaded game config from {path}");
                    config
                }
                Err(err) => {
                    log::warn!("ignoring malformed config {path}: {err}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config at {path}, using defaults");
                Self::default()
            }
        }
    }
}
