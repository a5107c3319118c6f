use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Engine-wide tuning. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target frame rate used by the frame clock.
    pub target_fps: f32,
    /// Largest `dt` a single tick may advance.
    pub max_frame_dt: f32,
    /// Seed for wandering enemies.
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub crawler: CrawlerConfig,
    pub flyer: FlyerConfig,
    pub generic: EnemyStats,
    pub damage: DamageConfig,
    pub camera: CameraConfig,
    pub regions: Vec<RegionConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            max_frame_dt: 3.0 / 60.0,
            seed: 42,
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            crawler: CrawlerConfig::default(),
            flyer: FlyerConfig::default(),
            generic: EnemyStats::default(),
            damage: DamageConfig::default(),
            camera: CameraConfig::default(),
            regions: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration, px/s².
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Sub-step length in pixels.
    pub step_size: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1200.0,
            max_fall_speed: 1200.0,
            step_size: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub size: [i32; 2],
    pub max_speed: f32,
    pub acceleration: f32,
    pub ground_friction: f32,
    /// Extra ground deceleration proportional to |vx|.
    pub ground_drag: f32,
    pub air_friction: f32,
    /// Negative is up.
    pub jump_velocity: f32,
    pub air_jumps: u32,
    pub terminal_velocity: f32,
    pub max_health: i32,
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    pub attack_damage: i32,
    pub attack_size: [i32; 2],
    pub starting_currency: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: [32, 32],
            max_speed: 200.0,
            acceleration: 1000.0,
            ground_friction: 1200.0,
            ground_drag: 6.0,
            air_friction: 400.0,
            jump_velocity: -800.0,
            air_jumps: 1,
            terminal_velocity: 2000.0,
            max_health: 10,
            attack_duration: 0.3,
            attack_cooldown: 0.45,
            attack_damage: 1,
            attack_size: [24, 24],
            starting_currency: 0,
        }
    }
}

impl PlayerConfig {
    pub fn size_vec(&self) -> IVec2 {
        IVec2::from_array(self.size)
    }
}

/// Shared enemy stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub max_health: i32,
    pub contact_damage: i32,
    pub bounty: u32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: 3,
            contact_damage: 1,
            bounty: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    pub speed: f32,
    /// Consecutive unsupported grounded ticks before turning around.
    pub ledge_frames_threshold: u32,
    pub flip_cooldown: f32,
    /// Pixels moved back from the edge after a flip.
    pub nudge: i32,
    /// Probe x offsets ahead of the leading edge, px.
    pub probe_offsets: Vec<i32>,
    /// Probe y offsets below the feet, px.
    pub probe_depths: Vec<i32>,
    pub stats: EnemyStats,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            speed: 50.0,
            ledge_frames_threshold: 3,
            flip_cooldown: 0.25,
            nudge: 2,
            probe_offsets: vec![1, 4, 8],
            probe_depths: vec![1, 3],
            stats: EnemyStats::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyerConfig {
    pub speed: f32,
    /// Seconds between random course changes.
    pub change_interval: f32,
    /// Per-axis flip probability at each change.
    pub flip_chance: f32,
    pub start_direction: [f32; 2],
    pub stats: EnemyStats,
}

impl Default for FlyerConfig {
    fn default() -> Self {
        Self {
            speed: 50.0,
            change_interval: 2.0,
            flip_chance: 0.3,
            start_direction: [-1.0, 1.0],
            stats: EnemyStats {
                bounty: 3,
                ..EnemyStats::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub hurt_window: f32,
    pub immunity_window: f32,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            hurt_window: 0.1,
            immunity_window: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: f32,
    pub height: f32,
    /// Fraction of the gap kept per 60 Hz frame.
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            smoothing: 0.9,
        }
    }
}

/// Placement of one named region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    /// Offset in grid cells.
    #[serde(default)]
    pub origin: [i32; 2],
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RegionConfig {
    pub fn origin_vec(&self) -> IVec2 {
        IVec2::from_array(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = EngineConfig::from_json("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.crawler.probe_offsets, vec![1, 4, 8]);
        assert_eq!(cfg.player.jump_velocity, -800.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{ "seed": 7,
                 "player": { "max_speed": 250 },
                 "regions": [ { "name": "surface" }, { "name": "cave", "origin": [40, 0], "active": false } ] }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.player.max_speed, 250.0);
        assert_eq!(cfg.player.acceleration, 1000.0);
        assert!(cfg.regions[0].active);
        assert_eq!(cfg.regions[1].origin_vec(), IVec2::new(40, 0));
        assert!(!cfg.regions[1].active);
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(EngineConfig::from_json(r#"{ "seed": "many" }"#).is_err());
    }
}
