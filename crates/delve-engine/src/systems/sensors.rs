//! Region activation driven by the player walking through sensors.

use log::{debug, warn};

use crate::components::level::Level;
use crate::components::sensor::SensorEffect;
use crate::core::geom::Rect;

/// One applied sensor effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionChange {
    /// Id of the sensor that fired.
    pub sensor: String,
    pub region: String,
    /// Activation of `region` after the effect.
    pub active: bool,
    /// Current region after the effect.
    pub current: Option<String>,
}

pub struct SensorSystem;

impl SensorSystem {
    /// Test every render sensor of every grid against `player_box`, fire
    /// effects on entry and apply them to `level` in order.
    pub fn evaluate(level: &mut Level, player_box: Rect) -> Vec<RegionChange> {
        let mut fired: Vec<(String, SensorEffect)> = Vec::new();

        for grid in level.grids_mut() {
            let tile_size = grid.tile_size();
            for sensor in grid.sensors_mut() {
                if !sensor.is_render_trigger() {
                    continue;
                }
                let inside = sensor.world_rect(tile_size).overlaps(&player_box);
                if inside && !sensor.triggered {
                    sensor.triggered = true;
                    debug!("sensor '{}' entered", sensor.id);
                    fired.extend(sensor.effects.iter().map(|e| (sensor.id.clone(), e.clone())));
                } else if !inside && sensor.triggered {
                    sensor.triggered = false;
                }
            }
        }

        fired
            .into_iter()
            .filter_map(|(sensor, effect)| Self::apply(level, sensor, &effect))
            .collect()
    }

    /// Apply one effect. Unknown region names are logged and skipped.
    pub fn apply(level: &mut Level, sensor: String, effect: &SensorEffect) -> Option<RegionChange> {
        let region = effect.target();
        let Some(grid) = level.get_mut(region) else {
            warn!("sensor '{}': unknown region '{}'", sensor, region);
            return None;
        };

        let active = match effect {
            SensorEffect::Render(_) => {
                grid.active = true;
                level.set_current(Some(region.to_string()));
                true
            }
            SensorEffect::Derender(_) => {
                grid.active = false;
                if level.current() == Some(region) {
                    Self::move_current_to_first_active(level);
                }
                false
            }
            SensorEffect::ToggleRender(_) => {
                grid.active = !grid.active;
                let active = grid.active;
                Self::move_current_to_first_active(level);
                active
            }
        };

        Some(RegionChange {
            sensor,
            region: region.to_string(),
            active,
            current: level.current().map(str::to_string),
        })
    }

    /// Point `current` at the first active grid; keep it as-is if none is active.
    fn move_current_to_first_active(level: &mut Level) {
        if let Some(first) = level.first_active().map(str::to_string) {
            level.set_current(Some(first));
        }
    }
}
