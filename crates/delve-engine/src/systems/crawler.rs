//! Ground crawler: walks back and forth, turning at walls and ledges.

use crate::api::config::CrawlerConfig;
use crate::components::actor::{Actor, Behavior, Facing};
use crate::core::geom::Rect;
use crate::core::physics::SolidQuery;
use crate::core::time::Cooldown;

#[derive(Debug, Clone)]
pub struct CrawlerState {
    /// +1 right, -1 left.
    direction: i32,
    unsupported_ticks: u32,
    flip_cooldown: Cooldown,
}

impl CrawlerState {
    pub fn new(direction: i32) -> Self {
        Self {
            direction: if direction < 0 { -1 } else { 1 },
            unsupported_ticks: 0,
            flip_cooldown: Cooldown::new(),
        }
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn unsupported_ticks(&self) -> u32 {
        self.unsupported_ticks
    }
}

impl Default for CrawlerState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Whether any probe ahead of the leading edge finds solid ground.
pub fn has_ground_ahead<S: SolidQuery + ?Sized>(
    bbox: &Rect,
    direction: i32,
    cfg: &CrawlerConfig,
    solids: &S,
) -> bool {
    let lead = if direction > 0 { bbox.right() - 1 } else { bbox.left() };
    let feet = bbox.bottom() - 1;
    cfg.probe_offsets.iter().any(|offset| {
        let px = lead + direction * offset;
        cfg.probe_depths
            .iter()
            .any(|depth| solids.is_solid_at(px, feet + depth))
    })
}

pub fn update_crawler<S: SolidQuery + ?Sized>(
    actor: &mut Actor,
    cfg: &CrawlerConfig,
    dt: f32,
    solids: &S,
) {
    let Actor {
        body,
        facing,
        behavior,
        ..
    } = actor;
    let Behavior::GroundCrawler(state) = behavior else {
        return;
    };

    state.flip_cooldown.tick(dt);
    body.velocity.x = cfg.speed * state.direction as f32;
    body.integrate(dt, solids);

    let flags = body.collisions();
    let blocked = (state.direction > 0 && flags.right) || (state.direction < 0 && flags.left);

    let wants_flip = if blocked {
        true
    } else if !flags.bottom {
        // Airborne: ledge logic only runs while standing.
        state.unsupported_ticks = 0;
        false
    } else if has_ground_ahead(&body.bbox(), state.direction, cfg, solids) {
        state.unsupported_ticks = 0;
        false
    } else {
        state.unsupported_ticks += 1;
        state.unsupported_ticks >= cfg.ledge_frames_threshold
    };

    if wants_flip && state.flip_cooldown.is_ready() {
        state.direction = -state.direction;
        state.unsupported_ticks = 0;
        state.flip_cooldown.start(cfg.flip_cooldown);
        body.nudge_x(state.direction * cfg.nudge, solids);
        *facing = if state.direction < 0 { Facing::Left } else { Facing::Right };
    }
}
