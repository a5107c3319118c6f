//! Flyer: drifts diagonally, bouncing off solids and wandering at random.

use glam::Vec2;

use crate::api::config::FlyerConfig;
use crate::components::actor::{Actor, Behavior, Facing};
use crate::core::physics::SolidQuery;
use crate::core::rng::Rng;

#[derive(Debug, Clone)]
pub struct FlyerState {
    /// Each component is -1 or +1.
    direction: Vec2,
    since_change: f32,
}

impl FlyerState {
    pub fn new(direction: Vec2) -> Self {
        let unit = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
        Self {
            direction: Vec2::new(unit(direction.x), unit(direction.y)),
            since_change: 0.0,
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Turn back along both axes.
    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

pub fn update_flyer<S: SolidQuery + ?Sized>(
    actor: &mut Actor,
    cfg: &FlyerConfig,
    dt: f32,
    solids: &S,
    rng: &mut Rng,
) {
    let Actor {
        body,
        facing,
        behavior,
        ..
    } = actor;
    let Behavior::Flyer(state) = behavior else {
        return;
    };

    state.since_change += dt;
    if state.since_change >= cfg.change_interval {
        state.since_change = 0.0;
        if rng.chance(cfg.flip_chance) {
            state.direction.y = -state.direction.y;
        }
        if rng.chance(cfg.flip_chance) {
            state.direction.x = -state.direction.x;
        }
    }

    body.velocity = state.direction * cfg.speed;
    body.integrate(dt, solids);

    let flags = body.collisions();
    if flags.horizontal() {
        state.direction.x = -state.direction.x;
    }
    if flags.vertical() {
        state.direction.y = -state.direction.y;
    }
    if let Some(f) = Facing::from_sign(state.direction.x) {
        *facing = f;
    }
}
