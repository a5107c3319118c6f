//! Player movement policy: run, jump, air-jump, attack.

use std::collections::HashSet;

use crate::api::config::PlayerConfig;
use crate::api::types::ActorId;
use crate::components::actor::{Actor, Behavior, Facing};
use crate::core::geom::Rect;
use crate::core::physics::SolidQuery;
use crate::core::time::Cooldown;
use crate::economy::inventory::PlayerData;
use crate::input::queue::{Action, ControlState};

/// Derived animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Run,
    Jump,
    Fall,
    Attack,
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    air_jumps_left: u32,
    /// Time left on the current swing.
    attack_timer: Cooldown,
    /// Time until the next swing may start.
    attack_cooldown: Cooldown,
    /// Enemies already damaged by the current swing.
    already_hit: HashSet<ActorId>,
    pub data: PlayerData,
}

impl PlayerController {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            air_jumps_left: cfg.air_jumps,
            attack_timer: Cooldown::new(),
            attack_cooldown: Cooldown::new(),
            already_hit: HashSet::new(),
            data: PlayerData::new(cfg.starting_currency),
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_timer.is_running()
    }

    pub fn air_jumps_left(&self) -> u32 {
        self.air_jumps_left
    }

    /// Record that the current swing hit `id`. Returns `false` if it already had.
    pub fn register_hit(&mut self, id: ActorId) -> bool {
        self.already_hit.insert(id)
    }

    fn start_attack(&mut self, cfg: &PlayerConfig) {
        self.already_hit.clear();
        self.attack_timer.start(cfg.attack_duration);
        self.attack_cooldown.start(cfg.attack_cooldown);
    }
}

pub fn player_state(actor: &Actor) -> PlayerState {
    let Some(ctrl) = actor.as_player() else {
        return PlayerState::Idle;
    };
    let body = &actor.body;
    if ctrl.is_attacking() {
        PlayerState::Attack
    } else if !body.is_grounded() {
        if body.velocity.y < 0.0 {
            PlayerState::Jump
        } else {
            PlayerState::Fall
        }
    } else if body.velocity.x.abs() > f32::EPSILON {
        PlayerState::Run
    } else {
        PlayerState::Idle
    }
}

/// Active attack hitbox, offset to the facing side and vertically centered.
pub fn attack_hitbox(actor: &Actor, cfg: &PlayerConfig) -> Option<Rect> {
    let ctrl = actor.as_player()?;
    if !ctrl.is_attacking() {
        return None;
    }
    let bbox = actor.body.bbox();
    let [w, h] = cfg.attack_size;
    let x = match actor.facing {
        Facing::Right => bbox.right(),
        Facing::Left => bbox.left() - w,
    };
    let y = bbox.center().y as i32 - h / 2;
    Some(Rect::new(x, y, w, h))
}

/// One tick of player control followed by physics.
pub fn update_player<S: SolidQuery + ?Sized>(
    actor: &mut Actor,
    controls: &ControlState,
    cfg: &PlayerConfig,
    dt: f32,
    solids: &S,
) {
    let Actor {
        body,
        health,
        facing,
        behavior,
        ..
    } = actor;
    let Behavior::Player(ctrl) = behavior else {
        return;
    };

    health.tick(dt);
    ctrl.attack_timer.tick(dt);
    ctrl.attack_cooldown.tick(dt);

    let grounded = body.is_grounded();
    let enabled = ctrl.data.movable;

    let dir = if enabled { controls.horizontal() } else { 0 };
    if dir != 0 {
        body.velocity.x += dir as f32 * cfg.acceleration * dt;
        *facing = if dir < 0 { Facing::Left } else { Facing::Right };
    } else if body.velocity.x != 0.0 {
        let vx = body.velocity.x;
        let decel = if grounded {
            (cfg.ground_friction + vx.abs() * cfg.ground_drag) * dt
        } else {
            cfg.air_friction * dt
        };
        body.velocity.x = if vx > 0.0 {
            (vx - decel).max(0.0)
        } else {
            (vx + decel).min(0.0)
        };
    }

    if enabled {
        if controls.pressed(Action::Jump) {
            if grounded {
                body.velocity.y = cfg.jump_velocity;
            } else if ctrl.air_jumps_left > 0 {
                body.velocity.y = cfg.jump_velocity;
                ctrl.air_jumps_left -= 1;
            }
        } else if controls.released(Action::Jump) && body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }

        if controls.pressed(Action::Attack) && ctrl.attack_cooldown.is_ready() {
            ctrl.start_attack(cfg);
        }
    }

    body.integrate(dt, solids);

    if body.is_grounded() {
        ctrl.air_jumps_left = cfg.air_jumps;
    }
    body.velocity.x = body.velocity.x.clamp(-cfg.max_speed, cfg.max_speed);
    body.velocity.y = body.velocity.y.min(cfg.terminal_velocity);
}
