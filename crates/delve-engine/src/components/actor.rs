use crate::api::types::ActorId;
use crate::components::health::{DamageOutcome, Health};
use crate::core::physics::PhysicsBody;
use crate::systems::crawler::CrawlerState;
use crate::systems::flyer::FlyerState;
use crate::systems::player::PlayerController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn from_sign(sign: f32) -> Option<Self> {
        if sign < 0.0 {
            Some(Facing::Left)
        } else if sign > 0.0 {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Movement policy plus its per-actor state.
#[derive(Debug, Clone)]
pub enum Behavior {
    Player(PlayerController),
    GroundCrawler(CrawlerState),
    Flyer(FlyerState),
    Generic,
}

/// Payload-free tag of a [`Behavior`], for dispatch and spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    GroundCrawler,
    Flyer,
    Generic,
}

impl ActorKind {
    /// Map a level spawn `type` onto an enemy policy. Unknown kinds get the
    /// generic gravity-only policy.
    pub fn from_spawn(kind: &str) -> Self {
        match kind {
            "ground_crawler" | "crawler" | "crawling" => ActorKind::GroundCrawler,
            "flyer" | "flying" => ActorKind::Flyer,
            _ => ActorKind::Generic,
        }
    }
}

impl Behavior {
    pub fn kind(&self) -> ActorKind {
        match self {
            Behavior::Player(_) => ActorKind::Player,
            Behavior::GroundCrawler(_) => ActorKind::GroundCrawler,
            Behavior::Flyer(_) => ActorKind::Flyer,
            Behavior::Generic => ActorKind::Generic,
        }
    }
}

/// Anything that moves under its own policy: the player and every enemy.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    /// Free-form label, usually the spawn `type`.
    pub tag: String,
    pub body: PhysicsBody,
    pub health: Health,
    pub facing: Facing,
    pub behavior: Behavior,
    /// Damage dealt to the player on touch.
    pub contact_damage: i32,
    /// Currency paid out when killed by the player.
    pub bounty: u32,
    removed: bool,
}

impl Actor {
    pub fn new(id: ActorId, body: PhysicsBody, health: Health, behavior: Behavior) -> Self {
        Self {
            id,
            tag: String::new(),
            body,
            health,
            facing: Facing::default(),
            behavior,
            contact_damage: 0,
            bounty: 0,
            removed: false,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_contact_damage(mut self, damage: i32) -> Self {
        self.contact_damage = damage;
        self
    }

    pub fn with_bounty(mut self, bounty: u32) -> Self {
        self.bounty = bounty;
        self
    }

    pub fn kind(&self) -> ActorKind {
        self.behavior.kind()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub fn as_player(&self) -> Option<&PlayerController> {
        match &self.behavior {
            Behavior::Player(ctrl) => Some(ctrl),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerController> {
        match &mut self.behavior {
            Behavior::Player(ctrl) => Some(ctrl),
            _ => None,
        }
    }

    /// Apply damage through the health windows. A kill marks the actor
    /// removed; a flyer that survives reverses course.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.removed {
            return DamageOutcome::Ignored;
        }
        let outcome = self.health.take_damage(amount);
        match outcome {
            DamageOutcome::Killed => self.removed = true,
            DamageOutcome::Hurt { .. } => {
                if let Behavior::Flyer(state) = &mut self.behavior {
                    state.reverse();
                }
            }
            DamageOutcome::Ignored | DamageOutcome::Blocked => {}
        }
        outcome
    }
}
