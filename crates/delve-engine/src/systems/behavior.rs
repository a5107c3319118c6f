//! Enemy dispatch and actor construction from configuration.

use glam::{IVec2, Vec2};

use crate::api::config::{EnemyStats, EngineConfig};
use crate::api::types::ActorId;
use crate::components::actor::{Actor, ActorKind, Behavior};
use crate::components::health::Health;
use crate::core::physics::{PhysicsBody, SolidQuery};
use crate::core::rng::Rng;
use crate::systems::crawler::{update_crawler, CrawlerState};
use crate::systems::flyer::{update_flyer, FlyerState};
use crate::systems::player::PlayerController;

/// One tick of an enemy's policy followed by physics.
/// The player is driven by `update_player` instead and is skipped here.
pub fn update_enemy<S: SolidQuery + ?Sized>(
    actor: &mut Actor,
    cfg: &EngineConfig,
    dt: f32,
    solids: &S,
    rng: &mut Rng,
) {
    if actor.is_removed() {
        return;
    }
    actor.health.tick(dt);
    match actor.kind() {
        ActorKind::GroundCrawler => update_crawler(actor, &cfg.crawler, dt, solids),
        ActorKind::Flyer => update_flyer(actor, &cfg.flyer, dt, solids, rng),
        ActorKind::Generic => actor.body.integrate(dt, solids),
        ActorKind::Player => {}
    }
}

/// Build an actor of `kind` with its body, health and policy state
/// taken from `cfg`.
pub fn spawn_actor(id: ActorId, kind: ActorKind, position: Vec2, size: IVec2, cfg: &EngineConfig) -> Actor {
    let phys = &cfg.physics;
    let body = PhysicsBody::new(position, size)
        .with_gravity(phys.gravity)
        .with_max_fall_speed(phys.max_fall_speed)
        .with_step_size(phys.step_size);

    let (body, behavior, stats) = match kind {
        ActorKind::Player => {
            let player = &cfg.player;
            let body = body.with_max_fall_speed(player.terminal_velocity);
            let stats = EnemyStats {
                max_health: player.max_health,
                contact_damage: 0,
                bounty: 0,
            };
            (body, Behavior::Player(PlayerController::new(player)), stats)
        }
        ActorKind::GroundCrawler => (
            body,
            Behavior::GroundCrawler(CrawlerState::new(1)),
            cfg.crawler.stats,
        ),
        ActorKind::Flyer => {
            let [dx, dy] = cfg.flyer.start_direction;
            let body = body.with_gravity(0.0).with_max_fall_speed(0.0);
            (body, Behavior::Flyer(FlyerState::new(Vec2::new(dx, dy))), cfg.flyer.stats)
        }
        ActorKind::Generic => (body, Behavior::Generic, cfg.generic),
    };

    Actor::new(id, body, Health::new(stats.max_health, &cfg.damage), behavior)
        .with_contact_damage(stats.contact_damage)
        .with_bounty(stats.bounty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geom::Rect;
    use crate::core::physics::tests::Solids;

    const DT: f32 = 1.0 / 60.0;

    fn spawn(kind: ActorKind, cfg: &EngineConfig) -> Actor {
        spawn_actor(ActorId(1), kind, Vec2::new(32.0, 0.0), IVec2::new(16, 16), cfg)
    }

    #[test]
    fn factory_applies_configured_stats() {
        let cfg = EngineConfig::default();

        let crawler = spawn(ActorKind::GroundCrawler, &cfg);
        assert_eq!(crawler.kind(), ActorKind::GroundCrawler);
        assert_eq!(crawler.health.max(), cfg.crawler.stats.max_health);
        assert_eq!(crawler.contact_damage, cfg.crawler.stats.contact_damage);
        assert_eq!(crawler.bounty, cfg.crawler.stats.bounty);

        let flyer = spawn(ActorKind::Flyer, &cfg);
        assert_eq!(flyer.body.gravity, 0.0);
        assert_eq!(flyer.bounty, cfg.flyer.stats.bounty);

        let player = spawn(ActorKind::Player, &cfg);
        assert!(player.as_player().is_some());
        assert_eq!(player.health.max(), cfg.player.max_health);
        assert_eq!(player.contact_damage, 0);
    }

    #[test]
    fn generic_enemy_only_falls() {
        let cfg = EngineConfig::default();
        let world = Solids(vec![Rect::new(0, 64, 256, 32)]);
        let mut rng = Rng::new(1);
        let mut actor = spawn(ActorKind::Generic, &cfg);

        for _ in 0..120 {
            update_enemy(&mut actor, &cfg, DT, &world, &mut rng);
        }
        assert!(actor.body.is_grounded());
        assert_eq!(actor.body.bbox(), Rect::new(32, 48, 16, 16));
    }

    #[test]
    fn flyer_ignores_gravity() {
        let cfg = EngineConfig::default();
        let world = Solids(Vec::new());
        let mut rng = Rng::new(1);
        let mut actor = spawn(ActorKind::Flyer, &cfg);

        update_enemy(&mut actor, &cfg, DT, &world, &mut rng);
        let [dx, dy] = cfg.flyer.start_direction;
        assert_eq!(actor.body.velocity, Vec2::new(dx, dy) * cfg.flyer.speed);
    }

    #[test]
    fn removed_enemies_are_frozen() {
        let cfg = EngineConfig::default();
        let world = Solids(Vec::new());
        let mut rng = Rng::new(1);
        let mut actor = spawn(ActorKind::Generic, &cfg);
        actor.mark_removed();

        update_enemy(&mut actor, &cfg, DT, &world, &mut rng);
        assert_eq!(actor.body.position(), Vec2::new(32.0, 0.0));
    }
}
