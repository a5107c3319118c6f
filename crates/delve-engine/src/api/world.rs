use glam::{IVec2, Vec2};
use log::{debug, info};

use crate::api::config::EngineConfig;
use crate::api::types::{ActorId, GameEvent};
use crate::assets::items::ItemCatalog;
use crate::components::actor::{Actor, ActorKind};
use crate::components::health::DamageOutcome;
use crate::components::level::Level;
use crate::components::tilemap::{Spawn, SpawnCategory};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::economy::npc::{Interactable, Npc, NpcRole};
use crate::economy::shop::TradeError;
use crate::input::queue::{Action, ControlState, InputQueue};
use crate::renderer::camera::Camera2D;
use crate::systems::behavior::{spawn_actor, update_enemy};
use crate::systems::player::{attack_hitbox, update_player};
use crate::systems::sensors::SensorSystem;

/// The simulation: level, actors, NPCs and everything that ties them
/// together once per frame.
pub struct World {
    config: EngineConfig,
    clock: FrameClock,
    level: Level,
    player: Actor,
    enemies: Scene,
    npcs: Vec<Npc>,
    catalog: ItemCatalog,
    rng: Rng,
    camera: Camera2D,
    controls: ControlState,
    events: Vec<GameEvent>,
    next_id: u32,
    /// NPC whose dialogue or shop is currently open.
    active_npc: Option<usize>,
}

impl World {
    pub fn new(config: EngineConfig, level: Level) -> Self {
        let player = spawn_actor(
            ActorId(0),
            ActorKind::Player,
            Vec2::ZERO,
            config.player.size_vec(),
            &config,
        )
        .with_tag("player");
        let clock = FrameClock::new(config.target_fps).with_max_dt(config.max_frame_dt);
        let camera = Camera2D::new(config.camera.width, config.camera.height)
            .with_smoothing(config.camera.smoothing);

        Self {
            clock,
            level,
            player,
            enemies: Scene::new(),
            npcs: Vec::new(),
            catalog: ItemCatalog::new(),
            rng: Rng::new(config.seed),
            camera,
            controls: ControlState::new(),
            events: Vec::new(),
            next_id: 1,
            active_npc: None,
            config,
        }
    }

    pub fn with_catalog(mut self, catalog: ItemCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn set_catalog(&mut self, catalog: ItemCatalog) {
        self.catalog = catalog;
    }

    // -- Spawning --

    /// Place a fresh player at `position` and snap the camera onto it.
    pub fn spawn_player(&mut self, position: Vec2, size: IVec2) {
        self.player = spawn_actor(ActorId(0), ActorKind::Player, position, size, &self.config)
            .with_tag("player");
        self.active_npc = None;
        self.camera.look_at(self.player.body.center());
    }

    pub fn spawn_enemy(&mut self, kind: ActorKind, position: Vec2, size: IVec2) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.enemies
            .spawn(spawn_actor(id, kind, position, size, &self.config));
        id
    }

    /// Add an NPC; returns its index for [`buy`](Self::buy).
    pub fn add_npc(&mut self, npc: Npc) -> usize {
        self.npcs.push(npc);
        self.npcs.len() - 1
    }

    /// Spawn the enemies and NPCs listed by every active region. `size`
    /// supplies the box of each spawn (normally its sprite's frame size).
    /// Returns how many actors were created.
    pub fn spawn_from_level(&mut self, size: impl Fn(&Spawn) -> IVec2) -> usize {
        let spawns: Vec<(Spawn, Vec2)> = self
            .level
            .active_grids()
            .flat_map(|grid| {
                let ts = grid.tile_size();
                grid.spawns().iter().map(move |s| (s.clone(), s.world_position(ts)))
            })
            .collect();

        for (spawn, position) in &spawns {
            let box_size = size(spawn);
            match spawn.category {
                SpawnCategory::Enemy => {
                    let id = self.spawn_enemy(ActorKind::from_spawn(&spawn.kind), *position, box_size);
                    if let Some(actor) = self.enemies.get_mut(id) {
                        actor.tag = spawn.kind.clone();
                    }
                }
                SpawnCategory::Npc => {
                    let role = NpcRole::from_spawn(&spawn.kind, &spawn.properties);
                    self.add_npc(Npc::new(spawn.kind.clone(), *position, box_size, role));
                }
            }
        }
        info!("world: spawned {} actors from level", spawns.len());
        spawns.len()
    }

    // -- Simulation --

    /// Advance one frame. `dt` is the real elapsed time and is clamped by
    /// the frame clock. Events from the previous tick are discarded.
    pub fn tick(&mut self, dt: f32, input: &mut InputQueue) {
        let dt = self.clock.frame_dt(dt);
        self.events.clear();
        self.controls.fold(input);

        if self.is_game_over() {
            return;
        }

        if self.controls.pressed(Action::Inventory) {
            self.toggle_inventory();
        }
        if self.controls.pressed(Action::Interact) {
            self.interact();
        }

        // Region changes apply before anything queries solids this tick.
        let changes = SensorSystem::evaluate(&mut self.level, self.player.body.bbox());
        self.events.extend(changes.into_iter().map(GameEvent::Region));

        update_player(&mut self.player, &self.controls, &self.config.player, dt, &self.level);
        for enemy in self.enemies.iter_mut() {
            update_enemy(enemy, &self.config, dt, &self.level, &mut self.rng);
        }
        for npc in &mut self.npcs {
            npc.body.integrate(dt, &self.level);
        }

        self.resolve_attack();
        self.resolve_contact();

        for gone in self.enemies.despawn_removed() {
            debug!("world: despawned {:?} '{}'", gone.id, gone.tag);
        }

        self.camera.follow(self.player.body.center(), dt);
    }

    /// Player swing against enemies, once per enemy per swing.
    fn resolve_attack(&mut self) {
        let cfg = &self.config.player;
        let Some(hitbox) = attack_hitbox(&self.player, cfg) else {
            return;
        };
        let Some(ctrl) = self.player.as_player_mut() else {
            return;
        };

        for enemy in self.enemies.iter_mut() {
            if enemy.is_removed() || !enemy.body.bbox().overlaps(&hitbox) {
                continue;
            }
            if !ctrl.register_hit(enemy.id) {
                continue;
            }
            match enemy.take_damage(cfg.attack_damage) {
                DamageOutcome::Hurt { remaining } => {
                    self.events.push(GameEvent::EnemyDamaged { id: enemy.id, remaining });
                }
                DamageOutcome::Killed => {
                    ctrl.data.wallet.earn(enemy.bounty);
                    self.events.push(GameEvent::EnemyKilled {
                        id: enemy.id,
                        bounty: enemy.bounty,
                    });
                }
                DamageOutcome::Ignored | DamageOutcome::Blocked => {}
            }
        }
    }

    /// Enemies touching the player hurt it.
    fn resolve_contact(&mut self) {
        let player_box = self.player.body.bbox();
        for enemy in self.enemies.iter() {
            if enemy.is_removed() || enemy.contact_damage <= 0 || !enemy.body.bbox().overlaps(&player_box) {
                continue;
            }
            match self.player.take_damage(enemy.contact_damage) {
                DamageOutcome::Hurt { remaining } => {
                    self.events.push(GameEvent::PlayerDamaged { remaining });
                }
                DamageOutcome::Killed => {
                    info!("world: player killed by {:?} '{}'", enemy.id, enemy.tag);
                    self.events.push(GameEvent::PlayerDied);
                    return;
                }
                DamageOutcome::Ignored | DamageOutcome::Blocked => {}
            }
        }
    }

    // -- Interaction --

    /// Interact with the open NPC, or the first one in reach.
    fn interact(&mut self) {
        if self.player_data_inventory_open() {
            return;
        }
        let index = match self.active_npc {
            Some(index) => index,
            None => {
                let player_box = self.player.body.bbox();
                match self
                    .npcs
                    .iter()
                    .position(|npc| npc.interaction_rect().overlaps(&player_box))
                {
                    Some(index) => index,
                    None => return,
                }
            }
        };

        let Some(npc) = self.npcs.get_mut(index) else {
            self.active_npc = None;
            return;
        };
        // A second press on an open shop closes it.
        if self.active_npc.is_some() && matches!(npc.role, NpcRole::Shop(_)) {
            self.close_interaction();
            return;
        }
        let Some(ctrl) = self.player.as_player_mut() else {
            return;
        };

        if npc.interact(&mut ctrl.data) {
            self.active_npc = Some(index);
            let event = match npc.current_line() {
                Some(line) => GameEvent::Dialogue {
                    npc: index,
                    line: line.to_string(),
                },
                None => GameEvent::ShopOpened { npc: index },
            };
            self.events.push(event);
        } else if self.active_npc.take().is_some() {
            self.events.push(GameEvent::InteractionClosed { npc: index });
        }
    }

    fn player_data_inventory_open(&self) -> bool {
        self.player
            .as_player()
            .is_some_and(|ctrl| ctrl.data.inventory_open)
    }

    /// Close any open dialogue or shop and release the player.
    pub fn close_interaction(&mut self) {
        let Some(index) = self.active_npc.take() else {
            return;
        };
        if let (Some(npc), Some(ctrl)) = (self.npcs.get_mut(index), self.player.as_player_mut()) {
            npc.close(&mut ctrl.data);
        }
        self.events.push(GameEvent::InteractionClosed { npc: index });
    }

    /// Open or close the inventory screen. Returns whether it is now open.
    pub fn toggle_inventory(&mut self) -> bool {
        let locked_by_npc = self.active_npc.is_some();
        let Some(ctrl) = self.player.as_player_mut() else {
            return false;
        };
        let open = ctrl.data.toggle_inventory();
        if locked_by_npc {
            ctrl.data.movable = false;
        }
        self.events.push(GameEvent::InventoryToggled { open });
        open
    }

    /// Buy one `item_id` from the shop NPC at `npc`. Returns the price paid.
    /// The shop must have been opened with Interact first.
    pub fn buy(&mut self, npc: usize, item_id: &str) -> Result<u32, TradeError> {
        let shop = self
            .npcs
            .get_mut(npc)
            .and_then(Npc::shop_mut)
            .ok_or(TradeError::NoShop(npc))?;
        if self.active_npc != Some(npc) {
            return Err(TradeError::NotTrading(npc));
        }
        let ctrl = self.player.as_player_mut().ok_or(TradeError::NoShop(npc))?;

        let price = shop.buy(&self.catalog, item_id, &mut ctrl.data)?;
        info!("world: bought '{}' from '{}' for {}", item_id, shop.name(), price);
        self.events.push(GameEvent::Purchased {
            npc,
            item: item_id.to_string(),
            price,
        });
        Ok(price)
    }

    // -- Accessors --

    /// Events produced by the last tick (and any purchases since).
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.player
    }

    pub fn enemies(&self) -> &Scene {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut Scene {
        &mut self.enemies
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn active_npc(&self) -> Option<usize> {
        self.active_npc
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }

    pub fn is_game_over(&self) -> bool {
        self.player.is_removed() || self.player.health.is_dead()
    }
}
