pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod economy;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{EngineConfig, PhysicsConfig, PlayerConfig, RegionConfig};
pub use api::types::{ActorId, GameEvent};
pub use api::world::World;
pub use assets::items::{Item, ItemCatalog};
pub use assets::level::{LevelDescription, LoadError};
pub use components::actor::{Actor, ActorKind, Behavior, Facing};
pub use components::health::{DamageOutcome, Health};
pub use components::level::Level;
pub use components::sensor::{Sensor, SensorEffect, SensorKind};
pub use components::tilemap::{GridPos, Spawn, SpawnCategory, Tile, TileGrid, TileVariant};
pub use core::geom::Rect;
pub use core::physics::{CollisionFlags, PhysicsBody, SolidQuery};
pub use core::scene::Scene;
pub use core::time::{Cooldown, FrameClock};
pub use economy::inventory::{Inventory, PlayerData, Wallet};
pub use economy::npc::{Interactable, Npc, NpcRole, Speaker};
pub use economy::shop::{Shop, ShopStock, TradeError};
pub use input::queue::{Action, ControlState, InputEvent, InputQueue};
pub use renderer::camera::Camera2D;
pub use renderer::instance::TileInstance;
pub use systems::player::{PlayerController, PlayerState};
pub use systems::sensors::{RegionChange, SensorSystem};
