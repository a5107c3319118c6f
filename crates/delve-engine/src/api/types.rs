use crate::systems::sensors::RegionChange;

/// Unique identifier for an actor in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

/// Something the host may want to react to (sound, UI, screen shake).
/// Collected per tick and readable until the next tick starts.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Region(RegionChange),
    EnemyDamaged { id: ActorId, remaining: i32 },
    EnemyKilled { id: ActorId, bounty: u32 },
    PlayerDamaged { remaining: i32 },
    PlayerDied,
    /// A speaker NPC shows a line.
    Dialogue { npc: usize, line: String },
    ShopOpened { npc: usize },
    InteractionClosed { npc: usize },
    InventoryToggled { open: bool },
    Purchased { npc: usize, item: String, price: u32 },
}
