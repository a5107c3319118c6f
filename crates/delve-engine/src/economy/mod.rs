pub mod inventory;
pub mod npc;
pub mod shop;
