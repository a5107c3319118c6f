//! Non-hostile characters the player can talk to or trade with.

use glam::{IVec2, Vec2};

use crate::core::geom::Rect;
use crate::core::physics::PhysicsBody;
use crate::economy::inventory::PlayerData;
use crate::economy::shop::{Shop, ShopStock};

/// Horizontal reach of an interaction, px on each side of the NPC.
pub const INTERACT_REACH: i32 = 8;

/// Something the player can interact with.
pub trait Interactable {
    /// Area the player must overlap to interact.
    fn interaction_rect(&self) -> Rect;

    /// Start or advance an interaction. Returns `true` while it stays open,
    /// in which case the player's movement is locked.
    fn interact(&mut self, player: &mut PlayerData) -> bool;

    /// End the interaction and release the player.
    fn close(&mut self, player: &mut PlayerData);
}

/// Steps through a fixed list of lines, one per interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Speaker {
    lines: Vec<String>,
    cursor: Option<usize>,
}

impl Speaker {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, cursor: None }
    }

    /// Move to the next line; `None` once the dialogue is over.
    fn advance(&mut self) -> Option<&str> {
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next < self.lines.len() {
            self.cursor = Some(next);
        } else {
            self.cursor = None;
        }
        self.current_line()
    }

    pub fn current_line(&self) -> Option<&str> {
        self.cursor.and_then(|i| self.lines.get(i)).map(String::as_str)
    }

    fn reset(&mut self) {
        self.cursor = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NpcRole {
    Speaker(Speaker),
    Shop(Shop),
}

impl NpcRole {
    /// Build a role from a level spawn: `shop` entries carry stock tags,
    /// anything else speaks its properties as lines.
    pub fn from_spawn(kind: &str, properties: &[String]) -> Self {
        match kind {
            "shop" | "shopkeeper" => NpcRole::Shop(Shop::new(ShopStock::from_tags(
                kind,
                properties.iter().map(String::as_str),
            ))),
            _ => NpcRole::Speaker(Speaker::new(properties.to_vec())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub name: String,
    pub body: PhysicsBody,
    pub role: NpcRole,
    open: bool,
}

impl Npc {
    pub fn new(name: impl Into<String>, position: Vec2, size: IVec2, role: NpcRole) -> Self {
        Self {
            name: name.into(),
            body: PhysicsBody::new(position, size),
            role,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Line currently shown by a speaker.
    pub fn current_line(&self) -> Option<&str> {
        match &self.role {
            NpcRole::Speaker(speaker) => speaker.current_line(),
            NpcRole::Shop(_) => None,
        }
    }

    pub fn shop_mut(&mut self) -> Option<&mut Shop> {
        match &mut self.role {
            NpcRole::Shop(shop) => Some(shop),
            NpcRole::Speaker(_) => None,
        }
    }
}

impl Interactable for Npc {
    fn interaction_rect(&self) -> Rect {
        self.body.bbox().inflated(INTERACT_REACH, 0)
    }

    fn interact(&mut self, player: &mut PlayerData) -> bool {
        self.open = match &mut self.role {
            NpcRole::Speaker(speaker) => speaker.advance().is_some(),
            NpcRole::Shop(_) => true,
        };
        player.movable = !self.open && !player.inventory_open;
        self.open
    }

    fn close(&mut self, player: &mut PlayerData) {
        self.open = false;
        if let NpcRole::Speaker(speaker) = &mut self.role {
            speaker.reset();
        }
        player.movable = !player.inventory_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaker(lines: &[&str]) -> Npc {
        let lines = lines.iter().map(|l| l.to_string()).collect();
        Npc::new("sage", Vec2::ZERO, IVec2::new(16, 16), NpcRole::Speaker(Speaker::new(lines)))
    }

    #[test]
    fn speaker_walks_through_lines_then_releases() {
        let mut npc = speaker(&["Hello.", "Beware the cave."]);
        let mut player = PlayerData::default();

        assert!(npc.interact(&mut player));
        assert_eq!(npc.current_line(), Some("Hello."));
        assert!(!player.movable);

        assert!(npc.interact(&mut player));
        assert_eq!(npc.current_line(), Some("Beware the cave."));

        assert!(!npc.interact(&mut player));
        assert_eq!(npc.current_line(), None);
        assert!(player.movable);

        // Talking again starts over.
        assert!(npc.interact(&mut player));
        assert_eq!(npc.current_line(), Some("Hello."));
    }

    #[test]
    fn silent_speaker_never_opens() {
        let mut npc = speaker(&[]);
        let mut player = PlayerData::default();
        assert!(!npc.interact(&mut player));
        assert!(player.movable);
    }

    #[test]
    fn shop_stays_open_until_closed() {
        let role = NpcRole::from_spawn("shop", &["potion:5".to_string()]);
        let mut npc = Npc::new("trader", Vec2::ZERO, IVec2::new(16, 16), role);
        let mut player = PlayerData::default();

        assert!(npc.interact(&mut player));
        assert!(npc.is_open());
        assert!(!player.movable);
        assert_eq!(npc.shop_mut().map(|s| s.stock.items.len()), Some(1));

        npc.close(&mut player);
        assert!(!npc.is_open());
        assert!(player.movable);
    }

    #[test]
    fn reach_extends_sideways() {
        let npc = speaker(&["hi"]);
        assert_eq!(npc.interaction_rect(), Rect::new(-8, 0, 32, 16));
    }
}
