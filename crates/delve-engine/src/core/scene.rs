use crate::api::types::ActorId;
use crate::components::actor::{Actor, ActorKind};

/// Actor storage using a flat Vec.
/// Level populations are small (tens of enemies), so linear lookups are fine.
pub struct Scene {
    actors: Vec<Actor>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            actors: Vec::with_capacity(64),
        }
    }

    pub fn spawn(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Remove an actor by ID, keeping the order of the rest.
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        let idx = self.actors.iter().position(|a| a.id == id)?;
        Some(self.actors.remove(idx))
    }

    /// Drop every actor marked removed and return them.
    pub fn despawn_removed(&mut self) -> Vec<Actor> {
        let (removed, kept): (Vec<Actor>, Vec<Actor>) =
            std::mem::take(&mut self.actors).into_iter().partition(Actor::is_removed);
        self.actors = kept;
        removed
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.tag == tag)
    }

    pub fn count_kind(&self, kind: ActorKind) -> usize {
        self.actors.iter().filter(|a| a.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn clear(&mut self) {
        self.actors.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
