//! Actors on the stage and which one scripts drive

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Point};

/// An on-screen character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub position: Point,
    /// Character kind, e.g. the glyph the presentation layer draws
    pub kind: String,
    pub speech: Option<String>,
}

impl Actor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            position: Point::ORIGIN,
            kind: kind.into(),
            speech: None,
        }
    }
}

/// The collection of actors, never empty, with exactly one active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    actors: Vec<Actor>,
    active: ActorId,
}

impl Roster {
    /// Roster holding a single active actor of `kind`
    pub fn new(kind: impl Into<String>) -> Self {
        let actor = Actor::new(kind);
        let active = actor.id;
        Self {
            actors: vec![actor],
            active,
        }
    }

    /// Add an actor at the origin and make it active
    pub fn add(&mut self, kind: impl Into<String>) -> ActorId {
        let actor = Actor::new(kind);
        let id = actor.id;
        self.actors.push(actor);
        self.active = id;
        id
    }

    /// Remove an actor unless it is the last one
    ///
    /// If the active actor goes, the first remaining actor becomes active.
    pub fn remove(&mut self, id: ActorId) -> bool {
        if self.actors.len() <= 1 {
            return false;
        }
        let before = self.actors.len();
        self.actors.retain(|a| a.id != id);
        if self.actors.len() == before {
            return false;
        }
        if self.active == id {
            if let Some(first) = self.actors.first() {
                self.active = first.id;
            }
        }
        true
    }

    /// Make an existing actor the active one
    pub fn select(&mut self, id: ActorId) -> bool {
        if self.contains(id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    pub fn move_to(&mut self, id: ActorId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(actor) => {
                actor.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_speech(&mut self, id: ActorId, speech: Option<String>) -> bool {
        match self.get_mut(id) {
            Some(actor) => {
                actor.speech = speech;
                true
            }
            None => false,
        }
    }

    pub fn clear_all_speech(&mut self) {
        for actor in &mut self.actors {
            actor.speech = None;
        }
    }

    pub fn return_all_to_origin(&mut self) {
        for actor in &mut self.actors {
            actor.position = Point::ORIGIN;
        }
    }

    pub fn active_id(&self) -> ActorId {
        self.active
    }

    pub fn active(&self) -> Option<&Actor> {
        self.get(self.active)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_roster_has_one_active_actor_at_origin() {
        let roster = Roster::new("cat");
        assert_eq!(roster.len(), 1);
        let active = roster.active().unwrap();
        assert_eq!(active.kind, "cat");
        assert_eq!(active.position, Point::ORIGIN);
        assert_eq!(active.speech, None);
    }

    #[test]
    fn test_add_makes_new_actor_active() {
        let mut roster = Roster::new("cat");
        let first = roster.active_id();
        let dog = roster.add("dog");

        assert_ne!(first, dog);
        assert_eq!(roster.active_id(), dog);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_cannot_remove_last_actor() {
        let mut roster = Roster::new("cat");
        let only = roster.active_id();
        assert!(!roster.remove(only));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_removing_active_falls_back_to_first() {
        let mut roster = Roster::new("cat");
        let cat = roster.active_id();
        roster.add("dog");
        let fox = roster.add("fox");

        assert!(roster.remove(fox));
        assert_eq!(roster.active_id(), cat);
    }

    #[test]
    fn test_removing_inactive_keeps_active() {
        let mut roster = Roster::new("cat");
        let cat = roster.active_id();
        let dog = roster.add("dog");

        assert!(roster.remove(cat));
        assert_eq!(roster.active_id(), dog);
        assert!(!roster.remove(ActorId::new()));
    }

    #[test]
    fn test_moves_touch_only_target_actor() {
        let mut roster = Roster::new("cat");
        let cat = roster.active_id();
        let dog = roster.add("dog");

        assert!(roster.move_to(dog, Point::new(5, -5)));
        assert!(roster.set_speech(dog, Some("woof".into())));
        assert_eq!(roster.get(cat).unwrap().position, Point::ORIGIN);
        assert_eq!(roster.get(cat).unwrap().speech, None);
        assert_eq!(roster.get(dog).unwrap().position, Point::new(5, -5));
        assert!(!roster.move_to(ActorId::new(), Point::ORIGIN));
    }

    #[test]
    fn test_select() {
        let mut roster = Roster::new("cat");
        let cat = roster.active_id();
        roster.add("dog");

        assert!(roster.select(cat));
        assert_eq!(roster.active_id(), cat);
        assert!(!roster.select(ActorId::new()));
        assert_eq!(roster.active_id(), cat);
    }
}
