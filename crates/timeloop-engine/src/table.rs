//! Spawn-ordered storage of live actors.

use indexmap::IndexMap;
use timeloop_actors::Actor;
use timeloop_core::ActorId;

/// Owns every live actor in a session, keyed by [`ActorId`].
///
/// Iteration follows spawn order. Ids are never reused, so a stale id
/// held by the controller's registry can never alias a later actor.
#[derive(Default)]
pub struct ActorTable {
    actors: IndexMap<ActorId, Box<dyn Actor>>,
    next_id: u32,
}

impl ActorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `actor` and return its fresh id.
    pub fn insert(&mut self, actor: Box<dyn Actor>) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.insert(id, actor);
        id
    }

    /// Remove an actor, preserving the order of the rest.
    pub fn remove(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        self.actors.shift_remove(&id)
    }

    /// Look up an actor.
    pub fn get(&self, id: ActorId) -> Option<&(dyn Actor + 'static)> {
        self.actors.get(&id).map(|a| a.as_ref())
    }

    /// Look up an actor mutably.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut (dyn Actor + 'static)> {
        self.actors.get_mut(&id).map(|a| a.as_mut())
    }

    /// Whether `id` is live.
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    /// Live ids in spawn order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }

    /// Mutable iteration in spawn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ActorId, &mut (dyn Actor + 'static))> + '_ {
        self.actors.iter_mut().map(|(id, a)| (*id, a.as_mut()))
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether no actors are live.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeloop_core::BodyId;
    use timeloop_test_utils::RecordingActor;

    #[test]
    fn ids_are_fresh_and_spawn_ordered() {
        let mut table = ActorTable::new();
        let a = table.insert(Box::new(RecordingActor::new("a", BodyId(0))));
        let b = table.insert(Box::new(RecordingActor::new("b", BodyId(1))));
        let c = table.insert(Box::new(RecordingActor::new("c", BodyId(2))));
        assert_eq!(table.ids().collect::<Vec<_>>(), vec![a, b, c]);

        table.remove(b);
        let d = table.insert(Box::new(RecordingActor::new("d", BodyId(3))));
        assert_ne!(d, b);
        assert_eq!(table.ids().collect::<Vec<_>>(), vec![a, c, d]);
        assert!(!table.contains(b));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn lookup_and_downcast() {
        let mut table = ActorTable::new();
        let id = table.insert(Box::new(RecordingActor::new("recorder", BodyId(5))));
        let actor = table.get(id).unwrap();
        assert_eq!(actor.name(), "recorder");
        assert!(actor.downcast_ref::<RecordingActor>().is_some());
        assert!(table.get_mut(ActorId(99)).is_none());
        assert!(table.remove(ActorId(99)).is_none());
    }
}
