use std::collections::HashMap;

use gigline_types::models::{Actor, ActorId, ActorRecord, RoleFlags};
use tracing::debug;

/// Actor lookup by identifier. Backed by the external user directory.
pub trait ActorDirectory {
    fn lookup(&self, id: &ActorId) -> Option<Actor>;
}

/// Directory held in process memory, seeded from account records.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    actors: HashMap<ActorId, Actor>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ActorRecord>) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    /// Normalizes the record on the way in. Replaces any actor with the same id.
    pub fn insert(&mut self, record: ActorRecord) {
        let actor = Actor::from(record);
        self.actors.insert(actor.id, actor);
    }

    /// Role switch. Returns false if the actor is unknown.
    pub fn set_roles(&mut self, id: &ActorId, roles: RoleFlags) -> bool {
        match self.actors.get_mut(id) {
            Some(actor) => {
                debug!(actor_id = %id, ?roles, "Role switch");
                actor.roles = roles;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl ActorDirectory for InMemoryDirectory {
    fn lookup(&self, id: &ActorId) -> Option<Actor> {
        self.actors.get(id).cloned()
    }
}
