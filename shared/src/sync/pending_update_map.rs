use std::collections::HashMap;

use log::trace;

use crate::{command::CommandHandle, manager::ObjectManager};

/// Buffer of suppressed synchronized commands, at most one entry per object.
///
/// An entry is written when a synchronizable command is invisible to a key at
/// commit time; storing again before the entry is read overwrites it
/// (latest-wins). Reading is destructive: the entry is cleared regardless of
/// what the caller does with the value.
pub struct PendingUpdateMap<M: ObjectManager> {
    entries: HashMap<M::Object, CommandHandle<M>>,
}

impl<M: ObjectManager> PendingUpdateMap<M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn store(&mut self, object: M::Object, command: CommandHandle<M>) {
        if self.entries.insert(object, command).is_some() {
            trace!("PendingUpdateMap: overwrote unread entry for {:?}", object);
        }
    }

    pub fn take(&mut self, object: &M::Object) -> Option<CommandHandle<M>> {
        self.entries.remove(object)
    }

    pub fn contains(&self, object: &M::Object) -> bool {
        self.entries.contains_key(object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: ObjectManager> Default for PendingUpdateMap<M> {
    fn default() -> Self {
        Self::new()
    }
}
