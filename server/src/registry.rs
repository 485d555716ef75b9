use std::{fmt::Debug, hash::Hash};

use mirror_shared::{ObjectManager, ObserverHandle};

use crate::error::SourceError;

/// Key → observer registry, one entry per key.
///
/// Registration is exclusive, and iteration follows registration order: for
/// a single authoritative event every observer sees its consequence in the
/// order the observers were registered, so entries live in a Vec rather than
/// a hash map.
pub struct ObserverRegistry<M: ObjectManager, K: Copy + Eq + Hash + Debug> {
    entries: Vec<(K, ObserverHandle<M>)>,
}

impl<M: ObjectManager, K: Copy + Eq + Hash + Debug> ObserverRegistry<M, K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn insert(&mut self, key: K, observer: ObserverHandle<M>) -> Result<(), SourceError> {
        if self.contains_key(&key) {
            return Err(SourceError::DuplicateKey {
                key: format!("{:?}", key),
            });
        }
        self.entries.push((key, observer));
        Ok(())
    }

    pub fn remove(&mut self, key: &K) -> Result<ObserverHandle<M>, SourceError> {
        let Some(index) = self.entries.iter().position(|(k, _)| k == key) else {
            return Err(SourceError::UnknownKey {
                key: format!("{:?}", key),
            });
        };
        Ok(self.entries.remove(index).1)
    }

    pub fn get(&self, key: &K) -> Option<&ObserverHandle<M>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, observer)| observer)
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, ObserverHandle<M>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: ObjectManager, K: Copy + Eq + Hash + Debug> Default for ObserverRegistry<M, K> {
    fn default() -> Self {
        Self::new()
    }
}
