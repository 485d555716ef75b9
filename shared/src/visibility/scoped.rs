use std::{collections::HashSet, hash::Hash, mem};

use super::strategy::{VisibilityEvent, VisibilityStrategy};

/// Explicit per-(object, key) scope set.
///
/// Objects start out of scope for every key; [`set_visible`] toggles one
/// (object, key) pair and queues a notification on each actual transition.
/// Setting a pair to its current state raises nothing.
///
/// [`set_visible`]: ScopedVisibility::set_visible
pub struct ScopedVisibility<O: Copy + Eq + Hash, K: Copy + Eq + Hash> {
    visible: HashSet<(O, K)>,
    events: Vec<VisibilityEvent<O, K>>,
}

impl<O: Copy + Eq + Hash, K: Copy + Eq + Hash> ScopedVisibility<O, K> {
    pub fn new() -> Self {
        Self {
            visible: HashSet::new(),
            events: Vec::new(),
        }
    }

    pub fn set_visible(&mut self, object: O, key: K, visible: bool) {
        let changed = if visible {
            self.visible.insert((object, key))
        } else {
            self.visible.remove(&(object, key))
        };
        if changed {
            self.events.push(VisibilityEvent {
                object,
                key,
                visible,
            });
        }
    }

    /// Removes every entry for `key`, raising an invisibility notification
    /// per object that was in scope.
    pub fn clear_key(&mut self, key: K) {
        let cleared: Vec<O> = self
            .visible
            .iter()
            .filter(|(_, k)| *k == key)
            .map(|(o, _)| *o)
            .collect();
        for object in cleared {
            self.set_visible(object, key, false);
        }
    }
}

impl<O: Copy + Eq + Hash, K: Copy + Eq + Hash> Default for ScopedVisibility<O, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Copy + Eq + Hash, K: Copy + Eq + Hash> VisibilityStrategy<O, K>
    for ScopedVisibility<O, K>
{
    fn is_visible(&self, object: &O, key: &K) -> bool {
        self.visible.contains(&(*object, *key))
    }

    fn drain_events(&mut self) -> Vec<VisibilityEvent<O, K>> {
        mem::take(&mut self.events)
    }
}
