//! Per-call translator between raw committed commands and the subset one
//! observer key may see now.
//!
//! The synchronizer holds no policy of its own: eligibility comes from the
//! command's synchronizable facet (public / object-bound) and the supplied
//! [`VisibilityStrategy`]. What it does own is the [`PendingUpdateMap`] of
//! suppressed results, which a later `update` pull releases.

use std::rc::Rc;

use crate::{
    command::{CommandHandle, MultiCommand, SynchronizationContext},
    manager::ObjectManager,
    visibility::VisibilityStrategy,
};

use super::pending_update_map::PendingUpdateMap;

enum Eligibility<O> {
    Now,
    Deferred(O),
}

pub struct CommandSynchronizer<M: ObjectManager> {
    pending: PendingUpdateMap<M>,
}

impl<M: ObjectManager> CommandSynchronizer<M> {
    pub fn new() -> Self {
        Self {
            pending: PendingUpdateMap::new(),
        }
    }

    /// Maps a batch of committed commands to the single command `key` may see
    /// now: `None` for an empty batch or an all-suppressed one, the lone
    /// element unwrapped, or a [`MultiCommand`] wrapping several.
    ///
    /// Suppressed results are buffered per object and only surface through a
    /// later [`update`](CommandSynchronizer::update) pull.
    pub fn synchronize<K, V>(
        &mut self,
        manager: &M,
        visibility: &V,
        key: &K,
        commands: &[CommandHandle<M>],
    ) -> Option<CommandHandle<M>>
    where
        V: VisibilityStrategy<M::Object, K> + ?Sized,
    {
        if commands.is_empty() {
            return None;
        }

        let mut out = Vec::new();
        for command in commands {
            self.process(manager, visibility, key, command, &mut out);
        }

        match out.len() {
            0 => None,
            1 => out.pop(),
            _ => Some(Rc::new(MultiCommand::new(out))),
        }
    }

    /// Atomically reads and clears the pending entry for `object`.
    pub fn update(&mut self, object: &M::Object) -> Option<CommandHandle<M>> {
        self.pending.take(object)
    }

    pub fn has_pending(&self, object: &M::Object) -> bool {
        self.pending.contains(object)
    }

    fn process<K, V>(
        &mut self,
        manager: &M,
        visibility: &V,
        key: &K,
        command: &CommandHandle<M>,
        out: &mut Vec<CommandHandle<M>>,
    ) where
        V: VisibilityStrategy<M::Object, K> + ?Sized,
    {
        let Some(facet) = command.as_synchronizable() else {
            // Composites without a facet flatten into their children; plain
            // leaves pass through verbatim.
            if let Some(children) = command.subcommands() {
                for child in children {
                    self.process(manager, visibility, key, child, out);
                }
            } else {
                out.push(command.clone());
            }
            return;
        };

        let eligibility = if facet.is_public() {
            Eligibility::Now
        } else {
            match facet.object(manager) {
                // An object-less private command is treated as globally
                // visible.
                None => Eligibility::Now,
                Some(object) if visibility.is_visible(&object, key) => Eligibility::Now,
                Some(object) => Eligibility::Deferred(object),
            }
        };

        // The mapping runs exactly once regardless of eligibility, so that
        // side-effecting sub-command registration stays deterministic.
        let mut context = SynchronizationContext::new();
        let result = facet.synchronize(&mut context);
        for sub_command in context.drain() {
            self.process(manager, visibility, key, &sub_command, out);
        }

        match (eligibility, result) {
            (Eligibility::Now, Some(result)) => out.push(result),
            (Eligibility::Deferred(object), Some(result)) => self.pending.store(object, result),
            // A null mapped result contributes nothing on either path:
            // silent suppression is legal at the policy layer.
            (_, None) => {}
        }
    }
}

impl<M: ObjectManager> Default for CommandSynchronizer<M> {
    fn default() -> Self {
        Self::new()
    }
}
