use std::mem;

use crate::manager::ObjectManager;

use super::command::CommandHandle;

/// Optional facet of a [`Command`](super::Command): the ability to produce an
/// observer-facing representation of itself, possibly different from its
/// authoritative form, and possibly spawning sub-commands.
pub trait Synchronizable<M: ObjectManager> {
    /// Public commands are eligible for every observer key, unconditionally.
    fn is_public(&self) -> bool;

    /// The object this command is bound to, if any.
    ///
    /// An object-less private command is treated as globally visible.
    fn object(&self, manager: &M) -> Option<M::Object>;

    /// Produces the observer-facing form of this command, or `None` to
    /// suppress it silently at the policy layer.
    ///
    /// Before returning, the implementation may register zero or more
    /// sub-commands into `context`; they are processed in registration order,
    /// in the same synchronization pass, ahead of this command's own result.
    fn synchronize(&self, context: &mut SynchronizationContext<M>)
        -> Option<CommandHandle<M>>;
}

/// Write-only sink collecting sub-commands emitted during one
/// [`Synchronizable::synchronize`] call.
pub struct SynchronizationContext<M: ObjectManager> {
    registered: Vec<CommandHandle<M>>,
}

impl<M: ObjectManager> SynchronizationContext<M> {
    pub fn new() -> Self {
        Self {
            registered: Vec::new(),
        }
    }

    /// Registers a sub-command for the current synchronization pass.
    pub fn synchronize(&mut self, sub_command: CommandHandle<M>) {
        self.registered.push(sub_command);
    }

    /// Atomically swaps out the registered sub-commands, in registration
    /// order.
    pub fn drain(&mut self) -> Vec<CommandHandle<M>> {
        mem::take(&mut self.registered)
    }
}

impl<M: ObjectManager> Default for SynchronizationContext<M> {
    fn default() -> Self {
        Self::new()
    }
}
