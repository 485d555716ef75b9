use std::rc::Rc;

use crate::manager::ObjectManager;

use super::{error::CommandError, synchronizable::Synchronizable};

/// Shared handle to a command.
///
/// A command is created once by rule logic, executed once on the
/// authoritative manager, and then synchronized 0..N times (once per
/// registered observer key, independently), so it is reference-counted.
/// The whole engine runs on one logical timeline, hence `Rc` rather than
/// `Arc`.
pub type CommandHandle<M> = Rc<dyn Command<M>>;

/// Atomic unit of state change against an [`ObjectManager`].
pub trait Command<M: ObjectManager> {
    /// Applies this command to `manager`.
    fn execute(&self, manager: &mut M) -> Result<(), CommandError>;

    /// Reverses a prior [`execute`](Command::execute) on `manager`.
    fn unexecute(&self, manager: &mut M) -> Result<(), CommandError>;

    /// A command that changes nothing. Empty commands are never applied.
    fn is_empty(&self) -> bool {
        false
    }

    /// The synchronizable facet of this command, if it has one.
    ///
    /// Commands without the facet are forwarded to observers verbatim.
    fn as_synchronizable(&self) -> Option<&dyn Synchronizable<M>> {
        None
    }

    /// Child commands, if this command is a composite.
    fn subcommands(&self) -> Option<&[CommandHandle<M>]> {
        None
    }
}

/// Expands a command into its ordered leaf sequence.
///
/// Composites contribute their children recursively, preserving relative
/// order; a leaf contributes itself.
pub fn flatten_command<M: ObjectManager>(command: &CommandHandle<M>) -> Vec<CommandHandle<M>> {
    let mut out = Vec::new();
    flatten_into(command, &mut out);
    out
}

fn flatten_into<M: ObjectManager>(command: &CommandHandle<M>, out: &mut Vec<CommandHandle<M>>) {
    if let Some(children) = command.subcommands() {
        for child in children {
            flatten_into(child, out);
        }
    } else {
        out.push(command.clone());
    }
}
