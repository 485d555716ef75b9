use crate::manager::ObjectManager;

use super::{
    command::{Command, CommandHandle},
    error::CommandError,
    synchronizable::Synchronizable,
};

/// Ordered composite of child commands.
///
/// Executes children front-to-back and unexecutes them back-to-front; empty
/// iff every child is empty. Flattening (see
/// [`flatten_command`](super::flatten_command)) expands the composite into
/// its leaf sequence, preserving relative order.
pub struct MultiCommand<M: ObjectManager> {
    children: Vec<CommandHandle<M>>,
}

impl<M: ObjectManager> MultiCommand<M> {
    pub fn new(children: Vec<CommandHandle<M>>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[CommandHandle<M>] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }
}

impl<M: ObjectManager> Command<M> for MultiCommand<M> {
    fn execute(&self, manager: &mut M) -> Result<(), CommandError> {
        for child in &self.children {
            child.execute(manager)?;
        }
        Ok(())
    }

    fn unexecute(&self, manager: &mut M) -> Result<(), CommandError> {
        for child in self.children.iter().rev() {
            child.unexecute(manager)?;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.children.iter().all(|child| child.is_empty())
    }

    fn as_synchronizable(&self) -> Option<&dyn Synchronizable<M>> {
        None
    }

    fn subcommands(&self) -> Option<&[CommandHandle<M>]> {
        Some(&self.children)
    }
}
