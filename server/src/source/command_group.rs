use std::{fmt::Debug, hash::Hash, rc::Rc};

use mirror_shared::{
    CommandError, CommandHandle, MultiCommand, ObjectManager, VisibilityStrategy,
};

use super::replication_source::ReplicationSource;

/// Scoped command group on the authoritative manager.
///
/// Commands executed through the scope apply to the manager as they are
/// issued, but observers see the whole group as one composite command when
/// the scope drops. A group with a single command publishes it unwrapped; an
/// empty group publishes nothing.
pub struct CommandGroupScope<'s, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    source: &'s mut ReplicationSource<M, K, V>,
    commands: Vec<CommandHandle<M>>,
}

impl<'s, M, K, V> CommandGroupScope<'s, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    pub(crate) fn new(source: &'s mut ReplicationSource<M, K, V>) -> Self {
        Self {
            source,
            commands: Vec::new(),
        }
    }

    pub fn execute(&mut self, command: CommandHandle<M>) -> Result<(), CommandError> {
        self.source.apply_only(&command)?;
        self.commands.push(command);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<M, K, V> Drop for CommandGroupScope<'_, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    fn drop(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        let command: CommandHandle<M> = match commands.len() {
            0 => return,
            1 => match commands.pop() {
                Some(command) => command,
                None => return,
            },
            _ => Rc::new(MultiCommand::new(commands)),
        };
        self.source.commit_executed_group(command);
    }
}
