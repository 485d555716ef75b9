use crate::{
    command::{CommandError, CommandHandle},
    manager::ObjectManager,
    transaction::{TransactionError, TransactionToken, TransactionType},
};

/// Mutation gateway of the command substrate: executes commands against a
/// manager and maintains the open-transaction stack.
///
/// A replica's `Host` carries no controller while it is replication-driven;
/// upgrading it installs one of these so the shadow graph can be authored
/// locally for the scope of the upgrade.
pub trait Controller<M: ObjectManager> {
    fn execute(
        &mut self,
        manager: &mut M,
        command: &CommandHandle<M>,
    ) -> Result<(), CommandError>;

    fn begin_transaction(
        &mut self,
        transaction_type: TransactionType,
        token: Option<TransactionToken>,
    ) -> Result<(), TransactionError>;

    fn end_transaction(
        &mut self,
        manager: &mut M,
        commit: bool,
        token: Option<TransactionToken>,
    ) -> Result<(), TransactionError>;
}

struct AuthoringFrame<M: ObjectManager> {
    token: Option<TransactionToken>,
    commands: Vec<CommandHandle<M>>,
}

/// Reference [`Controller`]: applies commands immediately and keeps enough
/// state per open transaction to unexecute it on rollback. Transactions nest;
/// committing an inner frame folds its commands into the enclosing one.
pub struct AuthoringController<M: ObjectManager> {
    frames: Vec<AuthoringFrame<M>>,
}

impl<M: ObjectManager> AuthoringController<M> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn transaction_depth(&self) -> usize {
        self.frames.len()
    }
}

impl<M: ObjectManager> Default for AuthoringController<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ObjectManager> Controller<M> for AuthoringController<M> {
    fn execute(
        &mut self,
        manager: &mut M,
        command: &CommandHandle<M>,
    ) -> Result<(), CommandError> {
        command.execute(manager)?;
        if let Some(frame) = self.frames.last_mut() {
            frame.commands.push(command.clone());
        }
        Ok(())
    }

    fn begin_transaction(
        &mut self,
        _transaction_type: TransactionType,
        token: Option<TransactionToken>,
    ) -> Result<(), TransactionError> {
        self.frames.push(AuthoringFrame {
            token,
            commands: Vec::new(),
        });
        Ok(())
    }

    fn end_transaction(
        &mut self,
        manager: &mut M,
        commit: bool,
        token: Option<TransactionToken>,
    ) -> Result<(), TransactionError> {
        // Validate the token before popping so a mismatch leaves the stack
        // intact.
        if let Some(frame) = self.frames.last() {
            if frame.token != token {
                return Err(TransactionError::TokenMismatch {
                    began_with: format!("{:?}", frame.token),
                    ended_with: format!("{:?}", token),
                });
            }
        }
        let Some(frame) = self.frames.pop() else {
            return Err(TransactionError::NoOpenTransaction);
        };

        if commit {
            if let Some(parent) = self.frames.last_mut() {
                parent.commands.extend(frame.commands);
            }
        } else {
            for command in frame.commands.iter().rev() {
                command.unexecute(manager).map_err(TransactionError::from)?;
            }
        }
        Ok(())
    }
}
