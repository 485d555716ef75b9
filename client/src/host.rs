use mirror_shared::{
    CommandError, CommandHandle, Controller, ObjectManager, TransactionToken, TransactionType,
};

use crate::error::ClientError;

/// The private shadow replica one client owns.
///
/// Carries no controller while the client is replicating: every local
/// mutation attempt fails with [`ClientError::HostSealed`], which keeps an
/// accidental local write from diverging the shadow from the authoritative
/// source. A controller upgrade installs one temporarily so the host can be
/// authored as a master for the scope's lifetime.
pub struct Host<M: ObjectManager> {
    manager: M,
    controller: Option<Box<dyn Controller<M>>>,
}

impl<M: ObjectManager + Default> Host<M> {
    pub(crate) fn new() -> Self {
        Self {
            manager: M::default(),
            controller: None,
        }
    }
}

impl<M: ObjectManager> Host<M> {
    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn is_upgraded(&self) -> bool {
        self.controller.is_some()
    }

    /// Local mutation surface; routed through the upgraded controller, or
    /// rejected while the host is sealed.
    pub fn execute(&mut self, command: &CommandHandle<M>) -> Result<(), ClientError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(ClientError::HostSealed);
        };
        controller
            .execute(&mut self.manager, command)
            .map_err(ClientError::from)
    }

    pub fn begin_transaction(&mut self, transaction_type: TransactionType) -> Result<(), ClientError> {
        self.begin_transaction_with_token(transaction_type, None)
    }

    pub fn begin_transaction_with_token(
        &mut self,
        transaction_type: TransactionType,
        token: Option<TransactionToken>,
    ) -> Result<(), ClientError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(ClientError::HostSealed);
        };
        controller
            .begin_transaction(transaction_type, token)
            .map_err(ClientError::from)
    }

    pub fn end_transaction(&mut self, commit: bool) -> Result<(), ClientError> {
        self.end_transaction_with_token(commit, None)
    }

    pub fn end_transaction_with_token(
        &mut self,
        commit: bool,
        token: Option<TransactionToken>,
    ) -> Result<(), ClientError> {
        let Some(controller) = self.controller.as_mut() else {
            return Err(ClientError::HostSealed);
        };
        controller
            .end_transaction(&mut self.manager, commit, token)
            .map_err(ClientError::from)
    }

    /// Applies a replicated command, bypassing the seal; the replicator
    /// itself must be allowed to write.
    pub(crate) fn apply_replicated(&mut self, command: &CommandHandle<M>) -> Result<(), CommandError> {
        command.execute(&mut self.manager)
    }

    /// Reverses a replicated command on the shadow, bypassing the seal; used
    /// when a streamed authoritative transaction rolls back.
    pub(crate) fn revert_replicated(&mut self, command: &CommandHandle<M>) -> Result<(), CommandError> {
        command.unexecute(&mut self.manager)
    }

    pub(crate) fn install_controller(&mut self, controller: Box<dyn Controller<M>>) {
        self.controller = Some(controller);
    }

    pub(crate) fn clear_controller(&mut self) {
        self.controller = None;
    }
}
