use log::{trace, warn};

use mirror_shared::{
    CommandHandle, Controller, ObjectManager, ObserverError, ReplicationObserver, TransactionType,
};

use crate::{error::ClientError, host::Host};

// One open streamed authoritative transaction, mirrored on the replica so a
// rollback can unwind the shadow.
struct RemoteFrame<M: ObjectManager> {
    transaction_type: TransactionType,
    commands: Vec<CommandHandle<M>>,
}

/// One observer's replica of the authoritative object graph.
///
/// Applies replicated deltas to its private [`Host`] via
/// [`replicate`](ReplicationClient::replicate), and implements
/// [`ReplicationObserver`] so it can be registered directly with a
/// replication source.
pub struct ReplicationClient<M: ObjectManager> {
    host: Host<M>,
    // Streamed (non-batched) transactions currently open on the
    // authoritative side, outermost first. Commands replicated inside a
    // frame are recorded there; a rolled-back frame unexecutes them in
    // reverse so the shadow converges with the rolled-back authority.
    remote_transactions: Vec<RemoteFrame<M>>,
}

impl<M: ObjectManager + Default> ReplicationClient<M> {
    pub fn new() -> Self {
        Self {
            host: Host::new(),
            remote_transactions: Vec::new(),
        }
    }
}

impl<M: ObjectManager + Default> Default for ReplicationClient<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ObjectManager> ReplicationClient<M> {
    pub fn host(&self) -> &Host<M> {
        &self.host
    }

    /// Mutable host access. The seal still applies: local mutation through
    /// the host fails unless a controller upgrade is in effect.
    pub fn host_mut(&mut self) -> &mut Host<M> {
        &mut self.host
    }

    /// Depth of streamed authoritative transactions currently open.
    pub fn remote_transaction_depth(&self) -> usize {
        self.remote_transactions.len()
    }

    /// Applies one replicated command to the shadow graph.
    ///
    /// Empty commands are never applied. Calling this while the host is
    /// upgraded is a programming error: replication and local authorship are
    /// mutually exclusive for one host at any instant.
    pub fn replicate(&mut self, command: &CommandHandle<M>) -> Result<(), ClientError> {
        if self.host.is_upgraded() {
            return Err(ClientError::ReplicateWhileUpgraded);
        }
        if command.is_empty() {
            return Ok(());
        }
        self.host.apply_replicated(command)?;
        if let Some(frame) = self.remote_transactions.last_mut() {
            frame.commands.push(command.clone());
        }
        Ok(())
    }

    /// Temporarily substitutes `controller` so the host can be locally
    /// mutated as a master; the returned scope restores replicating mode on
    /// drop.
    pub fn upgrade_controller(
        &mut self,
        controller: Box<dyn Controller<M>>,
    ) -> ControllerUpgrade<'_, M> {
        self.host.install_controller(controller);
        ControllerUpgrade { client: self }
    }
}

impl<M: ObjectManager> ReplicationObserver<M> for ReplicationClient<M> {
    fn synchronize(&mut self, command: CommandHandle<M>) -> Result<(), ObserverError> {
        self.replicate(&command).map_err(|err| ObserverError::Rejected {
            reason: err.to_string(),
        })
    }

    fn begin_transaction(&mut self, transaction_type: TransactionType) {
        trace!(
            "ReplicationClient: streamed transaction opened ({:?})",
            transaction_type
        );
        self.remote_transactions.push(RemoteFrame {
            transaction_type,
            commands: Vec::new(),
        });
    }

    fn end_current_transaction(&mut self, commit: bool) {
        let Some(frame) = self.remote_transactions.pop() else {
            warn!("ReplicationClient: transaction end with none open (commit={})", commit);
            return;
        };
        trace!(
            "ReplicationClient: streamed transaction closed ({:?}, commit={})",
            frame.transaction_type,
            commit
        );
        if commit {
            // An enclosing frame may still roll the committed commands back.
            if let Some(parent) = self.remote_transactions.last_mut() {
                parent.commands.extend(frame.commands);
            }
        } else {
            // The authority unexecuted these; the shadow follows suit.
            for command in frame.commands.iter().rev() {
                if let Err(err) = self.host.revert_replicated(command) {
                    warn!(
                        "ReplicationClient: shadow failed to revert streamed command: {}",
                        err
                    );
                }
            }
        }
    }
}

/// Scope during which a client's host is locally authorable.
pub struct ControllerUpgrade<'c, M: ObjectManager> {
    client: &'c mut ReplicationClient<M>,
}

impl<M: ObjectManager> ControllerUpgrade<'_, M> {
    pub fn host(&mut self) -> &mut Host<M> {
        self.client.host_mut()
    }
}

impl<M: ObjectManager> Drop for ControllerUpgrade<'_, M> {
    fn drop(&mut self) {
        self.client.host.clear_controller();
    }
}
