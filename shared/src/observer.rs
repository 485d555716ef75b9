use std::{cell::RefCell, rc::Rc};

use thiserror::Error;

use crate::{
    command::CommandHandle,
    manager::ObjectManager,
    transaction::TransactionType,
};

/// The delivery surface a replication source pushes into, one per registered
/// observer key.
pub trait ReplicationObserver<M: ObjectManager> {
    /// Delivers one synchronized command. Called at most once per
    /// authoritative event per observer.
    fn synchronize(&mut self, command: CommandHandle<M>) -> Result<(), ObserverError>;

    /// Announces a streamed (non-batched) transaction; contained commands
    /// follow individually via [`synchronize`](ReplicationObserver::synchronize).
    fn begin_transaction(&mut self, transaction_type: TransactionType);

    /// Closes the innermost streamed transaction.
    fn end_current_transaction(&mut self, commit: bool);
}

/// Shared handle to a registered observer. One logical timeline, so
/// `Rc<RefCell<..>>` rather than a sync primitive.
pub type ObserverHandle<M> = Rc<RefCell<dyn ReplicationObserver<M>>>;

/// Failure reported by an observer while applying a delivery
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ObserverError {
    /// The observer could not apply the synchronized command
    #[error("Observer rejected synchronized command: {reason}")]
    Rejected { reason: String },
}
