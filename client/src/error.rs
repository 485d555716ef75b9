use thiserror::Error;

use mirror_shared::{CommandError, TransactionError};

/// Contract violations surfaced by [`ReplicationClient`](crate::ReplicationClient)
/// and its [`Host`](crate::Host)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// Invalid-operation: while replicating, the shadow graph changes only
    /// through `Replicate`
    #[error("Host is sealed while replicating; local mutation requires a controller upgrade")]
    HostSealed,

    /// Programming error, non-recoverable: replication and local authorship
    /// are mutually exclusive for one Host at any instant
    #[error("Replicate called while the Host controller is upgraded")]
    ReplicateWhileUpgraded,

    /// The substrate rejected a command application
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The upgraded controller's transaction stack was misused
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
