use thiserror::Error;

use mirror_shared::TransactionError;

/// Contract violations surfaced by [`ReplicationSource`](crate::ReplicationSource)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// Observer registration is exclusive: one client per key
    #[error("Observer key {key} is already registered")]
    DuplicateKey { key: String },

    /// The key has no registered observer
    #[error("Observer key {key} is not registered")]
    UnknownKey { key: String },

    /// The authoritative transaction stack was misused
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
