use thiserror::Error;

use crate::command::CommandError;

/// How commands inside a transaction reach observers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransactionType {
    /// Not batched: contained commands stream to observers individually as
    /// they commit, bracketed by begin/end notifications. Explicitly exempt
    /// from the rolled-back-delivers-nothing guarantee.
    None,
    /// Commits or rolls back as a unit; contained commands are synchronized
    /// together at commit and delivered as a single call.
    Atomic,
    /// Batches like [`Atomic`](TransactionType::Atomic); marks an
    /// undo-boundary frame for the substrate.
    Master,
}

impl TransactionType {
    /// Whether contained commands are held until commit rather than streamed.
    pub fn is_batched(&self) -> bool {
        !matches!(self, TransactionType::None)
    }
}

/// Opaque token optionally attached to a transaction; ending a transaction
/// must present the same token it was begun with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TransactionToken(u64);

impl TransactionToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Transaction-stack contract violations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransactionError {
    /// Attempted to end or roll back with no transaction open
    #[error("No transaction is open")]
    NoOpenTransaction,

    /// The token presented at end does not match the one at begin
    #[error("Transaction token mismatch: began with {began_with}, ended with {ended_with}")]
    TokenMismatch {
        began_with: String,
        ended_with: String,
    },

    /// A command could not be reversed while rolling the transaction back
    #[error("Transaction rollback failed: {0}")]
    RollbackFailed(#[from] CommandError),
}
