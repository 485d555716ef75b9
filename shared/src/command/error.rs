use thiserror::Error;

/// Errors surfaced by the command substrate when a command is applied to or
/// reversed on a manager.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    /// The command referenced an object the manager does not hold
    #[error("Object {object_id} not found in manager")]
    ObjectNotFound { object_id: String },

    /// The command could not be applied in the manager's current state
    #[error("Command could not be executed: {reason}")]
    ExecutionFailed { reason: String },

    /// The command could not be reversed in the manager's current state
    #[error("Command could not be unexecuted: {reason}")]
    UnexecutionFailed { reason: String },
}
