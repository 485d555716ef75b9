mod command;
mod error;
mod multi_command;
mod synchronizable;

pub use command::{flatten_command, Command, CommandHandle};
pub use error::CommandError;
pub use multi_command::MultiCommand;
pub use synchronizable::{Synchronizable, SynchronizationContext};
