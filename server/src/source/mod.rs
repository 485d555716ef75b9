mod command_group;
mod open_transaction;
mod replication_source;

pub use command_group::CommandGroupScope;
pub use replication_source::ReplicationSource;

pub(crate) use open_transaction::OpenTransaction;
