//! # Mirror Shared
//! Common functionality shared between mirror-server & mirror-client crates:
//! the command/transaction substrate interface, the command synchronizer that
//! filters committed commands per observer key, and the pluggable
//! visibility/access strategies that drive the filtering.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod command;
mod controller;
mod manager;
mod observer;
mod sync;
mod transaction;
mod visibility;

pub use command::{
    flatten_command, Command, CommandError, CommandHandle, MultiCommand, Synchronizable,
    SynchronizationContext,
};
pub use controller::{AuthoringController, Controller};
pub use manager::ObjectManager;
pub use observer::{ObserverError, ObserverHandle, ReplicationObserver};
pub use sync::{CommandSynchronizer, PendingUpdateMap};
pub use transaction::{TransactionError, TransactionToken, TransactionType};
pub use visibility::{
    AccessLevel, AccessStrategy, OpenAccess, OpenVisibility, ScopedVisibility, VisibilityEvent,
    VisibilityStrategy,
};
