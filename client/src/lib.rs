//! # Mirror Client
//! One replica per observer: a private shadow copy of the authoritative
//! object graph, driven exclusively by replicated commands while it is in
//! replicating mode, and locally authorable only under a scoped controller
//! upgrade.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod client;
mod error;
mod host;

pub use client::{ControllerUpgrade, ReplicationClient};
pub use error::ClientError;
pub use host::Host;
