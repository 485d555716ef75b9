//! # Mirror Server
//! Owns the authoritative object graph and syncs every committed command to
//! registered observers to whom the affected objects are in-scope, deferring
//! delivery for objects that are currently out of scope.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod error;
mod registry;
mod scope;
mod source;

pub use error::SourceError;
pub use registry::ObserverRegistry;
pub use scope::ScopeMut;
pub use source::{CommandGroupScope, ReplicationSource};
