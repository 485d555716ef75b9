use std::{fmt::Debug, hash::Hash};

/// The generic object-manager substrate the engine replicates.
///
/// The engine never inspects the graph itself; it only needs a stable object
/// identity to key visibility checks and the pending-update table. Mutation
/// happens by handing commands back to the substrate via
/// [`Command::execute`](crate::Command::execute).
pub trait ObjectManager: 'static {
    /// Stable identity of one object in the managed graph.
    type Object: Copy + Eq + Hash + Debug + 'static;
}
