/// Pluggable area-of-interest policy: "is object O visible to observer key K
/// right now?"
///
/// Change notification is a drained event queue rather than a callback
/// registration: the engine runs on one logical timeline and the replication
/// source is the only subscriber, so it drains
/// [`drain_events`](VisibilityStrategy::drain_events) at each point where it
/// reacts to state changes. Implementations queue an event on every
/// visibility transition they cause. The disposal hook is `Drop`.
pub trait VisibilityStrategy<O, K> {
    fn is_visible(&self, object: &O, key: &K) -> bool;

    /// Atomically swaps out the visibility-change notifications raised since
    /// the last call, in the order they were raised.
    fn drain_events(&mut self) -> Vec<VisibilityEvent<O, K>>;
}

/// One visibility transition: `object` became visible (or invisible) to
/// `key`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VisibilityEvent<O, K> {
    pub object: O,
    pub key: K,
    pub visible: bool,
}
