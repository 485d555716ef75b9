use super::strategy::{VisibilityEvent, VisibilityStrategy};

/// Reference strategy: every object is visible to every key.
///
/// The notification channel is wired but never raised internally; it exists
/// so external drivers can layer policy on top or simulate changes in tests.
pub struct OpenVisibility;

impl<O, K> VisibilityStrategy<O, K> for OpenVisibility {
    fn is_visible(&self, _object: &O, _key: &K) -> bool {
        true
    }

    fn drain_events(&mut self) -> Vec<VisibilityEvent<O, K>> {
        Vec::new()
    }
}
