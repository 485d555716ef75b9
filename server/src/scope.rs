use std::{
    fmt::Debug,
    hash::Hash,
    ops::{Deref, DerefMut},
};

use mirror_shared::{ObjectManager, VisibilityStrategy};

use crate::source::ReplicationSource;

/// Scoped mutable access to the source's visibility strategy.
///
/// Dereferences to the strategy so callers can drive whatever mutation API
/// it offers; when the guard drops, the source drains the notifications the
/// mutation raised, schedules or cancels deferred flushes accordingly, and
/// realizes them if no transaction is open.
pub struct ScopeMut<'s, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    source: &'s mut ReplicationSource<M, K, V>,
}

impl<'s, M, K, V> ScopeMut<'s, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    pub(crate) fn new(source: &'s mut ReplicationSource<M, K, V>) -> Self {
        Self { source }
    }
}

impl<M, K, V> Deref for ScopeMut<'_, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    type Target = V;

    fn deref(&self) -> &V {
        self.source.visibility()
    }
}

impl<M, K, V> DerefMut for ScopeMut<'_, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    fn deref_mut(&mut self) -> &mut V {
        self.source.visibility_raw_mut()
    }
}

impl<M, K, V> Drop for ScopeMut<'_, M, K, V>
where
    M: ObjectManager,
    K: Copy + Eq + Hash + Debug,
    V: VisibilityStrategy<M::Object, K>,
{
    fn drop(&mut self) {
        self.source.process_visibility_events();
    }
}
