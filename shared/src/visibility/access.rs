/// Graded permission an observer key holds over an object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum AccessLevel {
    None,
    Read,
    All,
}

/// Read/write-permission analog of
/// [`VisibilityStrategy`](super::VisibilityStrategy), used for
/// interactive-access checks. Never consulted for replication filtering.
pub trait AccessStrategy<O, K> {
    fn access_level(&self, object: &O, key: &K) -> AccessLevel;

    fn can_read(&self, object: &O, key: &K) -> bool {
        self.access_level(object, key) >= AccessLevel::Read
    }

    fn can_write(&self, object: &O, key: &K) -> bool {
        self.access_level(object, key) == AccessLevel::All
    }
}

/// Reference strategy: full access for every key.
pub struct OpenAccess;

impl<O, K> AccessStrategy<O, K> for OpenAccess {
    fn access_level(&self, _object: &O, _key: &K) -> AccessLevel {
        AccessLevel::All
    }
}
