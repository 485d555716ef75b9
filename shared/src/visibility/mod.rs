mod access;
mod open;
mod scoped;
mod strategy;

pub use access::{AccessLevel, AccessStrategy, OpenAccess};
pub use open::OpenVisibility;
pub use scoped::ScopedVisibility;
pub use strategy::{VisibilityEvent, VisibilityStrategy};
