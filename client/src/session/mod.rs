//! Session documents: where they live, what they hold and when they are saved and loaded.

mod error;
mod lifecycle;
mod storage;

pub use error::PersistenceError;
pub use lifecycle::{PersistedSection, SessionLifecycle, WorldDescriptor};
pub use storage::{DocumentKind, SessionStorage};
