//! Storage layer for quill-daemon
//!
//! Provides persistent storage for manuscripts.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{ManuscriptStore, StatusUpdate, StorageResult};
