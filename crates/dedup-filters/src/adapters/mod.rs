//! Adapters Layer
//!
//! - `FileSnapshotStore` / `InMemorySnapshotStore` - implementations of the
//!   `SnapshotStore` driven port
//! - `DataDirLock` - exclusive `fs2` lock on a snapshot directory
//! - `DedupRequestHandler` - maps transport requests onto `DeduplicationApi`

pub mod api_handler;
pub mod file_store;
pub mod lock;
pub mod memory_store;

pub use api_handler::DedupRequestHandler;
pub use file_store::FileSnapshotStore;
pub use lock::DataDirLock;
pub use memory_store::InMemorySnapshotStore;
