pub mod store;
pub use store::{OfflineStore, RemoteStore, SelectQuery, StoreError};
pub mod pg_store;
pub use pg_store::PgStore;
pub mod memory_store;
pub use memory_store::MemoryStore;
pub mod fixtures;
