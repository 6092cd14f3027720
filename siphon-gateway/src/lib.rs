pub mod api;
pub mod config;
pub mod feed;
pub mod ingest;
pub mod query;
pub mod state;
pub mod store;

pub use config::{Config, FeedConfig, ServerConfig, StorageConfig};
pub use feed::mock::MockDeviceFeed;
pub use feed::{FeedUpload, UploadFeed};
pub use ingest::{IngestError, ingest_upload};
pub use query::{QueryResult, run_query};
pub use state::{AppState, IngestStats};
pub use store::ReadingStore;
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteStore;
