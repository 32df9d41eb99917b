//! # vidcat-db
//!
//! Transactional in-memory record store for vidcat.
//!
//! This crate provides:
//! - A shared [`Store`] holding the schema and the videos
//! - Repository implementations for the schema and for videos
//! - Stock-schema fixtures for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use vidcat_db::{Database, VideoRepository};
//! use vidcat_core::{CreateVideoRequest, Schema, Video};
//!
//! #[tokio::main]
//! async fn main() -> vidcat_core::Result<()> {
//!     let db = Database::new(Schema::new());
//!     let video = Video::new(CreateVideoRequest {
//!         title: "Nanook of the North".to_string(),
//!         sentence: "Life in the Arctic.".to_string(),
//!         ..Default::default()
//!     });
//!     let outcome = db.videos.insert(video).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod schema;
pub mod store;
pub mod videos;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can seed the stock schema
pub mod test_fixtures;

// Re-export core types
pub use vidcat_core::{
    Error, ListVideosRequest, ListVideosResponse, Result, SaveOutcome, Schema, SchemaRepository,
    VideoRepository,
};

// Re-export repository implementations
pub use schema::MemSchemaRepository;
pub use store::{Store, StoreState};
pub use videos::MemVideoRepository;

/// Combined store context with all repositories.
#[derive(Debug, Clone)]
pub struct Database {
    /// The shared store.
    pub store: Store,
    /// Schema repository for classes, types, and vocabulary.
    pub schema: MemSchemaRepository,
    /// Video repository for catalog records.
    pub videos: MemVideoRepository,
}

impl Database {
    /// Create a new Database over an empty store using `schema`.
    pub fn new(schema: Schema) -> Self {
        Self::with_store(Store::new(schema))
    }

    /// Create a Database over an existing store.
    pub fn with_store(store: Store) -> Self {
        Self {
            schema: MemSchemaRepository::new(store.clone()),
            videos: MemVideoRepository::new(store.clone()),
            store,
        }
    }
}
