//! Shared in-memory store.
//!
//! One [`Store`] handle is cloned into every repository, the way a
//! connection pool is shared. Schema and videos sit behind a single lock so
//! that a save validates against exactly the schema it commits under.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;
use uuid::Uuid;

use vidcat_core::{Schema, Video};

/// Everything the store holds.
#[derive(Debug, Default)]
pub struct StoreState {
    pub schema: Schema,
    pub videos: BTreeMap<Uuid, Video>,
}

/// Cloneable handle to the shared store.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<StoreState>>,
}

impl Store {
    /// An empty store using `schema`.
    pub fn new(schema: Schema) -> Self {
        info!(
            subsystem = "db",
            classes = schema.classes().len(),
            types = schema.types().len(),
            descriptor_values = schema.vocabulary().len(),
            "store: opened"
        );
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                schema,
                videos: BTreeMap::new(),
            })),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().await
    }

    /// Exclusive access; holding the guard is the transaction.
    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().await
    }

    /// Number of stored videos.
    pub async fn video_count(&self) -> usize {
        self.inner.read().await.videos.len()
    }
}
