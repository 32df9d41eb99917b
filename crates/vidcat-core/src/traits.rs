//! Core traits for vidcat storage abstractions.
//!
//! These traits define the interfaces a record store must satisfy. Saves
//! are atomic: a rejected save leaves the stored video untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::changes::VideoChange;
use crate::error::Result;
use crate::models::*;
use crate::schema::Schema;

// =============================================================================
// SCHEMA REPOSITORY
// =============================================================================

/// Repository for the property schema.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Snapshot of the current schema.
    async fn load(&self) -> Result<Schema>;

    /// Replace the whole schema.
    async fn replace(&self, schema: Schema) -> Result<()>;

    /// Define a property class.
    async fn create_class(&self, req: CreatePropertyClassRequest) -> Result<PropertyClass>;

    /// Define a property type.
    async fn create_type(&self, req: CreatePropertyTypeRequest) -> Result<PropertyType>;

    /// Add a controlled-vocabulary entry.
    async fn create_descriptor_value(
        &self,
        req: CreateDescriptorValueRequest,
    ) -> Result<DescriptorValue>;
}

// =============================================================================
// VIDEO REPOSITORY
// =============================================================================

/// Request for listing videos.
#[derive(Debug, Clone, Default)]
pub struct ListVideosRequest {
    /// Only videos with this descriptor value attached
    pub descriptor_value_id: Option<Uuid>,
    /// Only videos holding at least one value of this property type
    pub property_type_id: Option<Uuid>,
    /// Maximum results
    pub limit: Option<i64>,
    /// Pagination offset
    pub offset: Option<i64>,
}

/// Video listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    pub sentence: String,
    pub duration: Option<i64>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Video> for VideoSummary {
    fn from(v: &Video) -> Self {
        Self {
            id: v.id,
            title: v.title.clone(),
            sentence: v.sentence.clone(),
            duration: v.duration,
            views: v.views,
            created_at: v.created_at,
        }
    }
}

/// Response for listing videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVideosResponse {
    pub videos: Vec<VideoSummary>,
    /// Matches before pagination
    pub total: i64,
}

/// Repository for videos and their property rows.
///
/// Validation failures come back as [`SaveOutcome::Rejected`]; `Err` is
/// reserved for lookups and broken schema data.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Validate and store a new video.
    async fn insert(&self, video: Video) -> Result<SaveOutcome>;

    /// Validate and replace an existing video.
    async fn save(&self, video: Video) -> Result<SaveOutcome>;

    /// Fetch a video with its properties.
    async fn fetch(&self, id: Uuid) -> Result<Video>;

    /// Delete a video and its properties.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Apply an edit-form submission, committing only if the result validates.
    async fn apply_change(&self, id: Uuid, change: VideoChange) -> Result<SaveOutcome>;

    /// Newest videos first.
    async fn recent(&self, limit: usize) -> Result<Vec<Video>>;

    /// List videos with filtering and pagination.
    async fn list(&self, req: ListVideosRequest) -> Result<ListVideosResponse>;

    /// Count one view, returning the new total.
    async fn record_view(&self, id: Uuid) -> Result<i64>;

    /// The newest video with `descriptor_value_id` attached.
    async fn most_recent_using(&self, descriptor_value_id: Uuid) -> Result<Option<Video>>;
}
