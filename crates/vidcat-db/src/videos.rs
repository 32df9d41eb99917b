//! Video repository implementation.
//!
//! Every write runs as one transaction under the store's write lock: the
//! candidate video is validated against the current schema and only a
//! valid candidate replaces the stored row. Property rows live inside the
//! video, so deleting a video cascades to its properties.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vidcat_core::defaults::{PAGE_LIMIT, PAGE_OFFSET};
use vidcat_core::{
    apply_change, Error, ListVideosRequest, ListVideosResponse, Result, SaveOutcome, Schema,
    Video, VideoChange, VideoRepository, VideoSummary,
};

use crate::store::Store;

/// Newest first; equal timestamps fall back to the later-minted id.
fn newest_first(a: &Video, b: &Video) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Reject references the schema cannot resolve.
///
/// These are integrity failures rather than form errors: an unknown
/// property type or descriptor value, or a type whose class or range is
/// broken.
fn check_references(schema: &Schema, video: &Video) -> Result<()> {
    for property in &video.properties {
        let pt = schema
            .property_type(property.property_type_id)
            .ok_or_else(|| Error::NotFound(format!("property type {}", property.property_type_id)))?;
        schema.range_of(pt)?;
    }
    for id in &video.descriptor_value_ids {
        if schema.vocabulary().get(*id).is_none() {
            return Err(Error::NotFound(format!("descriptor value {}", id)));
        }
    }
    Ok(())
}

/// Validate `video` in place, returning the outcome to report.
fn validate_for_save(schema: &Schema, video: &mut Video, op: &str) -> Result<Option<SaveOutcome>> {
    check_references(schema, video)?;
    if video.validate(schema) {
        return Ok(None);
    }
    info!(
        subsystem = "db",
        op,
        video_id = %video.id,
        violation_count = video.errors.len(),
        success = false,
        "videos: save rejected"
    );
    Ok(Some(SaveOutcome::Rejected(video.errors.clone())))
}

fn claim_properties(video: &mut Video) {
    let id = video.id;
    for property in &mut video.properties {
        property.video_id = Some(id);
    }
}

/// In-memory implementation of VideoRepository.
#[derive(Debug, Clone)]
pub struct MemVideoRepository {
    store: Store,
}

impl MemVideoRepository {
    /// Create a new MemVideoRepository over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VideoRepository for MemVideoRepository {
    async fn insert(&self, mut video: Video) -> Result<SaveOutcome> {
        let mut guard = self.store.write().await;
        let state = &mut *guard;

        if state.videos.contains_key(&video.id) {
            return Err(Error::InvalidInput(format!("video {} already exists", video.id)));
        }
        if let Some(rejected) = validate_for_save(&state.schema, &mut video, "insert")? {
            return Ok(rejected);
        }

        claim_properties(&mut video);
        let id = video.id;
        info!(
            subsystem = "db",
            op = "insert",
            video_id = %id,
            property_count = video.properties.len(),
            success = true,
            "videos: inserted"
        );
        state.videos.insert(id, video);
        Ok(SaveOutcome::Saved(id))
    }

    async fn save(&self, mut video: Video) -> Result<SaveOutcome> {
        let mut guard = self.store.write().await;
        let state = &mut *guard;

        if !state.videos.contains_key(&video.id) {
            return Err(Error::VideoNotFound(video.id));
        }
        if let Some(rejected) = validate_for_save(&state.schema, &mut video, "save")? {
            return Ok(rejected);
        }

        claim_properties(&mut video);
        video.updated_at = Utc::now();
        let id = video.id;
        info!(
            subsystem = "db",
            op = "save",
            video_id = %id,
            property_count = video.properties.len(),
            success = true,
            "videos: saved"
        );
        state.videos.insert(id, video);
        Ok(SaveOutcome::Saved(id))
    }

    async fn fetch(&self, id: Uuid) -> Result<Video> {
        self.store
            .read()
            .await
            .videos
            .get(&id)
            .cloned()
            .ok_or(Error::VideoNotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut state = self.store.write().await;
        let removed = state.videos.remove(&id).ok_or(Error::VideoNotFound(id))?;
        info!(
            subsystem = "db",
            op = "delete",
            video_id = %id,
            property_count = removed.properties.len(),
            "videos: deleted"
        );
        Ok(())
    }

    async fn apply_change(&self, id: Uuid, change: VideoChange) -> Result<SaveOutcome> {
        let mut guard = self.store.write().await;
        let state = &mut *guard;

        let mut working = state
            .videos
            .get(&id)
            .cloned()
            .ok_or(Error::VideoNotFound(id))?;

        let field_errors = apply_change(&state.schema, &mut working, &change).inspect_err(|e| {
            warn!(subsystem = "db", op = "apply_change", video_id = %id, error = %e, "videos: change abandoned");
        })?;
        check_references(&state.schema, &working)?;

        let valid = working.validate(&state.schema);
        working.errors.merge(field_errors);
        if !valid || !working.errors.is_empty() {
            info!(
                subsystem = "db",
                op = "apply_change",
                video_id = %id,
                violation_count = working.errors.len(),
                success = false,
                "videos: change rolled back"
            );
            return Ok(SaveOutcome::Rejected(working.errors));
        }

        claim_properties(&mut working);
        working.updated_at = Utc::now();
        info!(
            subsystem = "db",
            op = "apply_change",
            video_id = %id,
            property_count = working.properties.len(),
            success = true,
            "videos: change committed"
        );
        state.videos.insert(id, working);
        Ok(SaveOutcome::Saved(id))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Video>> {
        let state = self.store.read().await;
        let mut videos: Vec<&Video> = state.videos.values().collect();
        videos.sort_by(|a, b| newest_first(a, b));
        Ok(videos.into_iter().take(limit).cloned().collect())
    }

    async fn list(&self, req: ListVideosRequest) -> Result<ListVideosResponse> {
        let state = self.store.read().await;

        if let Some(id) = req.descriptor_value_id {
            if state.schema.vocabulary().get(id).is_none() {
                return Err(Error::NotFound(format!("descriptor value {}", id)));
            }
        }
        if let Some(id) = req.property_type_id {
            if state.schema.property_type(id).is_none() {
                return Err(Error::NotFound(format!("property type {}", id)));
            }
        }

        let mut matches: Vec<&Video> = state
            .videos
            .values()
            .filter(|v| {
                req.descriptor_value_id
                    .map_or(true, |id| v.descriptor_value_ids.contains(&id))
            })
            .filter(|v| req.property_type_id.map_or(true, |id| v.count_of(id) > 0))
            .collect();
        matches.sort_by(|a, b| newest_first(a, b));

        let total = matches.len() as i64;
        let limit = req.limit.unwrap_or(PAGE_LIMIT).max(0) as usize;
        let offset = req.offset.unwrap_or(PAGE_OFFSET).max(0) as usize;
        let videos: Vec<VideoSummary> = matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(VideoSummary::from)
            .collect();

        debug!(
            subsystem = "db",
            op = "list",
            result_count = videos.len(),
            total,
            "videos: listed"
        );
        Ok(ListVideosResponse { videos, total })
    }

    async fn record_view(&self, id: Uuid) -> Result<i64> {
        let mut state = self.store.write().await;
        let video = state.videos.get_mut(&id).ok_or(Error::VideoNotFound(id))?;
        video.views += 1;
        Ok(video.views)
    }

    async fn most_recent_using(&self, descriptor_value_id: Uuid) -> Result<Option<Video>> {
        let state = self.store.read().await;
        Ok(state
            .videos
            .values()
            .filter(|v| v.descriptor_value_ids.contains(&descriptor_value_id))
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }
}
