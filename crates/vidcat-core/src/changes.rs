//! Edit-form submissions against a video.
//!
//! A [`VideoChange`] bundles property edits (keyed by existing property id
//! or by a client-generated new-row key), scalar field updates, and the
//! replacement descriptor list. [`apply_change`] mutates a working copy;
//! the caller validates the result and decides whether to commit it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::duration::duration_to_int;
use crate::error::{Error, Result};
use crate::models::{Errors, Video};
use crate::schema::Schema;

/// Keys the edit form mints for rows that do not exist yet, e.g. `new_3`
/// or `new_role_12`.
static NEW_ROW_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^new(?:_[a-z]+)?_(\d+)$").expect("new-row key pattern is valid"));

/// Field that duration parse failures are recorded under.
pub const DURATION_FIELD: &str = "duration";

/// Whether `key` names a row the client has not saved yet.
pub fn is_new_row_key(key: &str) -> bool {
    NEW_ROW_KEY.is_match(key)
}

/// Row number of a new-row key; rows are added in this order.
fn new_row_number(key: &str) -> Option<u64> {
    let caps = NEW_ROW_KEY.captures(key)?;
    Some(caps[1].parse().unwrap_or(u64::MAX))
}

/// One row of the property editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEdit {
    /// Property type name; required for new rows, optional retype otherwise
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl PropertyEdit {
    pub fn new(property_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_type: Some(property_type.into()),
            value: Some(value.into()),
            deleted: false,
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn deleted() -> Self {
        Self {
            deleted: true,
            ..Self::default()
        }
    }
}

/// A complete submission of the video edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoChange {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyEdit>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sentence: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Running time as `HH:MM:SS`; blank clears it
    #[serde(default)]
    pub duration: Option<String>,
    /// Replacement descriptor list; `None` leaves the current list alone
    #[serde(default)]
    pub descriptor_value_ids: Option<Vec<Uuid>>,
}

/// Apply `change` to `video`.
///
/// Returns field errors for form inputs that could not be interpreted
/// (currently only the duration). Property value errors stay on their
/// properties and surface through [`Video::validate`]. A malformed row key,
/// an unknown property type or descriptor value, or a duplicate descriptor
/// is an error and leaves `video` partially modified, so callers must apply
/// changes to a copy.
pub fn apply_change(schema: &Schema, video: &mut Video, change: &VideoChange) -> Result<Errors> {
    let mut field_errors = Errors::new();
    let mut touched = 0usize;
    let mut new_rows = Vec::new();

    for (key, edit) in &change.properties {
        let existing = Uuid::parse_str(key)
            .ok()
            .filter(|id| video.properties.iter().any(|p| p.id == *id));

        if let Some(id) = existing {
            if edit.deleted {
                video.remove_property(id);
            } else {
                update_property(schema, video, id, edit)?;
            }
            touched += 1;
        } else if let Some(row) = new_row_number(key) {
            if !edit.deleted {
                new_rows.push((row, key, edit));
            }
        } else if !edit.deleted {
            warn!(video_id = %video.id, key = %key, "changes: bad property id");
            return Err(Error::InvalidInput(format!("bad property id: {}", key)));
        }
    }

    // Map order puts "new_10" before "new_2"
    new_rows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    for (_, key, edit) in new_rows {
        let type_name = edit.property_type.as_deref().ok_or_else(|| {
            Error::InvalidInput(format!("new property {} has no property type", key))
        })?;
        let property =
            schema.build_property(type_name, edit.value.as_deref().unwrap_or_default())?;
        video.add_property(property);
        touched += 1;
    }

    if let Some(title) = &change.title {
        video.title = title.clone();
    }
    if let Some(sentence) = &change.sentence {
        video.sentence = sentence.clone();
    }
    if let Some(description) = &change.description {
        video.description = non_blank(description);
    }
    if let Some(text) = &change.duration {
        if text.trim().is_empty() {
            video.duration = None;
        } else {
            match duration_to_int(text) {
                Ok(secs) => video.duration = Some(secs),
                Err(_) => field_errors.add(DURATION_FIELD, "is not a duration (HH:MM:SS)"),
            }
        }
    }

    if let Some(ids) = &change.descriptor_value_ids {
        for id in ids {
            if schema.vocabulary().get(*id).is_none() {
                return Err(Error::NotFound(format!("descriptor value {}", id)));
            }
        }
        video.set_descriptors(ids)?;
    }

    debug!(
        video_id = %video.id,
        property_count = touched,
        field_errors = field_errors.len(),
        "changes: applied"
    );
    Ok(field_errors)
}

fn update_property(schema: &Schema, video: &mut Video, id: Uuid, edit: &PropertyEdit) -> Result<()> {
    let retype = match &edit.property_type {
        Some(name) => Some(
            schema
                .type_by_name(name)
                .map(|pt| pt.id)
                .ok_or_else(|| Error::PropertyTypeNotFound(name.clone()))?,
        ),
        None => None,
    };
    let Some(property) = video.properties.iter_mut().find(|p| p.id == id) else {
        return Err(Error::NotFound(format!("property {}", id)));
    };
    if let Some(type_id) = retype {
        property.property_type_id = type_id;
    }
    let raw = edit.value.clone().unwrap_or_else(|| property.value.clone());
    schema.revalue_property(property, &raw)
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
