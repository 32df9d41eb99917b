//! Controlled-vocabulary values.
//!
//! Descriptor values are grouped by the descriptor-ranged property type
//! that acts as their category, and always listed by priority, then text,
//! then id.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::models::{DescriptorValue, PropertyType, Video};
use crate::schema::Schema;

/// Canonical ordering for values within a category.
pub fn value_order(a: &DescriptorValue, b: &DescriptorValue) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.value.cmp(&b.value))
        .then_with(|| a.id.cmp(&b.id))
}

/// All descriptor values known to a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    values: Vec<DescriptorValue>,
}

impl Vocabulary {
    pub fn new(values: Vec<DescriptorValue>) -> Self {
        Self { values }
    }

    pub fn insert(&mut self, value: DescriptorValue) {
        self.values.push(value);
    }

    pub fn get(&self, id: Uuid) -> Option<&DescriptorValue> {
        self.values.iter().find(|v| v.id == id)
    }

    /// Every value, in insertion order.
    pub fn all(&self) -> &[DescriptorValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values belonging to one property type, in canonical order.
    pub fn values_for(&self, property_type_id: Uuid) -> Vec<&DescriptorValue> {
        let mut out: Vec<&DescriptorValue> = self
            .values
            .iter()
            .filter(|v| v.property_type_id == property_type_id)
            .collect();
        out.sort_by(|a, b| value_order(a, b));
        out
    }

    /// Exact text match within one property type.
    pub fn find_by_value(&self, property_type_id: Uuid, text: &str) -> Option<&DescriptorValue> {
        self.values
            .iter()
            .find(|v| v.property_type_id == property_type_id && v.value == text)
    }

    /// Resolve a submitted identifier: the value text (exact, then
    /// case-insensitive) or the value's id, within one property type.
    pub fn resolve(&self, property_type_id: Uuid, raw: &str) -> Option<&DescriptorValue> {
        let raw = raw.trim();
        if let Some(v) = self.find_by_value(property_type_id, raw) {
            return Some(v);
        }
        let mut in_type = self
            .values
            .iter()
            .filter(|v| v.property_type_id == property_type_id);
        if let Some(v) = in_type
            .clone()
            .find(|v| v.value.eq_ignore_ascii_case(raw))
        {
            return Some(v);
        }
        let id = Uuid::parse_str(raw).ok()?;
        in_type.find(|v| v.id == id)
    }
}

/// Distinct property types of a video's attached descriptor values,
/// ordered by (priority, name).
pub fn descriptor_types_for<'s>(schema: &'s Schema, video: &Video) -> Vec<&'s PropertyType> {
    let mut out: Vec<&PropertyType> = Vec::new();
    for id in &video.descriptor_value_ids {
        let Some(dv) = schema.vocabulary().get(*id) else {
            continue;
        };
        if out.iter().any(|t| t.id == dv.property_type_id) {
            continue;
        }
        if let Some(pt) = schema.property_type(dv.property_type_id) {
            out.push(pt);
        }
    }
    out.sort_by(|a, b| crate::schema::slot_order(a, b));
    out
}

/// A video's attached descriptor values of one property type, in canonical order.
pub fn descriptors_by_type<'s>(
    schema: &'s Schema,
    video: &Video,
    property_type_id: Uuid,
) -> Vec<&'s DescriptorValue> {
    let mut out: Vec<&DescriptorValue> = video
        .descriptor_value_ids
        .iter()
        .filter_map(|id| schema.vocabulary().get(*id))
        .filter(|dv| dv.property_type_id == property_type_id)
        .collect();
    out.sort_by(|a, b| value_order(a, b));
    out
}

/// (type, values) pairs for a video, restricted to browsable types and in
/// browse order.
pub fn browse_descriptors_and_types<'s>(
    schema: &'s Schema,
    video: &Video,
) -> Vec<(&'s PropertyType, Vec<&'s DescriptorValue>)> {
    let used = descriptor_types_for(schema, video);
    schema
        .browse_all()
        .into_iter()
        .filter(|pt| used.iter().any(|u| u.id == pt.id))
        .map(|pt| (pt, descriptors_by_type(schema, video, pt.id)))
        .collect()
}
