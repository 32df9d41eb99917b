//! Core data models for vidcat.
//!
//! These types are shared across all vidcat crates and represent the
//! catalog's domain entities: the administrator-defined property schema
//! and the videos that carry property values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::defaults::{NIL_DATE, NIL_INTEGER, NIL_STRING, RANGE_DESCRIPTOR_VALUE};
use crate::uuid_utils::new_v7;

// =============================================================================
// ERROR COLLECTION
// =============================================================================

/// Validation messages accumulated on a record.
///
/// Base messages describe the record as a whole ("property Producer
/// required"); field messages are keyed by attribute name ("value").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Errors {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    base: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record-level message.
    pub fn add_to_base(&mut self, message: impl Into<String>) {
        self.base.push(message.into());
    }

    /// Add a message against a named field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Record-level messages in insertion order.
    pub fn base(&self) -> &[String] {
        &self.base
    }

    /// Messages recorded against `field`.
    pub fn on(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.fields.is_empty()
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.base.len() + self.fields.values().map(Vec::len).sum::<usize>()
    }

    pub fn clear(&mut self) {
        self.base.clear();
        self.fields.clear();
    }

    /// Append every message from `other`.
    pub fn merge(&mut self, other: Errors) {
        self.base.extend(other.base);
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Human-readable messages: base messages first, then "field message".
    pub fn full_messages(&self) -> Vec<String> {
        let mut out = self.base.clone();
        for (field, messages) in &self.fields {
            for message in messages {
                out.push(format!("{} {}", field, message));
            }
        }
        out
    }
}

// =============================================================================
// SCHEMA TYPES
// =============================================================================

/// Shared behavior for a group of property types: which range type values
/// take, and the cardinality and optionality rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyClass {
    pub id: Uuid,
    pub name: String,
    /// Name of a registered range type ("string", "date", "descriptor_value", ...)
    pub range: String,
    pub multivalued: bool,
    pub optional: bool,
    pub created_at: DateTime<Utc>,
}

impl PropertyClass {
    /// Whether values of this class come from the controlled vocabulary.
    pub fn is_descriptor(&self) -> bool {
        self.range == RANGE_DESCRIPTOR_VALUE
    }

    /// Name suitable for a table name or an HTML id attribute.
    ///
    /// The last word is pluralized with the regular English endings
    /// ("Class" becomes "classes", "Category" becomes "categories"). A name
    /// already ending in a single "s" is taken as plural, and irregular
    /// nouns are not handled.
    ///
    /// ```
    /// # use vidcat_core::models::PropertyClass;
    /// # use chrono::Utc;
    /// # use uuid::Uuid;
    /// let class = PropertyClass {
    ///     id: Uuid::nil(),
    ///     name: "Mandatory Singular Descriptor".into(),
    ///     range: "descriptor_value".into(),
    ///     multivalued: false,
    ///     optional: false,
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(class.tableize(), "mandatory_singular_descriptors");
    /// ```
    pub fn tableize(&self) -> String {
        let mut out: String = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        pluralize(&mut out);
        out
    }
}

fn pluralize(word: &mut String) {
    if ["ss", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
        word.push_str("es");
    } else if word.ends_with('y')
        && !word[..word.len() - 1].ends_with(|c: char| "aeiou".contains(c))
    {
        word.pop();
        word.push_str("ies");
    } else if !word.is_empty() && !word.ends_with('s') {
        word.push('s');
    }
}

/// A named metadata slot a video may hold values for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    pub id: Uuid,
    pub name: String,
    /// Owning class; `None` only when the schema data is broken.
    pub property_class_id: Option<Uuid>,
    /// Display ordering, ascending
    pub priority: i32,
    /// Whether the slot appears in browse listings
    pub browsable: bool,
    pub created_at: DateTime<Utc>,
}

/// A controlled-vocabulary entry usable as a descriptor-value property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorValue {
    pub id: Uuid,
    /// The descriptor-ranged property type acting as this value's category
    pub property_type_id: Uuid,
    pub value: String,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

/// Request to create a property class.
///
/// The flags are optional here so that a missing setting can be rejected
/// rather than silently defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePropertyClassRequest {
    pub name: String,
    pub range: String,
    #[serde(default)]
    pub multivalued: Option<bool>,
    #[serde(default)]
    pub optional: Option<bool>,
}

/// Request to create a property type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePropertyTypeRequest {
    pub name: String,
    pub property_class_id: Uuid,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_browsable")]
    pub browsable: bool,
}

fn default_browsable() -> bool {
    true
}

/// Request to create a descriptor value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDescriptorValueRequest {
    pub property_type_id: Uuid,
    pub value: String,
    #[serde(default)]
    pub priority: i32,
}

// =============================================================================
// PROPERTY TYPES
// =============================================================================

/// The typed storage column a range type writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueField {
    StringValue,
    DateValue,
    IntegerValue,
    DescriptorValueId,
}

impl std::fmt::Display for ValueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StringValue => write!(f, "string_value"),
            Self::DateValue => write!(f, "date_value"),
            Self::IntegerValue => write!(f, "integer_value"),
            Self::DescriptorValueId => write!(f, "descriptor_value_id"),
        }
    }
}

/// A translated property value, ready to be stored in its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Date(NaiveDate),
    Integer(i64),
    Descriptor(Uuid),
}

impl TypedValue {
    /// The column this value belongs in.
    pub fn field(&self) -> ValueField {
        match self {
            Self::String(_) => ValueField::StringValue,
            Self::Date(_) => ValueField::DateValue,
            Self::Integer(_) => ValueField::IntegerValue,
            Self::Descriptor(_) => ValueField::DescriptorValueId,
        }
    }
}

/// One value of one property type attached to one video.
///
/// Every typed column always holds a value: the column matching the range
/// type holds the translated value and the rest hold their sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<Uuid>,
    pub property_type_id: Uuid,
    /// Raw value as submitted
    pub value: String,
    pub string_value: String,
    pub date_value: NaiveDate,
    pub integer_value: i64,
    pub descriptor_value_id: Uuid,
    #[serde(default, skip_serializing_if = "Errors::is_empty")]
    pub errors: Errors,
}

impl Property {
    /// A new, unattached property with every column at its sentinel.
    pub fn new(property_type_id: Uuid) -> Self {
        Self {
            id: new_v7(),
            video_id: None,
            property_type_id,
            value: String::new(),
            string_value: NIL_STRING.to_string(),
            date_value: NIL_DATE,
            integer_value: NIL_INTEGER,
            descriptor_value_id: Uuid::nil(),
            errors: Errors::new(),
        }
    }

    /// Reset every typed column to its sentinel.
    pub fn defaultize(&mut self) {
        self.string_value = NIL_STRING.to_string();
        self.date_value = NIL_DATE;
        self.integer_value = NIL_INTEGER;
        self.descriptor_value_id = Uuid::nil();
    }

    /// Store a translated value in its column.
    pub fn assign(&mut self, value: TypedValue) {
        match value {
            TypedValue::String(s) => self.string_value = s,
            TypedValue::Date(d) => self.date_value = d,
            TypedValue::Integer(i) => self.integer_value = i,
            TypedValue::Descriptor(id) => self.descriptor_value_id = id,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// =============================================================================
// VIDEO TYPES
// =============================================================================

/// A catalog item: the record that owns property values and vocabulary links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    /// One-line summary shown in listings
    pub sentence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Running time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default)]
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Attached controlled-vocabulary values, in attachment order
    #[serde(default)]
    pub descriptor_value_ids: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Errors::is_empty")]
    pub errors: Errors,
}

impl Video {
    pub fn new(req: CreateVideoRequest) -> Self {
        let now = Utc::now();
        Self {
            id: new_v7(),
            title: req.title,
            sentence: req.sentence,
            description: req.description,
            duration: req.duration,
            views: 0,
            created_at: now,
            updated_at: now,
            properties: Vec::new(),
            descriptor_value_ids: Vec::new(),
            errors: Errors::new(),
        }
    }

    /// Attach a property, claiming it for this video.
    pub fn add_property(&mut self, mut property: Property) {
        property.video_id = Some(self.id);
        self.properties.push(property);
    }

    /// Remove a property by id, returning it if present.
    pub fn remove_property(&mut self, property_id: Uuid) -> Option<Property> {
        let idx = self.properties.iter().position(|p| p.id == property_id)?;
        Some(self.properties.remove(idx))
    }

    /// Number of attached properties referencing `property_type_id`.
    pub fn count_of(&self, property_type_id: Uuid) -> usize {
        self.properties
            .iter()
            .filter(|p| p.property_type_id == property_type_id)
            .count()
    }

    /// Attach a descriptor value; attaching the same value twice is an error.
    pub fn add_descriptor(&mut self, descriptor_value_id: Uuid) -> crate::Result<()> {
        if self.descriptor_value_ids.contains(&descriptor_value_id) {
            return Err(crate::Error::DuplicateDescriptor {
                video_id: self.id,
                descriptor_value_id,
            });
        }
        self.descriptor_value_ids.push(descriptor_value_id);
        Ok(())
    }

    /// Replace the attached descriptor values.
    ///
    /// Leaves the video untouched when `ids` contains a duplicate.
    pub fn set_descriptors(&mut self, ids: &[Uuid]) -> crate::Result<()> {
        let mut next = Vec::with_capacity(ids.len());
        for id in ids {
            if next.contains(id) {
                return Err(crate::Error::DuplicateDescriptor {
                    video_id: self.id,
                    descriptor_value_id: *id,
                });
            }
            next.push(*id);
        }
        self.descriptor_value_ids = next;
        Ok(())
    }
}

/// Request for creating a new video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub sentence: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Result of a save attempt.
///
/// Validation failures are an ordinary outcome, not an error: the rejected
/// variant carries every message collected during the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Uuid),
    Rejected(Errors),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    /// Collected messages; empty for a successful save.
    pub fn errors(&self) -> Option<&Errors> {
        match self {
            Self::Saved(_) => None,
            Self::Rejected(errors) => Some(errors),
        }
    }
}
