//! Test fixtures for store integration tests.
//!
//! Seeds the stock catalog schema so tests across crates start from the
//! same classes, types, and vocabulary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vidcat_db::test_fixtures::TestDatabase;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test_db = TestDatabase::new();
//!     let video = test_db.video("Nanook of the North");
//!     test_db.db.videos.insert(video).await.unwrap();
//! }
//! ```

use vidcat_core::defaults::{RANGE_DATE, RANGE_DESCRIPTOR_VALUE, RANGE_STRING};
use vidcat_core::{
    CreateDescriptorValueRequest, CreatePropertyClassRequest, CreatePropertyTypeRequest,
    CreateVideoRequest, Property, Result, Schema, Video,
};

use crate::Database;

/// (name, range, multivalued, optional)
pub const STOCK_CLASSES: &[(&str, &str, bool, bool)] = &[
    ("Date Type", RANGE_DATE, true, true),
    ("Role", RANGE_STRING, true, true),
    ("Digital File", RANGE_STRING, true, true),
    ("Format Type", RANGE_STRING, false, true),
    ("Optional Multivalued Descriptor", RANGE_DESCRIPTOR_VALUE, true, true),
    ("Mandatory Multivalued Descriptor", RANGE_DESCRIPTOR_VALUE, true, false),
    ("Optional Singular Descriptor", RANGE_DESCRIPTOR_VALUE, false, true),
    ("Mandatory Singular Descriptor", RANGE_DESCRIPTOR_VALUE, false, false),
];

/// (name, class, priority)
pub const STOCK_TYPES: &[(&str, &str, i32)] = &[
    ("Genre", "Optional Singular Descriptor", 1),
    ("Producer", "Role", 2),
    ("Writer", "Role", 3),
    ("Director", "Role", 4),
    ("Broadcast", "Date Type", 5),
    ("Production", "Date Type", 6),
];

/// (type, value, priority)
pub const STOCK_DESCRIPTOR_VALUES: &[(&str, &str, i32)] = &[
    ("Genre", "Documentary", 1),
    ("Genre", "Drama", 2),
    ("Genre", "Comedy", 3),
];

/// Build the stock catalog schema.
pub fn stock_schema() -> Result<Schema> {
    let mut schema = Schema::new();
    for (name, range, multivalued, optional) in STOCK_CLASSES {
        schema.create_class(CreatePropertyClassRequest {
            name: name.to_string(),
            range: range.to_string(),
            multivalued: Some(*multivalued),
            optional: Some(*optional),
        })?;
    }
    for (name, class, priority) in STOCK_TYPES {
        let class_id = schema
            .class_by_name(class)
            .map(|c| c.id)
            .ok_or_else(|| vidcat_core::Error::NotFound(format!("property class {}", class)))?;
        schema.create_type(CreatePropertyTypeRequest {
            name: name.to_string(),
            property_class_id: class_id,
            priority: *priority,
            browsable: true,
        })?;
    }
    for (type_name, value, priority) in STOCK_DESCRIPTOR_VALUES {
        let type_id = schema
            .type_by_name(type_name)
            .map(|t| t.id)
            .ok_or_else(|| vidcat_core::Error::PropertyTypeNotFound(type_name.to_string()))?;
        schema.create_descriptor_value(CreateDescriptorValueRequest {
            property_type_id: type_id,
            value: value.to_string(),
            priority: *priority,
        })?;
    }
    Ok(schema)
}

/// A store seeded with the stock schema.
pub struct TestDatabase {
    pub db: Database,
    /// Schema snapshot taken at creation; use [`TestDatabase::schema`] after
    /// schema edits.
    pub schema: Schema,
}

impl TestDatabase {
    /// Create a new store seeded with the stock schema.
    ///
    /// # Panics
    ///
    /// Panics if the stock schema fails its own validation.
    pub fn new() -> Self {
        let schema = stock_schema().expect("stock schema is valid");
        Self {
            db: Database::new(schema.clone()),
            schema,
        }
    }

    /// Current schema, including edits made through the repository.
    pub async fn schema(&self) -> Schema {
        self.db.store.read().await.schema.clone()
    }

    /// A valid, unsaved video with the given title.
    pub fn video(&self, title: &str) -> Video {
        Video::new(CreateVideoRequest {
            title: title.to_string(),
            sentence: format!("{} in one sentence.", title),
            ..Default::default()
        })
    }

    /// Build a property against the current schema.
    ///
    /// # Panics
    ///
    /// Panics if `type_name` is not defined.
    pub async fn property(&self, type_name: &str, raw: &str) -> Property {
        self.schema()
            .await
            .build_property(type_name, raw)
            .expect("property type exists")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}
