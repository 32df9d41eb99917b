//! # vidcat-core
//!
//! Core types, traits, and the schema-driven property system for the vidcat
//! video catalog.
//!
//! Videos carry an open-ended set of typed properties. Which properties
//! exist, what kind of value each takes, and how many values a video may
//! hold are all schema data:
//!
//! - [`range`]: the range-type registry (validate, translate, retrieve).
//! - [`schema`]: property classes, property types, and the controlled vocabulary.
//! - [`validation`]: requirement and arity rules over a video's property set.
//! - [`changes`]: edit-form submissions applied to a working copy.

pub mod changes;
pub mod defaults;
pub mod duration;
pub mod error;
pub mod logging;
pub mod models;
pub mod range;
pub mod schema;
pub mod traits;
pub mod uuid_utils;
pub mod validation;
pub mod vocabulary;

// Re-export commonly used types at crate root
pub use changes::{apply_change, is_new_row_key, PropertyEdit, VideoChange};
pub use duration::{duration_to_int, int_to_duration};
pub use error::{Error, Result};
pub use models::*;
pub use range::{DateRange, DescriptorValueRange, RangeInput, RangeRegistry, RangeType, StringRange};
pub use schema::{Schema, SchemaDefinition};
pub use traits::*;
pub use uuid_utils::new_v7;
pub use validation::{validate_arity, validate_object, validate_required, ValidationReport, Violation};
pub use vocabulary::{
    browse_descriptors_and_types, descriptor_types_for, descriptors_by_type, Vocabulary,
};
