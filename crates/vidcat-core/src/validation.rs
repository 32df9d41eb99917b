//! Requirement and arity validation over a record's property set.
//!
//! The validators are pure: they read the schema and a slice of properties
//! and return a [`ValidationReport`]. [`Video::validate`] folds the report
//! into the record's own error collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::models::{Property, Video};
use crate::schema::Schema;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A cardinality rule broken by a record's property set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A mandatory slot has no value.
    Required { property_type: String },
    /// A singular slot has more than one value.
    MultipleValues { property_type: String, count: usize },
}

impl Violation {
    pub fn property_type(&self) -> &str {
        match self {
            Self::Required { property_type } | Self::MultipleValues { property_type, .. } => {
                property_type
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { property_type } => write!(f, "property {} required", property_type),
            Self::MultipleValues { property_type, .. } => {
                write!(f, "property {} has multiple values", property_type)
            }
        }
    }
}

/// Outcome of a validation pass: every violation found, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append every violation from `other`.
    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    /// Violation messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

// =============================================================================
// VALIDATORS
// =============================================================================

/// Every type built on a non-optional class must have at least one value.
pub fn validate_required(schema: &Schema, properties: &[Property]) -> ValidationReport {
    let mut report = ValidationReport::new();
    for class in schema.classes().iter().filter(|c| !c.optional) {
        for pt in schema.types_of_class(class.id) {
            if !properties.iter().any(|p| p.property_type_id == pt.id) {
                trace!(property_type = %pt.name, "validation: required value missing");
                report.push(Violation::Required {
                    property_type: pt.name.clone(),
                });
            }
        }
    }
    report
}

/// Every type built on a non-multivalued class may have at most one value.
pub fn validate_arity(schema: &Schema, properties: &[Property]) -> ValidationReport {
    let mut report = ValidationReport::new();
    for class in schema.classes().iter().filter(|c| !c.multivalued) {
        for pt in schema.types_of_class(class.id) {
            let count = properties
                .iter()
                .filter(|p| p.property_type_id == pt.id)
                .count();
            if count > 1 {
                trace!(property_type = %pt.name, count, "validation: singular slot repeated");
                report.push(Violation::MultipleValues {
                    property_type: pt.name.clone(),
                    count,
                });
            }
        }
    }
    report
}

/// Both rules, always both evaluated.
pub fn validate_object(schema: &Schema, properties: &[Property]) -> ValidationReport {
    let mut report = validate_required(schema, properties);
    report.merge(validate_arity(schema, properties));
    report
}

// =============================================================================
// RECORD INTEGRATION
// =============================================================================

impl Video {
    /// Validate the whole record, replacing its error collection.
    ///
    /// Field presence, per-property value errors and cardinality rules are
    /// all checked; the result is true only when no message was recorded.
    pub fn validate(&mut self, schema: &Schema) -> bool {
        self.errors.clear();

        if self.title.trim().is_empty() {
            self.errors.add("title", "can't be blank");
        }
        if self.sentence.trim().is_empty() {
            self.errors.add("sentence", "can't be blank");
        }

        for property in &self.properties {
            if property.is_valid() {
                continue;
            }
            let name = schema
                .property_type(property.property_type_id)
                .map(|pt| pt.name.clone())
                .unwrap_or_else(|| property.property_type_id.to_string());
            for message in property.errors.full_messages() {
                self.errors
                    .add_to_base(format!("property {}: {}", name, message));
            }
        }

        let report = validate_object(schema, &self.properties);
        for message in report.messages() {
            self.errors.add_to_base(message);
        }

        debug!(
            video_id = %self.id,
            violation_count = report.violations().len(),
            error_count = self.errors.len(),
            "validation: video checked"
        );
        self.errors.is_empty()
    }

    /// Properties whose type is named `type_name`.
    pub fn properties_by_type<'a>(&'a self, schema: &Schema, type_name: &str) -> Vec<&'a Property> {
        let Some(pt) = schema.type_by_name(type_name) else {
            return Vec::new();
        };
        self.properties
            .iter()
            .filter(|p| p.property_type_id == pt.id)
            .collect()
    }

    /// Properties whose type is built on the class named `class_name`.
    pub fn properties_by_class<'a>(&'a self, schema: &Schema, class_name: &str) -> Vec<&'a Property> {
        let Some(class) = schema.class_by_name(class_name) else {
            return Vec::new();
        };
        self.properties
            .iter()
            .filter(|p| {
                schema
                    .property_type(p.property_type_id)
                    .is_some_and(|pt| pt.property_class_id == Some(class.id))
            })
            .collect()
    }
}
