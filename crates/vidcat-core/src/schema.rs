//! Property schema: classes, types, and their controlled vocabulary.
//!
//! A [`PropertyType`] delegates every value operation to the range type of
//! its [`PropertyClass`]. Broken references surface as configuration errors
//! ([`Error::NoPropertyClass`], [`Error::NoRangeType`],
//! [`Error::NotDescriptorType`]) and are logged before they propagate.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    CreateDescriptorValueRequest, CreatePropertyClassRequest, CreatePropertyTypeRequest,
    DescriptorValue, Errors, Property, PropertyClass, PropertyType, TypedValue, ValueField,
};
use crate::range::{RangeInput, RangeRegistry, RangeType};
use crate::uuid_utils::new_v7;
use crate::vocabulary::Vocabulary;

/// Display ordering for property types: priority, then name.
pub fn slot_order(a: &PropertyType, b: &PropertyType) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.name.cmp(&b.name))
}

/// The complete, administrator-defined property schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    registry: RangeRegistry,
    classes: Vec<PropertyClass>,
    types: Vec<PropertyType>,
    vocabulary: Vocabulary,
}

impl Schema {
    /// An empty schema using the built-in range types.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty schema using a custom registry.
    pub fn with_registry(registry: RangeRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Assemble a schema from stored rows without re-validating them.
    ///
    /// Inconsistent rows are tolerated here and reported as configuration
    /// errors when they are used.
    pub fn from_parts(
        registry: RangeRegistry,
        classes: Vec<PropertyClass>,
        types: Vec<PropertyType>,
        values: Vec<DescriptorValue>,
    ) -> Self {
        for class in &classes {
            if !registry.contains(&class.range) {
                warn!(
                    property_class = %class.name,
                    range = %class.range,
                    "schema: class uses an unregistered range"
                );
            }
        }
        Self {
            registry,
            classes,
            types,
            vocabulary: Vocabulary::new(values),
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    pub fn registry(&self) -> &RangeRegistry {
        &self.registry
    }

    pub fn classes(&self) -> &[PropertyClass] {
        &self.classes
    }

    pub fn types(&self) -> &[PropertyType] {
        &self.types
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn class(&self, id: Uuid) -> Option<&PropertyClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&PropertyClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn property_type(&self, id: Uuid) -> Option<&PropertyType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn type_by_name(&self, name: &str) -> Option<&PropertyType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Types built on the class `class_id`, in insertion order.
    pub fn types_of_class(&self, class_id: Uuid) -> impl Iterator<Item = &PropertyType> {
        self.types
            .iter()
            .filter(move |t| t.property_class_id == Some(class_id))
    }

    /// Classes whose values are not drawn from the controlled vocabulary,
    /// ordered by name.
    pub fn simple_classes(&self) -> Vec<&PropertyClass> {
        let mut out: Vec<&PropertyClass> =
            self.classes.iter().filter(|c| !c.is_descriptor()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    // ─── Delegation to the range type ──────────────────────────────────────

    /// The class a property type is built on.
    pub fn class_of(&self, property_type: &PropertyType) -> Result<&PropertyClass> {
        let class = property_type
            .property_class_id
            .and_then(|id| self.class(id));
        match class {
            Some(c) => Ok(c),
            None => {
                error!(
                    property_type = %property_type.name,
                    class_id = ?property_type.property_class_id,
                    "schema: property type has no property class"
                );
                Err(Error::NoPropertyClass(property_type.name.clone()))
            }
        }
    }

    /// The range type a property type's values belong to.
    pub fn range_of(&self, property_type: &PropertyType) -> Result<&dyn RangeType> {
        let class = self.class_of(property_type)?;
        self.registry.lookup(&class.range).inspect_err(|_| {
            error!(
                property_type = %property_type.name,
                property_class = %class.name,
                range = %class.range,
                "schema: no range type registered"
            );
        })
    }

    /// The column a property type's values are stored in.
    pub fn field_of(&self, property_type: &PropertyType) -> Result<ValueField> {
        Ok(self.range_of(property_type)?.field())
    }

    /// Validate a raw value for a property type, recording failures in `errors`.
    pub fn validate_value(
        &self,
        property_type: &PropertyType,
        raw: &str,
        errors: &mut Errors,
    ) -> Result<bool> {
        let range = self.range_of(property_type)?;
        Ok(range.validate(&self.input(property_type, raw), errors))
    }

    /// Translate a raw value that has already been validated.
    pub fn translate_value(&self, property_type: &PropertyType, raw: &str) -> Result<TypedValue> {
        let range = self.range_of(property_type)?;
        range.translate(&self.input(property_type, raw))
    }

    /// Display text for a stored property.
    pub fn retrieve_value(&self, property_type: &PropertyType, property: &Property) -> Result<String> {
        let range = self.range_of(property_type)?;
        Ok(range.retrieve(property, &self.vocabulary))
    }

    /// Ordering weight for a stored property.
    pub fn retrieve_priority(&self, property_type: &PropertyType, property: &Property) -> Result<i32> {
        let range = self.range_of(property_type)?;
        Ok(range.retrieve_priority(property, &self.vocabulary))
    }

    /// Display text for a property, looking up its type.
    pub fn display(&self, property: &Property) -> Result<String> {
        let pt = self.property_type(property.property_type_id).ok_or_else(|| {
            Error::NotFound(format!("property type {}", property.property_type_id))
        })?;
        self.retrieve_value(pt, property)
    }

    fn input<'a>(&'a self, property_type: &'a PropertyType, raw: &'a str) -> RangeInput<'a> {
        RangeInput {
            raw,
            property_type,
            vocabulary: &self.vocabulary,
        }
    }

    // ─── Controlled vocabulary ─────────────────────────────────────────────

    /// Vocabulary entries of a descriptor-ranged property type, in order.
    pub fn descriptor_values(&self, property_type: &PropertyType) -> Result<Vec<&DescriptorValue>> {
        let class = self.class_of(property_type)?;
        if !class.is_descriptor() {
            error!(
                property_type = %property_type.name,
                range = %class.range,
                "schema: descriptor values requested for a non-descriptor type"
            );
            return Err(Error::NotDescriptorType(property_type.name.clone()));
        }
        Ok(self.vocabulary.values_for(property_type.id))
    }

    /// Known values for a property type: its vocabulary when descriptor-ranged,
    /// otherwise none.
    pub fn values(&self, property_type: &PropertyType) -> Result<Vec<&DescriptorValue>> {
        let class = self.class_of(property_type)?;
        if class.is_descriptor() {
            Ok(self.vocabulary.values_for(property_type.id))
        } else {
            Ok(Vec::new())
        }
    }

    // ─── Browsing ──────────────────────────────────────────────────────────

    /// Browsable property types, ordered by (priority, name).
    pub fn browse_all(&self) -> Vec<&PropertyType> {
        let mut out: Vec<&PropertyType> = self.types.iter().filter(|t| t.browsable).collect();
        out.sort_by(|a, b| slot_order(a, b));
        out
    }

    /// Visit each browsable property type in browse order.
    pub fn for_each_browsable<F>(&self, mut visitor: F)
    where
        F: FnMut(&PropertyType),
    {
        for pt in self.browse_all() {
            visitor(pt);
        }
    }

    /// Property types whose class range is exactly `descriptor_value`,
    /// ordered by (priority, name).
    pub fn descriptor_types(&self) -> Vec<&PropertyType> {
        let mut out: Vec<&PropertyType> = self
            .types
            .iter()
            .filter(|t| {
                t.property_class_id
                    .and_then(|id| self.class(id))
                    .is_some_and(PropertyClass::is_descriptor)
            })
            .collect();
        out.sort_by(|a, b| slot_order(a, b));
        out
    }

    // ─── Property pipeline ─────────────────────────────────────────────────

    /// Build an unattached property for the named type from a raw value.
    ///
    /// Value errors are collected on the returned property rather than
    /// raised; only lookup and configuration failures are errors.
    pub fn build_property(&self, type_name: &str, raw: &str) -> Result<Property> {
        let pt = self
            .type_by_name(type_name)
            .ok_or_else(|| Error::PropertyTypeNotFound(type_name.to_string()))?;
        let mut property = Property::new(pt.id);
        self.assign_value(pt, &mut property, raw)?;
        Ok(property)
    }

    /// Re-run the validate → translate pipeline on an existing property.
    pub fn revalue_property(&self, property: &mut Property, raw: &str) -> Result<()> {
        let pt = self
            .property_type(property.property_type_id)
            .ok_or_else(|| Error::NotFound(format!("property type {}", property.property_type_id)))?;
        self.assign_value(pt, property, raw)
    }

    fn assign_value(&self, pt: &PropertyType, property: &mut Property, raw: &str) -> Result<()> {
        let range = self.range_of(pt)?;
        let input = self.input(pt, raw);

        property.errors.clear();
        range.defaultize(property);
        property.value = raw.to_string();

        if range.validate(&input, &mut property.errors) {
            property.assign(range.translate(&input)?);
            trace!(property_type = %pt.name, range = range.name(), "property: translated");
        } else {
            debug!(
                property_type = %pt.name,
                range = range.name(),
                errors = property.errors.len(),
                "property: value rejected"
            );
        }
        Ok(())
    }

    // ─── Administration ────────────────────────────────────────────────────

    /// Define a new property class.
    pub fn create_class(&mut self, req: CreatePropertyClassRequest) -> Result<PropertyClass> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Property class name cannot be blank".into()));
        }
        if self.class_by_name(name).is_some() {
            return Err(Error::InvalidInput(format!(
                "Property class name already taken: {}",
                name
            )));
        }
        let multivalued = req.multivalued.ok_or_else(|| {
            Error::InvalidInput("Property class multivalued must be true or false".into())
        })?;
        let optional = req.optional.ok_or_else(|| {
            Error::InvalidInput("Property class optional must be true or false".into())
        })?;
        if !self.registry.contains(&req.range) {
            return Err(Error::InvalidInput(format!(
                "Property class range is not a registered range type: {}",
                req.range
            )));
        }

        let class = PropertyClass {
            id: new_v7(),
            name: name.to_string(),
            range: req.range,
            multivalued,
            optional,
            created_at: Utc::now(),
        };
        debug!(property_class = %class.name, range = %class.range, "schema: class created");
        self.classes.push(class.clone());
        Ok(class)
    }

    /// Define a new property type on an existing class.
    pub fn create_type(&mut self, req: CreatePropertyTypeRequest) -> Result<PropertyType> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Property type name cannot be blank".into()));
        }
        if self.type_by_name(name).is_some() {
            return Err(Error::InvalidInput(format!(
                "Property type name already taken: {}",
                name
            )));
        }
        if self.class(req.property_class_id).is_none() {
            return Err(Error::NotFound(format!(
                "property class {}",
                req.property_class_id
            )));
        }

        let pt = PropertyType {
            id: new_v7(),
            name: name.to_string(),
            property_class_id: Some(req.property_class_id),
            priority: req.priority,
            browsable: req.browsable,
            created_at: Utc::now(),
        };
        debug!(property_type = %pt.name, "schema: property type created");
        self.types.push(pt.clone());
        Ok(pt)
    }

    /// Add a vocabulary entry to a descriptor-ranged property type.
    pub fn create_descriptor_value(
        &mut self,
        req: CreateDescriptorValueRequest,
    ) -> Result<DescriptorValue> {
        let pt = self
            .property_type(req.property_type_id)
            .ok_or_else(|| Error::NotFound(format!("property type {}", req.property_type_id)))?;
        if !self.class_of(pt)?.is_descriptor() {
            return Err(Error::NotDescriptorType(pt.name.clone()));
        }
        let value = req.value.trim();
        if value.is_empty() {
            return Err(Error::InvalidInput("Descriptor value cannot be blank".into()));
        }
        if self.vocabulary.find_by_value(pt.id, value).is_some() {
            return Err(Error::InvalidInput(format!(
                "Descriptor value already defined for {}: {}",
                pt.name, value
            )));
        }

        let dv = DescriptorValue {
            id: new_v7(),
            property_type_id: pt.id,
            value: value.to_string(),
            priority: req.priority,
            created_at: Utc::now(),
        };
        self.vocabulary.insert(dv.clone());
        Ok(dv)
    }

    /// Build a schema from a name-keyed definition, creating every entry
    /// through the administration checks.
    pub fn from_definition(def: &SchemaDefinition, registry: RangeRegistry) -> Result<Self> {
        let mut schema = Self::with_registry(registry);
        for c in &def.classes {
            schema.create_class(CreatePropertyClassRequest {
                name: c.name.clone(),
                range: c.range.clone(),
                multivalued: c.multivalued,
                optional: c.optional,
            })?;
        }
        for t in &def.types {
            let class_id = schema
                .class_by_name(&t.class)
                .map(|c| c.id)
                .ok_or_else(|| Error::NotFound(format!("property class {}", t.class)))?;
            schema.create_type(CreatePropertyTypeRequest {
                name: t.name.clone(),
                property_class_id: class_id,
                priority: t.priority,
                browsable: t.browsable,
            })?;
        }
        for v in &def.descriptor_values {
            let type_id = schema
                .type_by_name(&v.property_type)
                .map(|t| t.id)
                .ok_or_else(|| Error::PropertyTypeNotFound(v.property_type.clone()))?;
            schema.create_descriptor_value(CreateDescriptorValueRequest {
                property_type_id: type_id,
                value: v.value.clone(),
                priority: v.priority,
            })?;
        }
        Ok(schema)
    }
}

// =============================================================================
// DEFINITION FORMAT
// =============================================================================

/// Name-keyed schema description, as written in catalog files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    #[serde(default)]
    pub descriptor_values: Vec<DescriptorValueDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    pub range: String,
    #[serde(default)]
    pub multivalued: Option<bool>,
    #[serde(default)]
    pub optional: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    /// Owning class, by name
    pub class: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub browsable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorValueDefinition {
    /// Owning property type, by name
    #[serde(rename = "type")]
    pub property_type: String,
    pub value: String,
    #[serde(default)]
    pub priority: i32,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{RANGE_DATE, RANGE_DESCRIPTOR_VALUE, RANGE_STRING};
    use crate::range::VALUE_FIELD;

    fn class_req(name: &str, range: &str, multivalued: bool, optional: bool) -> CreatePropertyClassRequest {
        CreatePropertyClassRequest {
            name: name.to_string(),
            range: range.to_string(),
            multivalued: Some(multivalued),
            optional: Some(optional),
        }
    }

    fn type_req(name: &str, class_id: Uuid, priority: i32) -> CreatePropertyTypeRequest {
        CreatePropertyTypeRequest {
            name: name.to_string(),
            property_class_id: class_id,
            priority,
            browsable: true,
        }
    }

    #[test]
    fn test_create_class_with_valid_attributes() {
        let mut schema = Schema::new();
        let class = schema
            .create_class(class_req("some property name", RANGE_STRING, true, false))
            .unwrap();
        assert_eq!(class.range, "string");
        assert!(class.multivalued);
        assert!(!class.optional);
    }

    #[test]
    fn test_create_class_requires_name() {
        let mut schema = Schema::new();
        let err = schema
            .create_class(class_req("  ", RANGE_STRING, true, false))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_create_class_requires_flags() {
        let mut schema = Schema::new();
        let mut req = class_req("a", RANGE_STRING, true, false);
        req.multivalued = None;
        assert!(schema.create_class(req).is_err());

        let mut req = class_req("b", RANGE_STRING, true, false);
        req.optional = None;
        assert!(schema.create_class(req).is_err());
        assert!(schema.classes().is_empty());
    }

    #[test]
    fn test_create_class_requires_registered_range() {
        let mut schema = Schema::new();
        let err = schema
            .create_class(class_req("a", "nothing_good", true, false))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("nothing_good")));
    }

    #[test]
    fn test_create_class_rejects_duplicate_name() {
        let mut schema = Schema::new();
        schema.create_class(class_req("Roles", RANGE_STRING, true, true)).unwrap();
        assert!(schema.create_class(class_req("Roles", RANGE_DATE, true, true)).is_err());
    }

    #[test]
    fn test_create_type_requires_existing_class() {
        let mut schema = Schema::new();
        let err = schema.create_type(type_req("Producer", new_v7(), 0)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_build_property_string() {
        let mut schema = Schema::new();
        let roles = schema.create_class(class_req("Roles", RANGE_STRING, true, true)).unwrap();
        let producer = schema.create_type(type_req("Producer", roles.id, 0)).unwrap();

        let p = schema.build_property("Producer", "Frank Capra").unwrap();
        assert!(p.is_valid());
        assert_eq!(p.property_type_id, producer.id);
        assert_eq!(p.string_value, "Frank Capra");
        assert_eq!(schema.display(&p).unwrap(), "Frank Capra");
        assert_eq!(schema.field_of(&producer).unwrap(), ValueField::StringValue);
    }

    #[test]
    fn test_build_property_collects_value_errors() {
        let mut schema = Schema::new();
        let dates = schema.create_class(class_req("Date Types", RANGE_DATE, true, true)).unwrap();
        schema.create_type(type_req("Broadcast", dates.id, 0)).unwrap();

        let p = schema.build_property("Broadcast", "12/52/2005").unwrap();
        assert!(!p.is_valid());
        assert_eq!(p.errors.on(VALUE_FIELD).len(), 1);
        assert_eq!(p.date_value, crate::defaults::NIL_DATE);
        assert_eq!(schema.display(&p).unwrap(), "");

        let blank = schema.build_property("Broadcast", "").unwrap();
        assert_eq!(blank.errors.on(VALUE_FIELD), ["cannot be blank"]);
    }

    #[test]
    fn test_build_property_unknown_type() {
        let schema = Schema::new();
        let err = schema.build_property("Nope", "x").unwrap_err();
        assert!(matches!(err, Error::PropertyTypeNotFound(ref n) if n == "Nope"));
    }

    #[test]
    fn test_revalue_property_resets_previous_state() {
        let mut schema = Schema::new();
        let dates = schema.create_class(class_req("Date Types", RANGE_DATE, true, true)).unwrap();
        schema.create_type(type_req("Broadcast", dates.id, 0)).unwrap();

        let mut p = schema.build_property("Broadcast", "bogus").unwrap();
        assert!(!p.is_valid());
        schema.revalue_property(&mut p, "10/25/2005").unwrap();
        assert!(p.is_valid());
        assert_eq!(schema.display(&p).unwrap(), "2005-10-25");
    }

    #[test]
    fn test_dangling_class_is_configuration_error() {
        let schema = Schema::from_parts(
            RangeRegistry::builtin(),
            vec![],
            vec![PropertyType {
                id: new_v7(),
                name: "orphan".to_string(),
                property_class_id: None,
                priority: 0,
                browsable: true,
                created_at: Utc::now(),
            }],
            vec![],
        );
        let pt = schema.type_by_name("orphan").unwrap();
        let mut errors = Errors::new();
        assert!(matches!(
            schema.validate_value(pt, "x", &mut errors),
            Err(Error::NoPropertyClass(_))
        ));
        assert!(matches!(schema.translate_value(pt, "x"), Err(Error::NoPropertyClass(_))));
        assert!(matches!(schema.field_of(pt), Err(Error::NoPropertyClass(_))));
        assert!(matches!(schema.values(pt), Err(Error::NoPropertyClass(_))));
        assert!(matches!(
            schema.build_property("orphan", "x"),
            Err(Error::NoPropertyClass(_))
        ));
    }

    #[test]
    fn test_unregistered_range_is_configuration_error() {
        let class = PropertyClass {
            id: new_v7(),
            name: "Colors".to_string(),
            range: "color".to_string(),
            multivalued: true,
            optional: true,
            created_at: Utc::now(),
        };
        let pt = PropertyType {
            id: new_v7(),
            name: "Tint".to_string(),
            property_class_id: Some(class.id),
            priority: 0,
            browsable: true,
            created_at: Utc::now(),
        };
        let schema = Schema::from_parts(RangeRegistry::builtin(), vec![class], vec![pt], vec![]);
        let err = schema.build_property("Tint", "red").unwrap_err();
        assert!(matches!(err, Error::NoRangeType(ref r) if r == "color"));
    }

    #[test]
    fn test_descriptor_values_only_for_descriptor_types() {
        let mut schema = Schema::new();
        let roles = schema.create_class(class_req("Roles", RANGE_STRING, true, true)).unwrap();
        let genres = schema
            .create_class(class_req("Optional Singular Descriptor", RANGE_DESCRIPTOR_VALUE, false, true))
            .unwrap();
        let producer = schema.create_type(type_req("Producer", roles.id, 0)).unwrap();
        let genre = schema.create_type(type_req("Genre", genres.id, 0)).unwrap();
        schema
            .create_descriptor_value(CreateDescriptorValueRequest {
                property_type_id: genre.id,
                value: "Drama".into(),
                priority: 2,
            })
            .unwrap();
        schema
            .create_descriptor_value(CreateDescriptorValueRequest {
                property_type_id: genre.id,
                value: "Documentary".into(),
                priority: 1,
            })
            .unwrap();

        let values = schema.descriptor_values(&genre).unwrap();
        let texts: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(texts, vec!["Documentary", "Drama"]);

        let err = schema.descriptor_values(&producer).unwrap_err();
        assert!(matches!(err, Error::NotDescriptorType(ref n) if n == "Producer"));
        assert!(schema.values(&producer).unwrap().is_empty());
        assert_eq!(schema.values(&genre).unwrap().len(), 2);

        let err = schema
            .create_descriptor_value(CreateDescriptorValueRequest {
                property_type_id: producer.id,
                value: "x".into(),
                priority: 0,
            })
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_descriptor_value_rejects_duplicate_text() {
        let mut schema = Schema::new();
        let genres = schema
            .create_class(class_req("Optional Multivalued Descriptor", RANGE_DESCRIPTOR_VALUE, true, true))
            .unwrap();
        let genre = schema.create_type(type_req("Genre", genres.id, 0)).unwrap();
        let req = CreateDescriptorValueRequest {
            property_type_id: genre.id,
            value: "Drama".into(),
            priority: 0,
        };
        schema.create_descriptor_value(req.clone()).unwrap();
        assert!(schema.create_descriptor_value(req).is_err());
    }

    #[test]
    fn test_browse_orders_by_priority_then_name() {
        let mut schema = Schema::new();
        let class = schema
            .create_class(class_req("Descriptors", RANGE_DESCRIPTOR_VALUE, true, true))
            .unwrap();
        for (name, priority) in [("a", 2), ("b", 1), ("c", 3), ("d", 4)] {
            schema.create_type(type_req(name, class.id, priority)).unwrap();
        }

        let names: Vec<&str> = schema.browse_all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);

        let names: Vec<&str> = schema
            .descriptor_types()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);

        let mut visited = Vec::new();
        schema.for_each_browsable(|t| visited.push(t.name.clone()));
        assert_eq!(visited, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_browse_skips_unbrowsable_and_ties_break_by_name() {
        let mut schema = Schema::new();
        let roles = schema.create_class(class_req("Roles", RANGE_STRING, true, true)).unwrap();
        schema.create_type(type_req("Writer", roles.id, 1)).unwrap();
        schema.create_type(type_req("Director", roles.id, 1)).unwrap();
        schema
            .create_type(CreatePropertyTypeRequest {
                name: "Internal".into(),
                property_class_id: roles.id,
                priority: 0,
                browsable: false,
            })
            .unwrap();

        let names: Vec<&str> = schema.browse_all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Director", "Writer"]);
        // Only descriptor-ranged classes count
        assert!(schema.descriptor_types().is_empty());
    }

    #[test]
    fn test_simple_classes_excludes_descriptor_classes() {
        let mut schema = Schema::new();
        schema.create_class(class_req("Roles", RANGE_STRING, true, true)).unwrap();
        schema.create_class(class_req("Date Types", RANGE_DATE, true, true)).unwrap();
        schema
            .create_class(class_req("Mandatory Singular Descriptor", RANGE_DESCRIPTOR_VALUE, false, false))
            .unwrap();
        let names: Vec<&str> = schema.simple_classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Date Types", "Roles"]);
    }

    #[test]
    fn test_retrieve_priority() {
        let mut schema = Schema::new();
        let genres = schema
            .create_class(class_req("Optional Multivalued Descriptor", RANGE_DESCRIPTOR_VALUE, true, true))
            .unwrap();
        let genre = schema.create_type(type_req("Genre", genres.id, 0)).unwrap();
        schema
            .create_descriptor_value(CreateDescriptorValueRequest {
                property_type_id: genre.id,
                value: "Comedy".into(),
                priority: 7,
            })
            .unwrap();
        let p = schema.build_property("Genre", "Comedy").unwrap();
        assert_eq!(schema.retrieve_priority(&genre, &p).unwrap(), 7);
    }

    #[test]
    fn test_from_definition_yaml() {
        let yaml = r#"
classes:
  - { name: Roles, range: string, multivalued: true, optional: true }
  - { name: Optional Singular Descriptor, range: descriptor_value, multivalued: false, optional: true }
types:
  - { name: Producer, class: Roles, priority: 2 }
  - { name: Genre, class: Optional Singular Descriptor, priority: 1 }
descriptor_values:
  - { type: Genre, value: Documentary }
"#;
        let def: SchemaDefinition = serde_yaml::from_str(yaml).unwrap();
        let schema = Schema::from_definition(&def, RangeRegistry::builtin()).unwrap();
        assert_eq!(schema.classes().len(), 2);
        assert_eq!(schema.types().len(), 2);
        assert_eq!(schema.vocabulary().len(), 1);
        assert!(schema.type_by_name("Producer").unwrap().browsable);
    }

    #[test]
    fn test_from_definition_unknown_class() {
        let def = SchemaDefinition {
            types: vec![TypeDefinition {
                name: "Producer".into(),
                class: "Missing".into(),
                priority: 0,
                browsable: true,
            }],
            ..Default::default()
        };
        assert!(Schema::from_definition(&def, RangeRegistry::builtin()).is_err());
    }
}
