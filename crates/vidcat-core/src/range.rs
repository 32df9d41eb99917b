//! Range-type registry.
//!
//! A range type is the primitive kind of value a property type holds. Each
//! one knows how to validate a raw submitted string, translate it into a
//! typed column value, and read that column back as display text. The
//! registry maps range names to implementations; adding a range type means
//! registering one more [`RangeType`], with no change to the validators.
//!
//! # Built-in range types
//!
//! | name | validate | translate | retrieve |
//! |------|----------|-----------|----------|
//! | `string` | non-blank | raw string | stored string |
//! | `date` | non-blank, parseable | calendar date | `YYYY-MM-DD`, or "" at the sentinel |
//! | `descriptor_value` | non-blank, known vocabulary entry | descriptor value id | the entry's text |

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::defaults::{
    DATE_FORMATS, DATE_MAX_YEAR, DATE_MIN_YEAR, NIL_DATE, RANGE_DATE, RANGE_DESCRIPTOR_VALUE,
    RANGE_STRING,
};
use crate::error::{Error, Result};
use crate::models::{Errors, Property, PropertyType, TypedValue, ValueField};
use crate::vocabulary::Vocabulary;

/// Field name value errors are recorded under.
pub const VALUE_FIELD: &str = "value";

/// Everything a range type may consult while handling one raw value.
#[derive(Debug, Clone, Copy)]
pub struct RangeInput<'a> {
    pub raw: &'a str,
    pub property_type: &'a PropertyType,
    pub vocabulary: &'a Vocabulary,
}

/// Capability interface implemented by every range type.
pub trait RangeType: Send + Sync + std::fmt::Debug {
    /// Registry key, e.g. "date".
    fn name(&self) -> &str;

    /// The property column this range stores into.
    fn field(&self) -> ValueField;

    /// Check a raw value, recording failures in `errors`.
    fn validate(&self, input: &RangeInput<'_>, errors: &mut Errors) -> bool;

    /// Convert a raw value that has passed [`RangeType::validate`].
    fn translate(&self, input: &RangeInput<'_>) -> Result<TypedValue>;

    /// Display text for a stored property; "" when the column holds its sentinel.
    fn retrieve(&self, property: &Property, vocabulary: &Vocabulary) -> String;

    /// Ordering weight for a stored property.
    fn retrieve_priority(&self, _property: &Property, _vocabulary: &Vocabulary) -> i32 {
        0
    }

    /// Fill every typed column with its sentinel.
    fn defaultize(&self, property: &mut Property) {
        property.defaultize();
    }
}

/// Shared first check for every range type.
pub fn validate_not_blank(raw: &str, errors: &mut Errors) -> bool {
    if raw.trim().is_empty() {
        errors.add(VALUE_FIELD, "cannot be blank");
        return false;
    }
    true
}

/// Parse a calendar date in any of the accepted formats.
///
/// Years outside `DATE_MIN_YEAR..=DATE_MAX_YEAR` are rejected. On failure
/// the message describes the most specific parser complaint, e.g. an
/// out-of-range day rather than a format mismatch.
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    use chrono::format::ParseErrorKind;

    let input = raw.trim();
    let mut specific = None;
    let mut fallback = None;
    for fmt in DATE_FORMATS {
        match NaiveDate::parse_from_str(input, fmt) {
            Ok(date) if (DATE_MIN_YEAR..=DATE_MAX_YEAR).contains(&date.year()) => {
                return Ok(date)
            }
            Ok(date) => {
                return Err(format!(
                    "invalid date: year {} is outside {}-{}",
                    date.year(),
                    DATE_MIN_YEAR,
                    DATE_MAX_YEAR
                ))
            }
            Err(e) => match e.kind() {
                ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => {
                    specific.get_or_insert(e);
                }
                _ => {
                    fallback.get_or_insert(e);
                }
            },
        }
    }
    match specific.or(fallback) {
        Some(e) => Err(format!("invalid date: {}", e)),
        None => Err("invalid date".to_string()),
    }
}

// =============================================================================
// BUILT-IN RANGE TYPES
// =============================================================================

/// Free text, stored verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringRange;

impl RangeType for StringRange {
    fn name(&self) -> &str {
        RANGE_STRING
    }

    fn field(&self) -> ValueField {
        ValueField::StringValue
    }

    fn validate(&self, input: &RangeInput<'_>, errors: &mut Errors) -> bool {
        validate_not_blank(input.raw, errors)
    }

    fn translate(&self, input: &RangeInput<'_>) -> Result<TypedValue> {
        Ok(TypedValue::String(input.raw.to_string()))
    }

    fn retrieve(&self, property: &Property, _vocabulary: &Vocabulary) -> String {
        property.string_value.clone()
    }
}

/// Calendar dates, rendered as ISO `YYYY-MM-DD`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateRange;

impl RangeType for DateRange {
    fn name(&self) -> &str {
        RANGE_DATE
    }

    fn field(&self) -> ValueField {
        ValueField::DateValue
    }

    fn validate(&self, input: &RangeInput<'_>, errors: &mut Errors) -> bool {
        if !validate_not_blank(input.raw, errors) {
            return false;
        }
        match parse_date(input.raw) {
            Ok(_) => true,
            Err(message) => {
                errors.add(VALUE_FIELD, message);
                false
            }
        }
    }

    fn translate(&self, input: &RangeInput<'_>) -> Result<TypedValue> {
        parse_date(input.raw)
            .map(TypedValue::Date)
            .map_err(Error::InvalidInput)
    }

    fn retrieve(&self, property: &Property, _vocabulary: &Vocabulary) -> String {
        if property.date_value == NIL_DATE {
            String::new()
        } else {
            property.date_value.format("%Y-%m-%d").to_string()
        }
    }
}

/// References into the controlled vocabulary of the property's own type.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorValueRange;

impl RangeType for DescriptorValueRange {
    fn name(&self) -> &str {
        RANGE_DESCRIPTOR_VALUE
    }

    fn field(&self) -> ValueField {
        ValueField::DescriptorValueId
    }

    fn validate(&self, input: &RangeInput<'_>, errors: &mut Errors) -> bool {
        if !validate_not_blank(input.raw, errors) {
            return false;
        }
        if input
            .vocabulary
            .resolve(input.property_type.id, input.raw)
            .is_none()
        {
            errors.add(
                VALUE_FIELD,
                format!(
                    "is not a known {} value: {}",
                    input.property_type.name,
                    input.raw.trim()
                ),
            );
            return false;
        }
        true
    }

    fn translate(&self, input: &RangeInput<'_>) -> Result<TypedValue> {
        input
            .vocabulary
            .resolve(input.property_type.id, input.raw)
            .map(|dv| TypedValue::Descriptor(dv.id))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "descriptor value {} for {}",
                    input.raw.trim(),
                    input.property_type.name
                ))
            })
    }

    fn retrieve(&self, property: &Property, vocabulary: &Vocabulary) -> String {
        vocabulary
            .get(property.descriptor_value_id)
            .map(|dv| dv.value.clone())
            .unwrap_or_default()
    }

    fn retrieve_priority(&self, property: &Property, vocabulary: &Vocabulary) -> i32 {
        vocabulary
            .get(property.descriptor_value_id)
            .map(|dv| dv.priority)
            .unwrap_or(0)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Range name → implementation table.
#[derive(Debug, Clone)]
pub struct RangeRegistry {
    ranges: BTreeMap<String, Arc<dyn RangeType>>,
}

impl RangeRegistry {
    /// A registry with no range types.
    pub fn empty() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    /// A registry holding the built-in range types.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(StringRange));
        registry.register(Arc::new(DateRange));
        registry.register(Arc::new(DescriptorValueRange));
        registry
    }

    /// Add or replace a range type, returning the one it displaced.
    pub fn register(&mut self, range: Arc<dyn RangeType>) -> Option<Arc<dyn RangeType>> {
        self.ranges.insert(range.name().to_string(), range)
    }

    /// Find the implementation for `name`.
    pub fn lookup(&self, name: &str) -> Result<&dyn RangeType> {
        self.ranges
            .get(name)
            .map(|r| r.as_ref())
            .ok_or_else(|| Error::NoRangeType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ranges.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }
}

impl Default for RangeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
