//! Centralized default constants for vidcat.
//!
//! **This module is the single source of truth** for shared default values,
//! including the sentinel values that fill untyped property columns.

use chrono::NaiveDate;

// =============================================================================
// RANGE TYPES
// =============================================================================

/// Range name for free-text properties.
pub const RANGE_STRING: &str = "string";

/// Range name for calendar-date properties.
pub const RANGE_DATE: &str = "date";

/// Range name for controlled-vocabulary properties.
pub const RANGE_DESCRIPTOR_VALUE: &str = "descriptor_value";

// =============================================================================
// SENTINELS
// =============================================================================

/// Stored in `string_value` when the property is not string-ranged.
pub const NIL_STRING: &str = "";

/// Stored in `integer_value` when the property is not integer-ranged.
pub const NIL_INTEGER: i64 = 0;

/// Stored in `date_value` when the property is not date-ranged.
///
/// The earliest representable date. Its year lies outside
/// `DATE_MIN_YEAR..=DATE_MAX_YEAR`, so no accepted input can collide with it.
pub const NIL_DATE: NaiveDate = NaiveDate::MIN;

// =============================================================================
// PAGINATION
// =============================================================================

/// Page size for video listings.
pub const PAGE_LIMIT: i64 = 20;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

/// Number of videos returned by `recent` when no count is given.
pub const RECENT_LIMIT: usize = 5;

// =============================================================================
// DATE PARSING
// =============================================================================

/// Earliest year the date range type accepts.
pub const DATE_MIN_YEAR: i32 = 1;

/// Latest year the date range type accepts.
pub const DATE_MAX_YEAR: i32 = 9999;

/// Formats accepted by the date range type, tried in order.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];
