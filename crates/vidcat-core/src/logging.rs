//! Structured logging field name constants for vidcat.
//!
//! Every crate uses these names for its structured logging fields, written
//! literally at the event site (`video_id = %id`).
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Broken schema (unregistered range, dangling class reference) |
//! | WARN  | Suspicious data tolerated on load, malformed change-set keys |
//! | INFO  | Lifecycle events, accepted and rejected saves |
//! | DEBUG | Decision points in the property pipeline |
//! | TRACE | Per-property iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "core", "db", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "build_property", "save", "apply_change"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Video UUID being operated on.
pub const VIDEO_ID: &str = "video_id";

/// Property type (slot) name.
pub const PROPERTY_TYPE: &str = "property_type";

/// Property class name.
pub const PROPERTY_CLASS: &str = "property_class";

/// Range type name.
pub const RANGE: &str = "range";

/// Descriptor value UUID.
pub const DESCRIPTOR_VALUE_ID: &str = "descriptor_value_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of cardinality or value violations found.
pub const VIOLATION_COUNT: &str = "violation_count";

/// Number of properties examined or changed.
pub const PROPERTY_COUNT: &str = "property_count";

/// Number of results returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_unique_snake_case() {
        let names = [
            SUBSYSTEM,
            OPERATION,
            VIDEO_ID,
            PROPERTY_TYPE,
            PROPERTY_CLASS,
            RANGE,
            DESCRIPTOR_VALUE_ID,
            VIOLATION_COUNT,
            PROPERTY_COUNT,
            RESULT_COUNT,
            SUCCESS,
            ERROR_MSG,
        ];
        let mut seen = std::collections::HashSet::new();
        for name in names {
            assert!(seen.insert(name), "duplicate field {}", name);
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
