//! Error types for vidcat.
//!
//! Only configuration-integrity, lookup, and plumbing failures are raised
//! as [`Error`]. Ordinary value and cardinality problems are collected into
//! [`crate::models::Errors`] on the record being saved.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using vidcat's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vidcat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A property class names a range type that is not registered
    #[error("No range type: {0}")]
    NoRangeType(String),

    /// A property type has no (or a dangling) property class reference
    #[error("No property class for property type: {0}")]
    NoPropertyClass(String),

    /// Descriptor values were requested for a property type whose range is not descriptor_value
    #[error("Not a descriptor type: {0}")]
    NotDescriptorType(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Video not found
    #[error("Video not found: {0}")]
    VideoNotFound(Uuid),

    /// Property type not found by name
    #[error("Property type not found: {0}")]
    PropertyTypeNotFound(String),

    /// A descriptor value is already attached to the video
    #[error("Descriptor value {descriptor_value_id} already attached to video {video_id}")]
    DuplicateDescriptor {
        video_id: Uuid,
        descriptor_value_id: Uuid,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid runtime configuration (environment, settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that indicate a broken schema rather than bad user input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::NoRangeType(_) | Error::NoPropertyClass(_) | Error::NotDescriptorType(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
