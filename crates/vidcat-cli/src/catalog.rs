//! Catalog files: a schema definition plus the videos to load into it.
//!
//! ```yaml
//! schema:
//!   classes:
//!     - { name: Role, range: string, multivalued: true, optional: true }
//!   types:
//!     - { name: Producer, class: Role }
//! videos:
//!   - title: Nanook of the North
//!     sentence: Life in the Arctic.
//!     duration: "01:18:00"
//!     properties:
//!       - { type: Producer, value: Robert Flaherty }
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

use vidcat_core::{
    apply_change, CreateVideoRequest, Error, Errors, PropertyEdit, RangeRegistry, Schema,
    SchemaDefinition, Video, VideoChange,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub schema: SchemaDefinition,
    #[serde(default)]
    pub videos: Vec<VideoEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEntry {
    pub title: String,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `HH:MM:SS`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub properties: Vec<ValueEntry>,
    /// Controlled-vocabulary values to attach
    #[serde(default)]
    pub descriptors: Vec<ValueEntry>,
}

/// A (property type name, raw value) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueEntry {
    #[serde(rename = "type")]
    pub property_type: String,
    pub value: String,
}

impl CatalogFile {
    /// Load a catalog, choosing the format by file extension.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> anyhow::Result<Self> = match ext.as_deref() {
            Some("json") => Self::from_json,
            Some("yaml") | Some("yml") => Self::from_yaml,
            _ => bail!("unsupported catalog format: {}", path.display()),
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        parse(&text)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("parsing YAML catalog")
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("parsing JSON catalog")
    }

    /// Build the schema the catalog defines.
    pub fn build_schema(&self) -> vidcat_core::Result<Schema> {
        Schema::from_definition(&self.schema, RangeRegistry::builtin())
    }
}

impl VideoEntry {
    /// Build an unsaved video through the edit-form pipeline.
    ///
    /// Returns the video and any form errors (such as an unreadable
    /// duration) that would block saving it.
    pub fn to_video(&self, schema: &Schema) -> vidcat_core::Result<(Video, Errors)> {
        let mut video = Video::new(CreateVideoRequest {
            title: self.title.clone(),
            sentence: self.sentence.clone(),
            description: self.description.clone(),
            duration: None,
        });

        let mut change = VideoChange {
            duration: self.duration.clone(),
            ..Default::default()
        };
        for (i, entry) in self.properties.iter().enumerate() {
            change.properties.insert(
                format!("new_{}", i),
                PropertyEdit::new(&entry.property_type, &entry.value),
            );
        }
        if !self.descriptors.is_empty() {
            let mut ids = Vec::with_capacity(self.descriptors.len());
            for entry in &self.descriptors {
                let pt = schema
                    .type_by_name(&entry.property_type)
                    .ok_or_else(|| Error::PropertyTypeNotFound(entry.property_type.clone()))?;
                schema.descriptor_values(pt)?;
                let dv = schema
                    .vocabulary()
                    .resolve(pt.id, &entry.value)
                    .ok_or_else(|| {
                        Error::NotFound(format!("{} value {}", entry.property_type, entry.value))
                    })?;
                ids.push(dv.id);
            }
            change.descriptor_value_ids = Some(ids);
        }

        let errors = apply_change(schema, &mut video, &change)?;
        Ok((video, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
schema:
  classes:
    - { name: Role, range: string, multivalued: true, optional: true }
    - { name: Date Type, range: date, multivalued: true, optional: true }
    - { name: Optional Singular Descriptor, range: descriptor_value, multivalued: false, optional: true }
  types:
    - { name: Genre, class: Optional Singular Descriptor, priority: 1 }
    - { name: Producer, class: Role, priority: 2 }
    - { name: Broadcast, class: Date Type, priority: 3 }
  descriptor_values:
    - { type: Genre, value: Documentary }
    - { type: Genre, value: Drama }
videos:
  - title: Nanook of the North
    sentence: Life in the Arctic.
    duration: "01:18:00"
    properties:
      - { type: Producer, value: Robert Flaherty }
      - { type: Broadcast, value: "June 11, 1922" }
    descriptors:
      - { type: Genre, value: documentary }
  - title: Untitled
    duration: soon
"#;

    #[test]
    fn test_yaml_catalog_builds_videos() {
        let catalog = CatalogFile::from_yaml(CATALOG).unwrap();
        let schema = catalog.build_schema().unwrap();
        assert_eq!(catalog.videos.len(), 2);

        let (mut video, errors) = catalog.videos[0].to_video(&schema).unwrap();
        assert!(errors.is_empty());
        assert_eq!(video.properties.len(), 2);
        assert_eq!(video.duration, Some(4680));
        assert_eq!(video.descriptor_value_ids.len(), 1);
        assert!(video.validate(&schema));
    }

    #[test]
    fn test_bad_duration_is_a_form_error() {
        let catalog = CatalogFile::from_yaml(CATALOG).unwrap();
        let schema = catalog.build_schema().unwrap();
        let (mut video, errors) = catalog.videos[1].to_video(&schema).unwrap();
        assert_eq!(errors.on("duration").len(), 1);
        assert!(!video.validate(&schema));
    }

    #[test]
    fn test_descriptor_on_plain_type_is_configuration_error() {
        let catalog = CatalogFile::from_yaml(CATALOG).unwrap();
        let schema = catalog.build_schema().unwrap();
        let mut entry = catalog.videos[0].clone();
        entry.descriptors = vec![ValueEntry {
            property_type: "Producer".to_string(),
            value: "Robert Flaherty".to_string(),
        }];
        let err = entry.to_video(&schema).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_json_catalog() {
        let json = r#"{
            "schema": { "classes": [ { "name": "Role", "range": "string", "multivalued": true, "optional": false } ],
                        "types": [ { "name": "Producer", "class": "Role" } ] },
            "videos": [ { "title": "Grass", "sentence": "A migration." } ]
        }"#;
        let catalog = CatalogFile::from_json(json).unwrap();
        let schema = catalog.build_schema().unwrap();
        let (mut video, _) = catalog.videos[0].to_video(&schema).unwrap();
        assert!(!video.validate(&schema));
        assert_eq!(video.errors.base(), ["property Producer required"]);
    }

    #[test]
    fn test_unknown_extension() {
        let path = std::env::temp_dir().join(format!("vidcat-catalog-{}.txt", std::process::id()));
        std::fs::write(&path, CATALOG).unwrap();
        let err = CatalogFile::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("unsupported catalog format"));
    }

    #[test]
    fn test_load_yaml_file() {
        let path = std::env::temp_dir().join(format!("vidcat-catalog-{}.yml", std::process::id()));
        std::fs::write(&path, CATALOG).unwrap();
        let catalog = CatalogFile::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog.unwrap().videos.len(), 2);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CatalogFile::load(Path::new("no-such-catalog.yaml")).unwrap_err();
        assert!(err.to_string().starts_with("reading catalog"));
    }

    #[test]
    fn test_properties_keep_catalog_order() {
        let catalog = CatalogFile::from_yaml(CATALOG).unwrap();
        let schema = catalog.build_schema().unwrap();
        let mut entry = catalog.videos[0].clone();
        entry.properties = (0..12)
            .map(|i| ValueEntry {
                property_type: "Producer".to_string(),
                value: format!("p{}", i),
            })
            .collect();
        let (video, _) = entry.to_video(&schema).unwrap();
        let values: Vec<&str> = video.properties.iter().map(|p| p.value.as_str()).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("p{}", i)).collect();
        assert_eq!(values, expected);
    }
}
