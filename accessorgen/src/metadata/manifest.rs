//! File-backed metadata exported from the ORM.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnnotationReader, MetadataProvider};
use crate::errors::{GenerateError, GenerateResult};
use crate::types::{AccessorSettings, ClassDescriptor};

/// One accessor-settings annotation attached to `class` for `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEntry {
    pub class: String,
    pub field: String,
    #[serde(flatten)]
    pub settings: AccessorSettings,
}

/// Class metadata and accessor annotations, as exported by the ORM.
///
/// TOML layout:
///
/// ```toml
/// [[class]]
/// name = "App\\Entity\\Group"
/// generator = "auto"
///
/// [[class.fields]]
/// name = "users"
/// mapping = "association"
/// kind = "many-to-many"
/// target_entity = "App\\Entity\\User"
///
/// [[annotation]]
/// class = "App\\Entity\\Group"
/// field = "users"
/// other_side = "groups"
///
/// [[override]]
/// class = "App\\Entity\\Team"
/// field = "users"
/// visibility = "read-only"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassDescriptor>,
    /// Property annotations, keyed by the declaring class.
    #[serde(default, rename = "annotation")]
    pub annotations: Vec<AnnotationEntry>,
    /// Class-level annotations overriding inherited properties.
    #[serde(default, rename = "override")]
    pub overrides: Vec<AnnotationEntry>,
}

impl Manifest {
    /// Load a manifest; `.json` files are read as JSON, anything else as TOML.
    pub fn from_path(path: &Path) -> GenerateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| GenerateError::io(path, source))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            serde_json::from_str(&content).map_err(|err| err.to_string())
        } else {
            toml::from_str(&content).map_err(|err| err.to_string())
        };

        parsed.map_err(|message| GenerateError::Manifest {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn annotate(mut self, class: impl Into<String>, field: impl Into<String>, settings: AccessorSettings) -> Self {
        self.annotations.push(AnnotationEntry {
            class: class.into(),
            field: field.into(),
            settings,
        });
        self
    }

    pub fn override_field(
        mut self,
        class: impl Into<String>,
        field: impl Into<String>,
        settings: AccessorSettings,
    ) -> Self {
        self.overrides.push(AnnotationEntry {
            class: class.into(),
            field: field.into(),
            settings,
        });
        self
    }
}

fn matching(entries: &[AnnotationEntry], class: &str, field: &str) -> Vec<AccessorSettings> {
    entries
        .iter()
        .filter(|entry| entry.class == class && entry.field == field)
        .map(|entry| entry.settings.clone())
        .collect()
}

impl MetadataProvider for Manifest {
    fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }
}

impl AnnotationReader for Manifest {
    fn field_settings(&self, class: &str, field: &str) -> Vec<AccessorSettings> {
        matching(&self.annotations, class, field)
    }

    fn class_field_settings(&self, class: &str, field: &str) -> Vec<AccessorSettings> {
        matching(&self.overrides, class, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IdGenerator, Visibility};

    const MANIFEST: &str = r#"
[[class]]
name = "App\\Entity\\Group"
generator = "auto"

[[class.fields]]
name = "id"
id = true
mapping = "field"
type = "integer"

[[class.fields]]
name = "users"
mapping = "association"
kind = "many-to-many"
target_entity = "App\\Entity\\User"

[[annotation]]
class = "App\\Entity\\Group"
field = "users"
singular = "user"
other_side = "groups"

[[annotation]]
class = "App\\Entity\\Group"
field = "users"
visibility = "public"

[[override]]
class = "App\\Entity\\Team"
field = "users"
visibility = "read-only"
"#;

    #[test]
    fn test_parse_toml_manifest() {
        let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
        assert_eq!(manifest.classes.len(), 1);

        let group = manifest.class("App\\Entity\\Group").unwrap();
        assert_eq!(group.generator, IdGenerator::Auto);
        assert_eq!(group.fields.len(), 2);
        assert!(group.fields[0].id);
        assert!(group.fields[1].is_to_many());
    }

    #[test]
    fn test_select_through_provider() {
        let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
        let provider: &dyn MetadataProvider = &manifest;

        assert_eq!(provider.select(Some("Group")).len(), 1);
        assert_eq!(provider.select(Some("App/Entity")).len(), 1);
        assert!(provider.select(Some("Team")).is_empty());
        assert!(provider.class("App\\Entity\\Team").is_none());
    }

    #[test]
    fn test_annotations_returned_in_order() {
        let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
        let settings = manifest.field_settings("App\\Entity\\Group", "users");
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].other_side.as_deref(), Some("groups"));
        assert_eq!(settings[1].visibility, Some(Visibility::Public));

        let overrides = manifest.class_field_settings("App\\Entity\\Team", "users");
        assert_eq!(overrides[0].visibility, Some(Visibility::ReadOnly));
        assert!(manifest.class_field_settings("App\\Entity\\Group", "users").is_empty());
    }

    #[test]
    fn test_from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[[class]]\nname = 3\n").unwrap();

        let err = Manifest::from_path(&path).unwrap_err();
        assert!(matches!(err, GenerateError::Manifest { .. }));
    }

    #[test]
    fn test_from_path_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{"class": [{"name": "App\\Entity\\Tag", "fields": [{"name": "label", "mapping": "field", "type": "string"}]}]}"#,
        )
        .unwrap();

        let manifest = Manifest::from_path(&path).unwrap();
        assert_eq!(manifest.classes[0].short_name(), "Tag");
        assert_eq!(manifest.classes[0].fields[0].type_name(), "string");
    }
}
