use serde::{Deserialize, Serialize};

/// Options for one generation run. Not persisted between runs except through
/// the project configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Copy each host file before it is modified.
    #[serde(default = "default_backup_existing")]
    pub backup_existing: bool,
    /// Suffix appended to a host file's name for its backup copy.
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    /// Extension of host and generated files, including the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Spaces per indentation level in generated code.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Sub-namespace, relative to each class's namespace, holding generated traits.
    #[serde(default = "default_accessors_namespace")]
    pub accessors_namespace: String,
    /// Namespace of the bidirectional-sync runtime trait.
    #[serde(default = "default_runtime_namespace")]
    pub runtime_namespace: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            backup_existing: default_backup_existing(),
            backup_suffix: default_backup_suffix(),
            extension: default_extension(),
            indent_width: default_indent_width(),
            accessors_namespace: default_accessors_namespace(),
            runtime_namespace: default_runtime_namespace(),
        }
    }
}

impl GeneratorSettings {
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

fn default_backup_existing() -> bool {
    true
}

fn default_backup_suffix() -> String {
    "~".to_string()
}

fn default_extension() -> String {
    ".php".to_string()
}

fn default_indent_width() -> usize {
    4
}

fn default_accessors_namespace() -> String {
    "AutomaticAccessors".to_string()
}

fn default_runtime_namespace() -> String {
    "Accessorgen\\Traits".to_string()
}
