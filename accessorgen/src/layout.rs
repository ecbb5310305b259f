//! Where host classes and their generated traits live on disk.

use std::path::{Path, PathBuf};

use crate::config::GeneratorSettings;
use crate::types::short_name;

/// Maps fully-qualified class names to files below a source root, one class
/// per file with namespace segments as directories.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    root: PathBuf,
    extension: String,
    accessors_namespace: String,
    backup_suffix: String,
    indent: String,
}

impl SourceLayout {
    pub fn new(root: impl Into<PathBuf>, settings: &GeneratorSettings) -> Self {
        Self {
            root: root.into(),
            extension: settings.extension.clone(),
            accessors_namespace: settings.accessors_namespace.clone(),
            backup_suffix: settings.backup_suffix.clone(),
            indent: settings.indent(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, fqcn: &str) -> PathBuf {
        let mut path = self.root.clone();
        let mut parts = fqcn.trim_start_matches('\\').split('\\').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                path.push(part);
            } else {
                path.push(format!("{part}{}", self.extension));
            }
        }
        path
    }

    /// Source file declaring `class`.
    pub fn host_path(&self, class: &str) -> PathBuf {
        self.path_for(class)
    }

    /// Namespace of the generated trait for `class`.
    pub fn artifact_namespace(&self, class: &str) -> String {
        match class.rsplit_once('\\') {
            Some((namespace, _)) => format!("{namespace}\\{}", self.accessors_namespace),
            None => self.accessors_namespace.clone(),
        }
    }

    /// Fully-qualified name of the generated trait for `class`.
    pub fn artifact_name(&self, class: &str) -> String {
        format!("{}\\{}", self.artifact_namespace(class), short_name(class))
    }

    pub fn artifact_path(&self, class: &str) -> PathBuf {
        self.path_for(&self.artifact_name(class))
    }

    /// Statement attaching the generated trait to the host class body.
    pub fn marker(&self, class: &str) -> String {
        format!("\n{}use \\{};\n", self.indent, self.artifact_name(class))
    }

    pub fn backup_path(&self, host: &Path) -> PathBuf {
        let mut name = host.file_name().unwrap_or_default().to_os_string();
        name.push(&self.backup_suffix);
        host.with_file_name(name)
    }

    /// Whether `path` is a backup copy rather than a source file.
    pub fn is_backup(&self, path: &Path) -> bool {
        !self.backup_suffix.is_empty() && path.to_string_lossy().ends_with(&self.backup_suffix)
    }
}
