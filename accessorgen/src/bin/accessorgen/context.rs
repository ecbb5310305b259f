use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use accessorgen::GeneratorSettings;

pub const CONFIG_FILE: &str = "accessorgen.toml";

/// Project context for accessorgen operations
pub struct ProjectContext {
    /// Directory holding accessorgen.toml, or the working directory when there is none
    pub project_root: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Option<AccessorgenConfig>,
}

/// Configuration stored in accessorgen.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessorgenConfig {
    #[serde(default)]
    pub project: ProjectSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Directory the class files live under, one file per class
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Metadata manifest exported from the ORM (TOML or JSON)
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            manifest: default_manifest(),
        }
    }
}

fn default_source_root() -> String {
    "src".to_string()
}

fn default_manifest() -> String {
    "accessors.toml".to_string()
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory.
    ///
    /// Falls back to `start` without configuration when no ancestor has an
    /// accessorgen.toml, so that every setting can come from flags.
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: AccessorgenConfig =
                toml::from_str(&content).with_context(|| format!("Failed to parse {}", config_path.display()))?;
            Some(config)
        } else {
            None
        };

        Ok(Self {
            project_root,
            config_path,
            config,
        })
    }

    fn find_project_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE).exists())
            .map(Path::to_path_buf)
    }

    /// Check if accessorgen is initialized in this project
    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    fn project_settings(&self) -> ProjectSettings {
        self.config
            .as_ref()
            .map(|config| config.project.clone())
            .unwrap_or_default()
    }

    /// Source root, from `flag` if given, else configuration, relative to the project root
    pub fn source_root(&self, flag: Option<&Path>) -> PathBuf {
        match flag {
            Some(path) => path.to_path_buf(),
            None => self.project_root.join(self.project_settings().source_root),
        }
    }

    /// Manifest path, from `flag` if given, else configuration, relative to the project root
    pub fn manifest_path(&self, flag: Option<&Path>) -> PathBuf {
        match flag {
            Some(path) => path.to_path_buf(),
            None => self.project_root.join(self.project_settings().manifest),
        }
    }

    /// Generator settings from configuration, or the defaults
    pub fn generator_settings(&self) -> GeneratorSettings {
        self.config
            .as_ref()
            .map(|config| config.generator.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccessorgenConfig::default();
        assert_eq!(config.project.source_root, "src");
        assert_eq!(config.project.manifest, "accessors.toml");
        assert_eq!(config.generator.indent_width, 4);
    }

    #[test]
    fn test_config_serialization() {
        let config = AccessorgenConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("source_root"));
        assert!(toml_str.contains("backup_existing"));

        let parsed: AccessorgenConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_find_walks_up_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nsource_root = \"lib\"\n\n[generator]\nindent_width = 2\n",
        )
        .unwrap();
        let nested = dir.path().join("lib/App");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = ProjectContext::find_from(&nested).unwrap();
        assert!(ctx.is_initialized());
        assert_eq!(ctx.project_root, dir.path());
        assert_eq!(ctx.source_root(None), dir.path().join("lib"));
        assert_eq!(ctx.manifest_path(None), dir.path().join("accessors.toml"));
        assert_eq!(ctx.generator_settings().indent(), "  ");
    }

    #[test]
    fn test_find_without_config_uses_start() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::find_from(dir.path()).unwrap();

        assert!(!ctx.is_initialized());
        assert_eq!(ctx.source_root(Some(Path::new("/srv/app"))), PathBuf::from("/srv/app"));
        assert!(ctx.generator_settings().backup_existing);
    }
}
