//! File discovery for finding class sources below a source root.

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use accessorgen::SourceLayout;

/// Discovered source file with basic metadata
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Path relative to the source root
    pub relative_path: String,
}

/// Discover all source files below `root` with the configured extension.
///
/// Backup copies and hidden files or directories are skipped.
pub fn discover_sources(root: &Path, layout: &SourceLayout, extension: &str) -> Result<Vec<DiscoveredFile>> {
    if !root.exists() {
        anyhow::bail!("Source root {} does not exist", root.display());
    }

    let mut discovered = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();

        if !entry.file_type().is_file() || layout.is_backup(path) {
            continue;
        }

        if !path.to_string_lossy().ends_with(extension) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            continue;
        }

        discovered.push(DiscoveredFile {
            path: path.to_path_buf(),
            relative_path: relative.to_string_lossy().to_string(),
        });
    }

    // Sort by relative path for consistent ordering
    discovered.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessorgen::GeneratorSettings;

    #[test]
    fn test_discover_skips_backups_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("App/.cache")).unwrap();
        for file in ["App/User.php", "App/User.php~", "App/.cache/Old.php", "App/notes.txt", "App/Group.php"] {
            std::fs::write(root.join(file), "<?php\n").unwrap();
        }

        let settings = GeneratorSettings::default();
        let layout = SourceLayout::new(root, &settings);
        let files = discover_sources(root, &layout, &settings.extension).unwrap();
        let relative: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();

        assert_eq!(relative, vec!["App/Group.php", "App/User.php"]);
    }
}
