//! Writing generated traits and linking them into host class files.
//!
//! Host files are only ever touched by adding or removing the marker line
//! produced by [`SourceLayout::marker`]; everything else is left byte for byte.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::errors::{GenerateError, GenerateResult};
use crate::members::KnownMembers;

fn read_host(host: &Path) -> GenerateResult<String> {
    fs::read_to_string(host).map_err(|source| match source.kind() {
        ErrorKind::NotFound => GenerateError::HostMissing {
            path: host.to_path_buf(),
        },
        _ => GenerateError::io(host, source),
    })
}

fn write_file(path: &Path, content: &str) -> GenerateResult<()> {
    fs::write(path, content).map_err(|source| GenerateError::io(path, source))
}

/// Writes a generated trait, replacing any previous version.
pub fn write_artifact(path: &Path, code: &str) -> GenerateResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| GenerateError::io(dir, source))?;
    }
    write_file(path, code)?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// Removes every occurrence of `marker` from `host` and re-indexes the result.
///
/// Returns whether the file contained the marker.
pub fn detach_marker(host: &Path, marker: &str, members: &mut KnownMembers<'_>) -> GenerateResult<bool> {
    let source = read_host(host)?;
    let detached = source.replace(marker, "");
    let found = detached.len() != source.len();

    if found {
        write_file(host, &detached)?;
        debug!("detached generated trait from {}", host.display());
    }
    members.refresh_from_source(&detached);

    Ok(found)
}

/// Inserts `marker` before the final closing brace of `host` unless it is
/// already present.
///
/// Returns whether the file was changed.
pub fn attach_marker(host: &Path, marker: &str, class: &str) -> GenerateResult<bool> {
    let source = read_host(host)?;
    if source.contains(marker) {
        return Ok(false);
    }

    let Some(brace) = source.rfind('}') else {
        return Err(GenerateError::configuration(
            class,
            format!("{} has no closing brace to attach the generated trait to", host.display()),
        ));
    };

    let mut attached = String::with_capacity(source.len() + marker.len());
    attached.push_str(&source[..brace]);
    attached.push_str(marker);
    attached.push_str(&source[brace..]);
    write_file(host, &attached)?;
    debug!("attached generated trait to {}", host.display());

    Ok(true)
}

/// Copies `host` to `backup`.
pub fn backup(host: &Path, backup: &Path) -> GenerateResult<()> {
    if !host.exists() {
        return Err(GenerateError::HostMissing {
            path: host.to_path_buf(),
        });
    }
    fs::copy(host, backup).map_err(|source| GenerateError::io(backup, source))?;
    debug!("backed up {} to {}", host.display(), backup.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::NoIntrospection;
    use pretty_assertions::assert_eq;

    const MARKER: &str = "\n    use \\App\\AutomaticAccessors\\Tag;\n";
    const HOST: &str = "<?php\nnamespace App;\n\nclass Tag\n{\n    public function getLabel() {}\n}\n";

    fn host_file(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("Tag.php");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_attach_then_detach_restores_file() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_file(dir.path(), HOST);
        let mut members = KnownMembers::new(NoIntrospection);

        assert!(attach_marker(&host, MARKER, "App\\Tag").unwrap());
        let attached = fs::read_to_string(&host).unwrap();
        assert_eq!(
            attached,
            "<?php\nnamespace App;\n\nclass Tag\n{\n    public function getLabel() {}\n\n    use \\App\\AutomaticAccessors\\Tag;\n}\n"
        );

        assert!(detach_marker(&host, MARKER, &mut members).unwrap());
        assert_eq!(fs::read_to_string(&host).unwrap(), HOST);
        assert!(members.has_method("App\\Tag", "getLabel"));
    }

    #[test]
    fn test_attach_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_file(dir.path(), HOST);

        assert!(attach_marker(&host, MARKER, "App\\Tag").unwrap());
        assert!(!attach_marker(&host, MARKER, "App\\Tag").unwrap());
        assert_eq!(fs::read_to_string(&host).unwrap().matches(MARKER).count(), 1);
    }

    #[test]
    fn test_detach_removes_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_file(dir.path(), &format!("<?php\nclass Tag\n{{{MARKER}{MARKER}}}\n"));
        let mut members = KnownMembers::new(NoIntrospection);

        assert!(detach_marker(&host, MARKER, &mut members).unwrap());
        assert_eq!(fs::read_to_string(&host).unwrap(), "<?php\nclass Tag\n{}\n");
        assert!(!detach_marker(&host, MARKER, &mut members).unwrap());
    }

    #[test]
    fn test_missing_host() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Missing.php");
        let mut members = KnownMembers::new(NoIntrospection);

        assert!(matches!(
            detach_marker(&missing, MARKER, &mut members),
            Err(GenerateError::HostMissing { .. })
        ));
        assert!(matches!(
            attach_marker(&missing, MARKER, "App\\Missing"),
            Err(GenerateError::HostMissing { .. })
        ));
        assert!(matches!(
            backup(&missing, &dir.path().join("Missing.php~")),
            Err(GenerateError::HostMissing { .. })
        ));
    }

    #[test]
    fn test_attach_without_brace_fails() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_file(dir.path(), "<?php\n// nothing here\n");
        assert!(matches!(
            attach_marker(&host, MARKER, "App\\Tag"),
            Err(GenerateError::Configuration { .. })
        ));
    }

    #[test]
    fn test_write_artifact_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App/AutomaticAccessors/Tag.php");

        write_artifact(&path, "first").unwrap();
        write_artifact(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_backup_copies_host() {
        let dir = tempfile::tempdir().unwrap();
        let host = host_file(dir.path(), HOST);
        let copy = dir.path().join("Tag.php~");

        backup(&host, &copy).unwrap();
        assert_eq!(fs::read_to_string(copy).unwrap(), HOST);
    }
}
