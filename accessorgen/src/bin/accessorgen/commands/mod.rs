pub mod detach;
pub mod generate;
pub mod init;
pub mod runtime;
pub mod scan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use accessorgen::{GeneratorSettings, Manifest};

use crate::context::ProjectContext;
use crate::output::OutputManager;

/// Where the sources and metadata live, and how generated files look.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Metadata manifest (defaults to [project].manifest in accessorgen.toml)
    #[arg(long, env = "ACCESSORGEN_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Directory the class files live under (defaults to [project].source_root)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Extension of class files, including the dot
    #[arg(long)]
    pub extension: Option<String>,

    /// Spaces per indentation level in generated code
    #[arg(long)]
    pub indent: Option<usize>,

    /// Do not copy class files before modifying them
    #[arg(long)]
    pub no_backup: bool,
}

impl SourceArgs {
    /// Configured settings with command-line overrides applied.
    pub fn settings(&self, ctx: &ProjectContext) -> GeneratorSettings {
        let mut settings = ctx.generator_settings();
        if let Some(extension) = &self.extension {
            settings.extension.clone_from(extension);
        }
        if let Some(indent) = self.indent {
            settings.indent_width = indent;
        }
        if self.no_backup {
            settings.backup_existing = false;
        }
        settings
    }

    pub fn source_root(&self, ctx: &ProjectContext) -> PathBuf {
        ctx.source_root(self.source_root.as_deref())
    }

    pub fn load_manifest(&self, ctx: &ProjectContext, output: &OutputManager) -> Result<Manifest> {
        let path = ctx.manifest_path(self.manifest.as_deref());
        if ctx.is_initialized() {
            output.verbose(&format!("Using {}", ctx.config_path.display()));
        }
        if !path.exists() && !ctx.is_initialized() {
            output.info("Run 'accessorgen init' to create an accessorgen.toml, or pass --manifest.");
        }
        load_manifest(&path)
    }
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::from_path(path).with_context(|| format!("Failed to load manifest {}", path.display()))
}
