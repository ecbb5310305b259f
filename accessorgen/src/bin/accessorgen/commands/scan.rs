use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use accessorgen::SourceLayout;
use accessorgen::scanner::{ScannedClass, scan};

use crate::context::ProjectContext;
use crate::discovery::discover_sources;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Scan",
    commands: &[
        "accessorgen scan                              # Every class below the source root",
        "accessorgen scan src/App/Entity               # One directory",
        "accessorgen --output json scan                # As JSON",
    ],
}];

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan (defaults to [project].source_root)
    pub path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ScannedFile {
    file: String,
    classes: Vec<ScannedClass>,
}

#[derive(Serialize)]
struct ScanResult {
    root: PathBuf,
    files: Vec<ScannedFile>,
}

impl TableDisplay for ScanResult {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, vec!["Class", "Methods", "Properties", "File"]);

        for file in &self.files {
            for class in &file.classes {
                table.add_row(vec![
                    Cell::new(&class.name),
                    Cell::new(class.methods.join(", ")),
                    Cell::new(class.properties.join(", ")),
                    Cell::new(&file.file),
                ]);
            }
        }

        table
    }

    fn to_compact(&self) -> String {
        let classes: usize = self.files.iter().map(|file| file.classes.len()).sum();
        format!("files={} classes={classes}", self.files.len())
    }
}

pub fn handle_scan(args: ScanArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let settings = ctx.generator_settings();
    let root = ctx.source_root(args.path.as_deref());
    let layout = SourceLayout::new(&root, &settings);

    let discovered = discover_sources(&root, &layout, &settings.extension)?;
    output.verbose(&format!("Found {} source file(s) below {}", discovered.len(), root.display()));

    let mut files = Vec::new();
    for source in discovered {
        let content = std::fs::read_to_string(&source.path)
            .with_context(|| format!("Failed to read {}", source.path.display()))?;
        let classes = scan(&content);
        if classes.is_empty() {
            continue;
        }
        files.push(ScannedFile {
            file: source.relative_path,
            classes,
        });
    }

    if files.is_empty() {
        output.warning(&format!("No classes found below {}", root.display()));
        return Ok(());
    }

    output.display(&ScanResult { root, files })
}
