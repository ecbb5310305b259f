use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use accessorgen::runtime::write_runtime;

use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Runtime traits",
    commands: &[
        "accessorgen runtime                                   # Into the configured namespace",
        "accessorgen runtime --namespace 'Acme\\Support'        # Into another namespace",
    ],
}];

#[derive(Args, Debug)]
pub struct RuntimeArgs {
    /// Namespace of the runtime traits (defaults to [generator].runtime_namespace)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Directory the namespace directories are created under
    #[arg(long)]
    pub source_root: Option<PathBuf>,
}

#[derive(Serialize)]
struct RuntimeFiles {
    namespace: String,
    files: Vec<PathBuf>,
}

impl TableDisplay for RuntimeFiles {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, vec!["Runtime trait file"]);
        for file in &self.files {
            table.add_row(vec![Cell::new(file.display())]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!("namespace={} files={}", self.namespace, self.files.len())
    }
}

pub fn handle_runtime(args: RuntimeArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let settings = ctx.generator_settings();
    let root = ctx.source_root(args.source_root.as_deref());
    let namespace = args.namespace.unwrap_or(settings.runtime_namespace);

    output.heading("Writing runtime traits");

    let files = write_runtime(&root, &namespace, &settings.extension)
        .with_context(|| format!("Failed to write runtime traits below {}", root.display()))?;

    output.display(&RuntimeFiles { namespace, files })?;
    output.success("Runtime traits written");
    if args.source_root.is_none() && !ctx.is_initialized() {
        output.info("Generated traits expect the configured runtime namespace; keep accessorgen.toml in sync.");
    }
    Ok(())
}
