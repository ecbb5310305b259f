use anyhow::{Result, bail};
use clap::Args;
use comfy_table::{Cell, Color as TableColor, Table};

use accessorgen::{AccessorGenerator, BatchPolicy, GenerationReport, MetadataProvider};

use super::SourceArgs;
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};
use crate::theme::GLYPHS;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Generate",
        commands: &[
            "accessorgen generate                          # All classes in the manifest",
            "accessorgen generate App/Entity               # Every class in a namespace",
            "accessorgen generate 'App\\Entity\\Group'       # One class by full name",
            "accessorgen generate Group                    # One class by short name",
        ],
    },
    ExampleGroup {
        title: "Options",
        commands: &[
            "accessorgen generate --no-backup --indent 2",
            "accessorgen generate --continue-on-error      # Keep going when a class fails",
            "accessorgen generate --with-runtime           # Also write the runtime traits",
            "accessorgen --output json generate            # Machine-readable report",
        ],
    },
];

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Class, namespace or short class name to generate (all classes if omitted)
    pub name: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Keep processing the remaining classes when one fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Also write the runtime support traits
    #[arg(long)]
    pub with_runtime: bool,
}

pub fn handle_generate(args: GenerateArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let manifest = args.source.load_manifest(&ctx, output)?;
    let settings = args.source.settings(&ctx);
    let root = args.source.source_root(&ctx);

    let selected = manifest.select(args.name.as_deref());
    if selected.is_empty() {
        match &args.name {
            Some(name) => bail!("No class in the manifest matches '{name}'"),
            None => {
                output.warning("The manifest does not describe any classes");
                return Ok(());
            }
        }
    }

    output.heading("Generating accessors");
    output.key_value("Source root", &root.display().to_string());
    output.key_value("Classes", &selected.len().to_string());

    let policy = if args.continue_on_error {
        BatchPolicy::Continue
    } else {
        BatchPolicy::Abort
    };

    let report = AccessorGenerator::new(&root, &manifest)
        .settings(settings)
        .batch_policy(policy)
        .with_runtime(args.with_runtime)
        .run(manifest.classes(), &selected)?;

    print_details(&report, output);
    output.display(&report)?;
    finish(&report, output)
}

/// Per-method detail, shown with --verbose.
pub(crate) fn print_details(report: &GenerationReport, output: &OutputManager) {
    for class in &report.classes {
        for method in &class.emitted {
            output.verbose(&format!("{} {}::{method}", GLYPHS.emitted, class.class));
        }
        for method in &class.skipped {
            output.verbose(&format!("{} {}::{method} (already declared)", GLYPHS.kept, class.class));
        }
        if let Some(artifact) = &class.artifact {
            output.verbose(&format!("{} {}", GLYPHS.file, artifact.display()));
        }
    }
}

pub(crate) fn finish(report: &GenerationReport, output: &OutputManager) -> Result<()> {
    for path in &report.runtime {
        output.indented(GLYPHS.file, &path.display().to_string());
    }

    if report.aborted {
        output.warning("Stopped at the first failure; pass --continue-on-error to process the rest");
    }

    if !report.is_success() {
        for failure in &report.failures {
            output.error(&format!("{}: {}", failure.class, failure.message));
        }
        bail!("{} class(es) failed", report.failures.len());
    }

    output.success(&format!(
        "Processed {} class(es): {} accessor(s) generated, {} already declared",
        report.classes.len(),
        report.emitted_count(),
        report.skipped_count()
    ));
    Ok(())
}

impl TableDisplay for GenerationReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, vec!["Class", "Generated", "Already declared", "Trait", "Status"]);

        for class in &self.classes {
            let status = match (&class.artifact, class.detached) {
                (None, true) => "detached",
                (None, false) => "not attached",
                (Some(_), true) => "regenerated",
                (Some(_), false) => "attached",
            };
            table.add_row(vec![
                Cell::new(&class.class),
                Cell::new(class.emitted.len()),
                Cell::new(class.skipped.len()),
                Cell::new(
                    class
                        .artifact
                        .as_ref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default(),
                ),
                Cell::new(status).fg(TableColor::Green),
            ]);
        }

        for failure in &self.failures {
            table.add_row(vec![
                Cell::new(&failure.class),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(""),
                Cell::new(&failure.message).fg(TableColor::Red),
            ]);
        }

        table
    }

    fn to_compact(&self) -> String {
        format!(
            "classes={} generated={} declared={} failed={}",
            self.classes.len(),
            self.emitted_count(),
            self.skipped_count(),
            self.failures.len()
        )
    }
}
