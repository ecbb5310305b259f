use anyhow::{Result, bail};
use clap::Args;

use accessorgen::{AccessorGenerator, BatchPolicy, MetadataProvider};

use super::SourceArgs;
use super::generate::{finish, print_details};
use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Detach",
    commands: &[
        "accessorgen detach                            # Unlink every generated trait",
        "accessorgen detach App/Entity --no-backup     # One namespace, without backups",
    ],
}];

#[derive(Args, Debug)]
pub struct DetachArgs {
    /// Class, namespace or short class name to detach (all classes if omitted)
    pub name: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Keep processing the remaining classes when one fails
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Removes the `use` line of each generated trait. Trait files are left in
/// place so that a later `generate` simply re-attaches them.
pub fn handle_detach(args: DetachArgs, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::find()?;
    let manifest = args.source.load_manifest(&ctx, output)?;
    let root = args.source.source_root(&ctx);

    let selected = manifest.select(args.name.as_deref());
    if selected.is_empty() {
        bail!("No class in the manifest matches the selection");
    }

    output.heading("Detaching generated traits");

    let policy = if args.continue_on_error {
        BatchPolicy::Continue
    } else {
        BatchPolicy::Abort
    };

    let report = AccessorGenerator::new(&root, &manifest)
        .settings(args.source.settings(&ctx))
        .batch_policy(policy)
        .unlink_only(true)
        .run(manifest.classes(), &selected)?;

    print_details(&report, output);
    output.display(&report)?;
    finish(&report, output)
}
