use anyhow::{Context, Result, bail};
use clap::Args;

use crate::context::{AccessorgenConfig, CONFIG_FILE};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Initialize",
    commands: &[
        "accessorgen init                              # Write accessorgen.toml with defaults",
        "accessorgen init --force                      # Overwrite an existing one",
    ],
}];

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing accessorgen.toml
    #[arg(long)]
    pub force: bool,
}

pub fn handle_init(args: InitArgs, output: &OutputManager) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config_path = current_dir.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        bail!("{} already exists; pass --force to overwrite it", config_path.display());
    }

    let config = AccessorgenConfig::default();
    let content = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    std::fs::write(&config_path, content).with_context(|| format!("Failed to write {}", config_path.display()))?;

    output.success(&format!("Created {}", config_path.display()));
    output.key_value("Source root", &config.project.source_root);
    output.key_value("Manifest", &config.project.manifest);

    output.heading("Next steps");
    output.bullet(&format!("Export your ORM metadata to {}", config.project.manifest));
    output.bullet("Run 'accessorgen runtime' once to write the runtime traits");
    output.bullet("Run 'accessorgen generate'");
    Ok(())
}
