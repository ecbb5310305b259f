mod commands;
mod context;
mod discovery;
mod examples;
mod help;
mod output;
mod theme;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    detach::{DetachArgs, handle_detach},
    generate::{GenerateArgs, handle_generate},
    init::{InitArgs, handle_init},
    runtime::{RuntimeArgs, handle_runtime},
    scan::{ScanArgs, handle_scan},
};
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "accessorgen")]
#[command(version)]
#[command(
    about = "Accessor trait generator for ORM entity classes",
    long_about = r#"Generates getters, setters, adders and removers for ORM entity classes:

• One generated trait per class, attached with a single `use` line
• Methods the class (or a parent) already declares are never generated
• Annotation settings merge down the class hierarchy and only ever widen
• Paired collections stay in sync through a small runtime trait

Commands:
  init      Create an accessorgen.toml in the current directory
  generate  Generate accessor traits and attach them to their classes
  detach    Remove generated traits from their classes
  runtime   Write the runtime support traits
  scan      List the classes, methods and properties found in the sources
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print every generated and skipped method
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an accessorgen.toml in the current directory
    Init(InitArgs),

    /// Generate accessor traits and attach them to their classes
    Generate(GenerateArgs),

    /// Remove generated traits from their classes without regenerating them
    Detach(DetachArgs),

    /// Write the runtime support traits used by generated code
    Runtime(RuntimeArgs),

    /// List the classes, methods and properties found in the sources
    Scan(ScanArgs),
}

fn main() {
    env_logger::init();

    let cli: Cli = help::parse();

    help::blank_line(false);
    let result = execute(cli);
    if let Err(err) = &result {
        eprintln!("Error: {err:#}");
    }
    help::blank_line(false);

    if result.is_err() {
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    if options.no_color {
        colored::control::set_override(false);
    }
    let output = OutputManager::new(options);

    match cli.command {
        Commands::Init(args) => handle_init(args, &output),
        Commands::Generate(args) => handle_generate(args, &output),
        Commands::Detach(args) => handle_detach(args, &output),
        Commands::Runtime(args) => handle_runtime(args, &output),
        Commands::Scan(args) => handle_scan(args, &output),
    }
}
