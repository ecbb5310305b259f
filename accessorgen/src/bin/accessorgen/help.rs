//! `--help` rendering: styles, per-command examples and the top-level appendix.

use std::fmt::Write;
use std::io::{self, Write as IoWrite};

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches};
use colored::{Color, Colorize, control::ShouldColorize};

use crate::examples::{ExampleGroup, command_examples};
use crate::theme::{GLYPHS, PALETTE};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("ACCESSORGEN_MANIFEST", "Manifest to read instead of [project].manifest"),
    ("RUST_LOG", "Log filter, e.g. 'accessorgen=debug' to trace every emitted or skipped method"),
    ("NO_COLOR", "Disable colored output"),
];

/// Parses the command line, printing help and errors between blank lines.
pub fn parse<C: CommandFactory + FromArgMatches>() -> C {
    let matches = match styled_command::<C>().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let to_stderr = err.use_stderr();
            blank_line(to_stderr);
            if let Err(print_err) = err.print()
                && print_err.kind() != io::ErrorKind::BrokenPipe
            {
                eprintln!("Failed to print help: {print_err}");
            }
            blank_line(to_stderr);
            std::process::exit(err.exit_code());
        }
    };

    C::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

pub fn blank_line(to_stderr: bool) {
    let _ = if to_stderr {
        writeln!(io::stderr())
    } else {
        writeln!(io::stdout())
    };
}

fn styled_command<C: CommandFactory>() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = C::command()
        .styles(styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(appendix(use_color));

    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(render_examples(example.groups, use_color));
        }
    }
    command
}

/// Same roles as [`PALETTE`], in clap's terms.
fn styles() -> Styles {
    Styles::styled()
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .header(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

fn paint(text: &str, color: Color, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, false) => text.color(color).to_string(),
        (true, true) => text.color(color).bold().to_string(),
    }
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut help = String::new();
    let _ = writeln!(help, "{}", paint("Examples:", PALETTE.section, true, use_color));

    let arrow = paint(GLYPHS.arrow, PALETTE.command, false, use_color);
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            help.push('\n');
        }
        let _ = writeln!(help, "  {}", paint(group.title, PALETTE.heading, true, use_color));
        for command in group.commands {
            let _ = writeln!(help, "    {arrow} {}", paint(command, PALETTE.command, false, use_color));
        }
    }

    help
}

fn appendix(use_color: bool) -> String {
    let mut help = String::new();

    let _ = writeln!(help, "{}", paint("Environment Variables:", PALETTE.section, true, use_color));
    let width = ENVIRONMENT_VARIABLES.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in ENVIRONMENT_VARIABLES {
        let padded = format!("{name:width$}");
        let _ = writeln!(
            help,
            "  {}  {}",
            paint(&padded, PALETTE.label, true, use_color),
            paint(description, PALETTE.text, false, use_color)
        );
    }

    let _ = writeln!(
        help,
        "\n{} {}",
        paint("Tip:", PALETTE.section, true, use_color),
        paint(
            "Use 'accessorgen <command> --help' to view examples for each command.",
            PALETTE.command,
            false,
            use_color
        )
    );

    help
}
