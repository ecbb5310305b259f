use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table, presets};
use serde::Serialize;

use crate::theme::{GLYPHS, PALETTE};

/// How command results are printed.
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// Pretty-printed JSON, for scripts
    Json,
    /// One `key=value` line
    Compact,
}

/// Flags accepted before the subcommand.
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// A command result that can be rendered in every [`OutputFormat`].
pub trait TableDisplay {
    fn to_table(&self, output: &OutputManager) -> Table;
    fn to_compact(&self) -> String;
}

#[derive(Clone, Copy)]
enum Tone {
    Done,
    Failed,
    Caution,
    Note,
    Detail,
}

impl Tone {
    fn glyph(self) -> &'static str {
        match self {
            Tone::Done => GLYPHS.done,
            Tone::Failed => GLYPHS.failed,
            Tone::Caution => GLYPHS.caution,
            Tone::Note => GLYPHS.note,
            Tone::Detail => GLYPHS.arrow,
        }
    }

    fn color(self) -> Color {
        match self {
            Tone::Done => PALETTE.done,
            Tone::Failed => PALETTE.failed,
            Tone::Caution => PALETTE.caution,
            Tone::Note => PALETTE.note,
            Tone::Detail => PALETTE.detail,
        }
    }
}

/// Prints results and status lines according to the global flags.
///
/// Results go to stdout; failures and `--verbose` details go to stderr so
/// that `--output json` stays parseable.
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Whether status lines are printed next to the result.
    pub fn is_human(&self) -> bool {
        !self.options.quiet && self.options.output_format != OutputFormat::Json
    }

    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        let rendered = match self.options.output_format {
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Table => data.to_table(self).to_string(),
            OutputFormat::Compact => data.to_compact(),
        };
        println!("{rendered}");
        Ok(())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.no_color {
            text.to_string()
        } else {
            text.color(color).to_string()
        }
    }

    fn line(&self, tone: Tone, message: &str) -> String {
        format!("{} {}", self.paint(tone.glyph(), tone.color()), self.paint(message, tone.color()))
    }

    pub fn success(&self, message: &str) {
        if self.is_human() {
            println!("{}", self.line(Tone::Done, message));
        }
    }

    /// Always printed, even with `--quiet`.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.line(Tone::Failed, message));
    }

    pub fn warning(&self, message: &str) {
        if self.is_human() {
            println!("{}", self.line(Tone::Caution, message));
        }
    }

    pub fn info(&self, message: &str) {
        if self.is_human() {
            println!("{}", self.line(Tone::Note, message));
        }
    }

    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.line(Tone::Detail, message));
        }
    }

    pub fn heading(&self, text: &str) {
        if !self.is_human() {
            return;
        }
        if self.options.no_color {
            println!("\n{text}\n{}", "-".repeat(text.chars().count()));
        } else {
            println!("\n{}", text.color(PALETTE.heading).bold());
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if !self.is_human() {
            return;
        }
        let key = if self.options.no_color {
            key.to_string()
        } else {
            key.color(PALETTE.label).bold().to_string()
        };
        println!("{key}: {}", self.paint(value, PALETTE.text));
    }

    pub fn bullet(&self, text: &str) {
        self.indented(GLYPHS.bullet, text);
    }

    pub fn indented(&self, glyph: &str, text: &str) {
        if self.is_human() {
            println!("  {} {text}", self.paint(glyph, PALETTE.detail));
        }
    }

    pub fn create_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        });
        table
    }

    pub fn add_table_header(&self, table: &mut Table, headers: Vec<&str>) {
        let no_color = self.options.no_color;
        table.set_header(headers.into_iter().map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if no_color { cell } else { cell.fg(TableColor::Cyan) }
        }));
    }
}
