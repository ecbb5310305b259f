use colored::Color;
use once_cell::sync::Lazy;

/// Colors for each kind of line the CLI prints.
pub struct Palette {
    pub done: Color,
    pub failed: Color,
    pub caution: Color,
    pub note: Color,
    pub heading: Color,
    pub detail: Color,
    pub label: Color,
    pub text: Color,
    /// Example command lines in `--help`.
    pub command: Color,
    /// Section titles in `--help`.
    pub section: Color,
}

pub static PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    done: Color::Green,
    failed: Color::Red,
    caution: Color::Yellow,
    note: Color::Blue,
    heading: Color::BrightBlue,
    detail: Color::BrightBlack,
    label: Color::BrightCyan,
    text: Color::White,
    command: Color::Magenta,
    section: Color::Cyan,
});

/// Leading symbols. `emitted` and `kept` mark generated and already declared methods.
pub struct Glyphs {
    pub done: &'static str,
    pub failed: &'static str,
    pub caution: &'static str,
    pub note: &'static str,
    pub arrow: &'static str,
    pub bullet: &'static str,
    pub emitted: &'static str,
    pub kept: &'static str,
    pub file: &'static str,
}

pub const GLYPHS: Glyphs = Glyphs {
    done: "✓",
    failed: "✗",
    caution: "⚠",
    note: "ℹ",
    arrow: "→",
    bullet: "•",
    emitted: "+",
    kept: "=",
    file: "📄",
};
