//! Colored terminal output for the user-facing report.

use owo_colors::{OwoColorize, Style};
use std::fmt::Display;

#[derive(Debug, Clone, Copy)]
pub struct ColoredOutput {
    color: bool,
}

impl ColoredOutput {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Output that never emits escape codes.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Apply `style` unless color is stripped.
    pub fn paint(&self, text: impl Display, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn out(&self, line: impl Display) {
        println!("{}", line);
    }

    /// `<verb> <subject>`, e.g. "Writing file to /etc/foo".
    pub fn status(&self, verb: &str, subject: impl Display) {
        self.out(format!(
            "{} {}",
            self.paint(verb, palette::verb()),
            self.paint(subject, palette::subject())
        ));
    }

    /// Indented, dimmed detail text such as file contents.
    pub fn detail(&self, text: impl Display) {
        self.out(self.paint(text, palette::detail()));
    }

    pub fn banner(&self, title: &str) {
        let rule = "=".repeat(title.chars().count() + 4);
        self.out(String::new());
        self.out(self.paint(&rule, palette::banner()));
        self.out(self.paint(format!("  {}  ", title), palette::banner()));
        self.out(self.paint(&rule, palette::banner()));
        self.out(String::new());
    }
}

pub mod palette {
    use owo_colors::Style;

    pub fn verb() -> Style {
        Style::new().bright_magenta()
    }

    pub fn subject() -> Style {
        Style::new().green()
    }

    pub fn detail() -> Style {
        Style::new().dimmed()
    }

    pub fn banner() -> Style {
        Style::new().red().bold()
    }

    pub fn heading() -> Style {
        Style::new().bright_blue().bold().underline()
    }

    pub fn name() -> Style {
        Style::new().magenta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_has_no_escapes() {
        let output = ColoredOutput::plain();
        assert_eq!(output.paint("hello", palette::verb()), "hello");
    }

    #[test]
    fn test_colored_output_wraps_text() {
        let output = ColoredOutput::new(true);
        let painted = output.paint("hello", palette::banner());
        assert!(painted.contains("hello"));
        assert!(painted.starts_with('\u{1b}'));
    }
}
