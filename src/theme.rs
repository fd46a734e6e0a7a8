//! Centralized styling for operator-facing terminal output
//!
//! Every line the operator sees goes through these helpers so the color
//! roles stay consistent between the installer and the mirror builder:
//!
//! | Role     | Style        |
//! |----------|--------------|
//! | message  | cyan         |
//! | prompt   | bold cyan    |
//! | warning  | yellow       |
//! | failure  | red          |
//! | success  | green        |
//! | banner   | magenta      |
//!
//! Styling is dropped automatically when stdout is not a terminal.

use console::{style, Style};

/// Semantic styles
pub struct Styles;

impl Styles {
    pub fn message() -> Style {
        Style::new().cyan()
    }

    pub fn prompt() -> Style {
        Style::new().cyan().bold()
    }

    pub fn warning() -> Style {
        Style::new().yellow()
    }

    pub fn warning_strong() -> Style {
        Style::new().yellow().bold()
    }

    pub fn failure() -> Style {
        Style::new().red()
    }

    pub fn failure_strong() -> Style {
        Style::new().red().bold()
    }

    pub fn success() -> Style {
        Style::new().green()
    }

    pub fn success_strong() -> Style {
        Style::new().green().bold()
    }

    pub fn banner() -> Style {
        Style::new().magenta()
    }
}

pub fn message(text: impl AsRef<str>) {
    println!("{}", Styles::message().apply_to(text.as_ref()));
}

pub fn warning(text: impl AsRef<str>) {
    println!("{}", Styles::warning().apply_to(text.as_ref()));
}

pub fn warning_strong(text: impl AsRef<str>) {
    println!("{}", Styles::warning_strong().apply_to(text.as_ref()));
}

pub fn failure(text: impl AsRef<str>) {
    println!("{}", Styles::failure().apply_to(text.as_ref()));
}

pub fn failure_strong(text: impl AsRef<str>) {
    println!("{}", Styles::failure_strong().apply_to(text.as_ref()));
}

pub fn success(text: impl AsRef<str>) {
    println!("{}", Styles::success().apply_to(text.as_ref()));
}

pub fn success_strong(text: impl AsRef<str>) {
    println!("{}", Styles::success_strong().apply_to(text.as_ref()));
}

pub fn prompt_line(text: impl AsRef<str>) {
    println!("{}", Styles::prompt().apply_to(text.as_ref()));
}

pub fn banner_text(text: impl AsRef<str>) {
    println!("{}", Styles::banner().apply_to(text.as_ref()));
}

pub fn plain(text: impl AsRef<str>) {
    println!("{}", text.as_ref());
}

pub fn blank() {
    println!();
}

/// Dashed title banner printed when a command starts
pub fn banner(title: &str) {
    let text = format!("# {} #", title);
    let rule = "-".repeat(text.chars().count());
    blank();
    println!("{}", Styles::banner().apply_to(&rule));
    println!("{}", Styles::banner().apply_to(&text));
    println!("{}", Styles::banner().apply_to(&rule));
    blank();
}

/// Text framed by dashed rules, e.g. a hosts-file entry or a log path
pub fn framed(text: &str) -> Vec<String> {
    let line = format!("| {} |", text);
    let rule = "-".repeat(line.chars().count());
    vec![rule.clone(), line, rule]
}

/// Styled inline fragment for mixing roles within one line
pub fn emphasis(text: &str) -> String {
    style(text).bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_widths_match() {
        let lines = framed("192.0.2.10    foreman.example.com");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "| 192.0.2.10    foreman.example.com |");
        assert_eq!(lines[0].len(), lines[1].len());
        assert_eq!(lines[0], lines[2]);
    }
}
