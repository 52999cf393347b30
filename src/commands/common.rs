// src/commands/common.rs
//! Shared utilities for CLI commands.

use std::io::IsTerminal;

use miette::{Diagnostic, NamedSource, Report};

use crate::cli::ColorMode;
use crate::errors::{render_to_stderr, render_to_string};

/// Name under which the fragment appears in rendered diagnostics.
pub const FRAGMENT_NAME: &str = "<fragment>";

/// Check if stdout supports color output.
pub fn stdout_supports_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Check if stderr supports color output.
pub fn stderr_supports_color() -> bool {
    std::io::stderr().is_terminal()
}

/// Render a diagnostic to stderr, themed according to `color`.
pub fn render(report: &dyn Diagnostic, color: ColorMode) {
    let fancy = match color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stderr_supports_color(),
    };
    if fancy {
        render_to_stderr(report);
    } else {
        eprint!("{}", render_to_string(report));
    }
}

/// Render diagnostics that point into the fragment.
pub fn render_in_fragment<E>(errors: impl IntoIterator<Item = E>, fragment: &str, color: ColorMode)
where
    E: Diagnostic + Send + Sync + 'static,
{
    for error in errors {
        let report = Report::new(error)
            .with_source_code(NamedSource::new(FRAGMENT_NAME, fragment.to_string()));
        render(report.as_ref(), color);
    }
}

/// ANSI color codes for terminal output.
pub struct TermColors {
    use_color: bool,
}

impl TermColors {
    pub fn new(color: ColorMode) -> Self {
        let use_color = match color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout_supports_color(),
        };
        Self { use_color }
    }

    /// Green text (for the best meaning).
    pub fn green(&self) -> &'static str {
        if self.use_color { "\x1b[32m" } else { "" }
    }

    /// Dim/gray text (for probabilities).
    pub fn dim(&self) -> &'static str {
        if self.use_color { "\x1b[90m" } else { "" }
    }

    /// Reset to default colors.
    pub fn reset(&self) -> &'static str {
        if self.use_color { "\x1b[0m" } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_means_no_escape_codes() {
        let colors = TermColors::new(ColorMode::Never);
        assert_eq!(colors.green(), "");
        assert_eq!(colors.dim(), "");
        assert_eq!(colors.reset(), "");
    }

    #[test]
    fn always_means_escape_codes() {
        let colors = TermColors::new(ColorMode::Always);
        assert_eq!(colors.green(), "\x1b[32m");
        assert_eq!(colors.reset(), "\x1b[0m");
    }
}
