// src/errors/report.rs
//! Rendering utilities for miette diagnostics.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, ThemeCharacters, ThemeStyles};
use std::io::Write as IoWrite;

/// Handler for terminal output (unicode + colors).
pub fn terminal_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Handler for tests and piped output (ascii + no colors).
pub fn plain_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    };
    GraphicalReportHandler::new_themed(theme)
}

pub fn render_to_stderr(report: &dyn Diagnostic) {
    let mut output = String::new();
    if terminal_handler().render_report(&mut output, report).is_ok() {
        eprint!("{}", output);
    }
}

pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let _ = plain_handler().render_report(&mut output, report);
    output
}

pub fn render_to_writer<W: IoWrite>(report: &dyn Diagnostic, mut writer: W) -> std::io::Result<()> {
    writer.write_all(render_to_string(report).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{IndexError, LexerError};
    use crate::scored::Error;
    use miette::NamedSource;

    #[test]
    fn render_lexer_error_with_source() {
        let err = LexerError::UnexpectedCharacter {
            ch: '@',
            span: (0, 1).into(),
        };
        let report =
            miette::Report::new(err).with_source_code(NamedSource::new("<input>", "@".to_string()));

        let output = render_to_string(report.as_ref());
        assert!(output.contains("E0001"), "should contain error code");
        assert!(output.contains("unexpected character"));
    }

    #[test]
    fn render_index_error_with_help() {
        let err = IndexError::ImpossiblePlace {
            place: "lang.Math.PI".to_string(),
        };
        let output = render_to_string(&err);
        assert!(output.contains("E1004"));
        assert!(output.contains("lang.Math.PI"));
        assert!(output.contains("only packages"));
    }

    #[test]
    fn render_nested_search_failure() {
        let err = Error::nest(
            "no alternative on either side",
            vec![Error::one("no value named 'f'"), Error::one("no type named 'f'")],
        );
        let output = render_to_string(&err);
        assert!(output.contains("no alternative on either side"));
        assert!(output.contains("no value named 'f'"));
        assert!(output.contains("no type named 'f'"));
    }

    #[test]
    fn render_to_writer_writes_plain_text() {
        let err = LexerError::UnterminatedString { span: (0, 3).into() };
        let mut buffer = Vec::new();
        render_to_writer(&err, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("unterminated string literal"));
    }
}
